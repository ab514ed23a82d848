#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

use super::SessionState;
use crate::configuration::Settings;
use crate::domain::models::NameFieldView;
use crate::domain::models::SessionPhase;
use crate::domain::models::SidebarView;
use crate::domain::models::View;

/// Describes the page for the current session state. Reads only, so it is
/// safe to call as often as the browser asks.
pub fn render(state: &SessionState, settings: &Settings, models: &[String]) -> View {
    let session = state.session();
    let phase = state.phase();
    let idle = !state.waiting_for_backend();

    let mut sidebar = None;
    if settings.sidebar_show {
        let mut temperature = settings.temperature.clone();
        temperature.value = session.temperature;

        sidebar = Some(SidebarView {
            models: models.to_vec(),
            model: session.model.to_string(),
            temperature,
            settings_enabled: phase != SessionPhase::Ended && idle,
            delete_enabled: phase != SessionPhase::Ended && idle,
            download_enabled: session.name.is_some(),
            save_enabled: session.name.is_some() && idle,
        });
    }

    return View {
        session_id: session.id.to_string(),
        phase,
        name_field: NameFieldView {
            value: session.name.clone().unwrap_or_default(),
            disabled: session.disabled,
        },
        messages: session.messages.clone(),
        pending_reply: state.pending_reply().map(|reply| return reply.to_string()),
        waiting_for_backend: !idle,
        chat_input_enabled: phase == SessionPhase::Chatting && idle,
        end_chat_visible: phase == SessionPhase::Chatting,
        show_dialog: session.show_dialog,
        chat_ended: session.chat_ended,
        sidebar,
    };
}
