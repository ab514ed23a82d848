use super::render;
use crate::configuration::Settings;
use crate::domain::models::BackendResponse;
use crate::domain::models::SessionPhase;
use crate::domain::services::SessionState;

fn models() -> Vec<String> {
    return vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()];
}

#[test]
fn it_renders_naming_state() {
    let settings = Settings::default();
    let state = SessionState::new("abc", &settings);
    let view = render(&state, &settings, &models());

    assert_eq!(view.session_id, "abc");
    assert_eq!(view.phase, SessionPhase::Naming);
    assert_eq!(view.name_field.value, "");
    assert!(!view.name_field.disabled);
    assert!(!view.chat_input_enabled);
    assert!(!view.end_chat_visible);

    let sidebar = view.sidebar.unwrap();
    assert_eq!(sidebar.models, models());
    assert_eq!(sidebar.model, "gpt-3.5-turbo");
    assert!(!sidebar.download_enabled);
    assert!(!sidebar.save_enabled);
}

#[test]
fn it_hides_sidebar() {
    let settings = Settings {
        sidebar_show: false,
        ..Settings::default()
    };
    let state = SessionState::new("abc", &settings);

    assert!(render(&state, &settings, &models()).sidebar.is_none());
}

#[test]
fn it_renders_chatting_state() {
    let settings = Settings::default();
    let mut state = SessionState::new("abc", &settings);
    state.set_name("Ada");
    state.set_temperature(0.3, &settings.temperature);

    let view = render(&state, &settings, &models());

    assert_eq!(view.phase, SessionPhase::Chatting);
    assert_eq!(view.name_field.value, "Ada");
    assert!(view.name_field.disabled);
    assert!(view.chat_input_enabled);
    assert!(view.end_chat_visible);

    let sidebar = view.sidebar.unwrap();
    assert_eq!(sidebar.temperature.value, 0.3);
    assert_eq!(sidebar.temperature.max_value, 1.0);
    assert!(sidebar.delete_enabled);
    assert!(sidebar.download_enabled);
}

#[test]
fn it_renders_pending_reply() {
    let settings = Settings::default();
    let mut state = SessionState::new("abc", &settings);
    state.set_name("Ada");
    state.submit_prompt("Hello");
    state.handle_backend_response(BackendResponse::chunk("Hi"));

    let view = render(&state, &settings, &models());

    assert!(view.waiting_for_backend);
    assert!(!view.chat_input_enabled);
    assert_eq!(view.pending_reply.as_deref(), Some("Hi"));
    assert_eq!(view.messages.len(), 1);
    let sidebar = view.sidebar.unwrap();
    assert!(!sidebar.delete_enabled);
    assert!(!sidebar.settings_enabled);
}

#[test]
fn it_renders_confirm_dialog() {
    let settings = Settings::default();
    let mut state = SessionState::new("abc", &settings);
    state.set_name("Ada");
    state.request_end();

    let view = render(&state, &settings, &models());

    assert_eq!(view.phase, SessionPhase::ConfirmEnd);
    assert!(view.show_dialog);
    assert!(!view.chat_input_enabled);
    assert!(!view.end_chat_visible);
}

#[test]
fn it_does_not_mutate_state() {
    let settings = Settings::default();
    let mut state = SessionState::new("abc", &settings);
    state.set_name("Ada");

    let first = render(&state, &settings, &models());
    let second = render(&state, &settings, &models());

    assert_eq!(first, second);
}
