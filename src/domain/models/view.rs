use serde_derive::Serialize;

use super::Message;
use super::SessionPhase;
use crate::configuration::TemperatureSettings;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NameFieldView {
    pub value: String,
    pub disabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarView {
    pub models: Vec<String>,
    pub model: String,
    pub temperature: TemperatureSettings,
    pub settings_enabled: bool,
    pub delete_enabled: bool,
    pub download_enabled: bool,
    pub save_enabled: bool,
}

/// Everything the browser needs to draw one frame of the chat page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct View {
    pub session_id: String,
    pub phase: SessionPhase,
    pub name_field: NameFieldView,
    pub messages: Vec<Message>,
    pub pending_reply: Option<String>,
    pub waiting_for_backend: bool,
    pub chat_input_enabled: bool,
    pub end_chat_visible: bool,
    pub show_dialog: bool,
    pub chat_ended: bool,
    pub sidebar: Option<SidebarView>,
}
