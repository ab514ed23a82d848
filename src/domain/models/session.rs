use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

/// Where a session sits in the chat lifecycle. Derived from the session flags
/// rather than stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    Naming,
    Chatting,
    ConfirmEnd,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: Option<String>,
    pub disabled: bool,
    pub chat_ended: bool,
    pub show_dialog: bool,
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f32,
}

impl Session {
    pub fn new(id: &str, model: &str, temperature: f32) -> Session {
        return Session {
            id: id.to_string(),
            name: None,
            disabled: false,
            chat_ended: false,
            show_dialog: false,
            messages: vec![],
            model: model.to_string(),
            temperature,
        };
    }

    pub fn phase(&self) -> SessionPhase {
        if self.chat_ended {
            return SessionPhase::Ended;
        }
        if self.show_dialog {
            return SessionPhase::ConfirmEnd;
        }
        if self.name.is_none() {
            return SessionPhase::Naming;
        }

        return SessionPhase::Chatting;
    }
}
