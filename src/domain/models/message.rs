#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            role,
            content: content.to_string(),
        };
    }

    pub fn user(content: &str) -> Message {
        return Message::new(Role::User, content);
    }

    pub fn assistant(content: &str) -> Message {
        return Message::new(Role::Assistant, content);
    }

    /// Renders the message as a `role: content` transcript entry.
    pub fn as_transcript_entry(&self) -> String {
        return format!("{}: {}", self.role, self.content);
    }
}
