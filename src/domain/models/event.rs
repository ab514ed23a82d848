use serde_derive::Serialize;

use super::Message;

/// Events forwarded to the browser while an assistant reply streams.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyEvent {
    Chunk { text: String },
    Done { message: Message },
    Error { error: String },
}

impl ReplyEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ReplyEvent::Chunk { .. } => return "chunk",
            ReplyEvent::Done { .. } => return "done",
            ReplyEvent::Error { .. } => return "error",
        }
    }
}
