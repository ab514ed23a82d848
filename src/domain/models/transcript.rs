#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

use super::Message;
use super::Session;

pub const TRANSCRIPT_SEPARATOR: &str = "------------------------------";

pub struct Transcript<'a> {
    pub name: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    pub messages: &'a [Message],
}

impl<'a> Transcript<'a> {
    /// Returns `None` while the session has no user name yet.
    pub fn from_session(session: &'a Session) -> Option<Transcript<'a>> {
        let name = session.name.as_deref()?;

        return Some(Transcript {
            name,
            model: &session.model,
            temperature: session.temperature,
            messages: &session.messages,
        });
    }

    pub fn format(&self) -> String {
        let header = [
            format!("Name: {}", self.name),
            format!("Model: {}", self.model),
            format!("Temperature: {}", self.temperature),
            TRANSCRIPT_SEPARATOR.to_string(),
        ]
        .join("\n");

        if self.messages.is_empty() {
            return header;
        }

        let body = self
            .messages
            .iter()
            .map(|message| {
                return message.as_transcript_entry();
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return format!("{header}\n{body}");
    }

    /// File name offered for browser downloads.
    pub fn download_file_name(timestamp: &DateTime<Local>) -> String {
        return format!("Chat {}.txt", timestamp.format("%Y-%m-%d %H-%M-%S"));
    }

    /// Reduces a free text user name to a single, safe path component.
    pub fn file_stem(name: &str) -> String {
        let stem = name
            .trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                    return c;
                }
                return '_';
            })
            .collect::<String>();

        if stem.trim_matches('_').trim().is_empty() {
            return "chat".to_string();
        }

        return stem;
    }
}
