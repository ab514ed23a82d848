#[cfg(test)]
#[path = "session_state_test.rs"]
mod tests;

use anyhow::Result;

use crate::configuration::Settings;
use crate::configuration::TemperatureSettings;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;
use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::SessionPhase;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;

/// Owns one browser session and enforces its lifecycle. Every UI event maps
/// to exactly one method; methods that return `false` or `None` left the
/// session untouched.
pub struct SessionState {
    session: Session,
    pending_reply: Option<String>,
    waiting_for_backend: bool,
}

impl SessionState {
    pub fn new(id: &str, settings: &Settings) -> SessionState {
        return SessionState {
            session: Session::new(
                id,
                &settings.gpt_model_default,
                settings.temperature.value,
            ),
            pending_reply: None,
            waiting_for_backend: false,
        };
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    pub fn phase(&self) -> SessionPhase {
        return self.session.phase();
    }

    pub fn waiting_for_backend(&self) -> bool {
        return self.waiting_for_backend;
    }

    pub fn pending_reply(&self) -> Option<&str> {
        return self.pending_reply.as_deref();
    }

    pub fn set_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if self.session.disabled || name.is_empty() {
            return false;
        }

        self.session.name = Some(name.to_string());
        self.session.disabled = true;
        tracing::debug!(session_id = self.session.id, "Session named");

        return true;
    }

    /// Model and temperature are locked while a reply streams.
    pub fn set_model(&mut self, model: &str, models: &[String]) -> bool {
        if self.session.chat_ended
            || self.waiting_for_backend
            || !models.iter().any(|e| return e == model)
        {
            return false;
        }

        self.session.model = model.to_string();
        return true;
    }

    pub fn set_temperature(&mut self, temperature: f32, bounds: &TemperatureSettings) -> bool {
        if self.session.chat_ended || self.waiting_for_backend || !bounds.accepts(temperature) {
            return false;
        }

        self.session.temperature = temperature;
        return true;
    }

    /// Appends the user's message and returns the completion request for the
    /// whole conversation. Input is only accepted while chatting with no reply
    /// in flight.
    pub fn submit_prompt(&mut self, text: &str) -> Option<BackendPrompt> {
        if self.phase() != SessionPhase::Chatting
            || self.waiting_for_backend
            || text.trim().is_empty()
        {
            return None;
        }

        self.session.messages.push(Message::user(text));
        self.waiting_for_backend = true;
        self.pending_reply = Some("".to_string());

        return Some(BackendPrompt {
            model: self.session.model.to_string(),
            temperature: self.session.temperature,
            messages: self.session.messages.clone(),
        });
    }

    /// Buffers a streamed fragment. The assistant message is only committed
    /// once the final `done` response arrives, and is returned then.
    pub fn handle_backend_response(&mut self, msg: BackendResponse) -> Option<Message> {
        if !self.waiting_for_backend {
            tracing::warn!(
                session_id = self.session.id,
                "Dropping backend response with no reply in flight"
            );
            return None;
        }

        let pending = self.pending_reply.get_or_insert_with(String::new);
        pending.push_str(&msg.text);

        if !msg.done {
            return None;
        }

        let message = Message::assistant(&self.pending_reply.take().unwrap_or_default());
        self.session.messages.push(message.clone());
        self.waiting_for_backend = false;

        return Some(message);
    }

    pub fn handle_backend_error(&mut self) {
        self.pending_reply = None;
        self.waiting_for_backend = false;
    }

    pub fn delete_chat(&mut self) -> bool {
        if self.session.chat_ended || self.waiting_for_backend {
            return false;
        }

        self.session.messages = vec![];
        return true;
    }

    pub fn request_end(&mut self) -> bool {
        if self.phase() != SessionPhase::Chatting || self.waiting_for_backend {
            return false;
        }

        self.session.show_dialog = true;
        return true;
    }

    pub fn cancel_end(&mut self) -> bool {
        if self.phase() != SessionPhase::ConfirmEnd {
            return false;
        }

        self.session.show_dialog = false;
        return true;
    }

    /// Persists the transcript and locks the session. Returns `None` when no
    /// end of chat was requested. A failed write leaves the confirmation
    /// dialog open.
    pub async fn confirm_end(
        &mut self,
        store: &(dyn TranscriptStore + Send + Sync),
    ) -> Result<Option<String>> {
        if self.phase() != SessionPhase::ConfirmEnd {
            return Ok(None);
        }

        let location = self.persist(store).await?;
        self.session.chat_ended = true;
        self.session.show_dialog = false;

        tracing::info!(
            session_id = self.session.id,
            location = location,
            "Chat ended"
        );

        return Ok(Some(location));
    }

    /// Writes the transcript without changing the session's phase.
    pub async fn save_chat(
        &mut self,
        store: &(dyn TranscriptStore + Send + Sync),
    ) -> Result<Option<String>> {
        if self.session.name.is_none() {
            return Ok(None);
        }

        let location = self.persist(store).await?;
        return Ok(Some(location));
    }

    /// Formatted transcript, or an empty string while no chat has started.
    pub fn transcript(&self) -> String {
        return Transcript::from_session(&self.session)
            .map(|transcript| return transcript.format())
            .unwrap_or_default();
    }

    async fn persist(&self, store: &(dyn TranscriptStore + Send + Sync)) -> Result<String> {
        let name = self.session.name.as_deref().unwrap_or_default();
        let location = store.save(name, &self.transcript()).await;

        if let Err(err) = &location {
            tracing::error!(
                session_id = self.session.id,
                store = %store.name(),
                error = ?err,
                "Failed to persist transcript"
            );
        }

        return location;
    }
}
