use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Message;

/// A completion request: the full ordered conversation plus sampling options.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendPrompt {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackendResponse {
    pub text: String,
    pub done: bool,
}

impl BackendResponse {
    pub fn chunk(text: &str) -> BackendResponse {
        return BackendResponse {
            text: text.to_string(),
            done: false,
        };
    }

    pub fn done() -> BackendResponse {
        return BackendResponse {
            text: "".to_string(),
            done: true,
        };
    }
}

#[async_trait]
pub trait Backend {
    /// Used at startup to verify all configurations are available to work with
    /// the backend.
    async fn health_check(&self) -> Result<()>;

    /// Lists all models the backend can serve, sorted.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Requests completions from the backend. Completion results are
    /// streamed back by passing each fragment through the channel, in the
    /// order they are produced.
    ///
    /// Upon receiving all results, a final `done` response is provided as the
    /// last message to the channel.
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<BackendResponse>,
    ) -> Result<()>;
}

pub type BackendRef = Arc<dyn Backend + Send + Sync>;
