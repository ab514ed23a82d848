use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::Backend;
use crate::domain::models::BackendPrompt;
use crate::domain::models::BackendResponse;

/// Replays fixed chunks and records every prompt it receives.
pub struct MockBackend {
    chunks: Vec<String>,
    fail: bool,
    send_done: bool,
    prompts: Mutex<Vec<BackendPrompt>>,
}

impl MockBackend {
    pub fn new(chunks: Vec<&str>) -> MockBackend {
        return MockBackend {
            chunks: chunks.iter().map(|e| return e.to_string()).collect(),
            fail: false,
            send_done: true,
            prompts: Mutex::new(vec![]),
        };
    }

    /// Sends its chunks, then fails instead of finishing.
    pub fn failing(chunks: Vec<&str>) -> MockBackend {
        return MockBackend {
            fail: true,
            ..MockBackend::new(chunks)
        };
    }

    /// Sends its chunks and returns without the final `done` response.
    pub fn without_done(chunks: Vec<&str>) -> MockBackend {
        return MockBackend {
            send_done: false,
            ..MockBackend::new(chunks)
        };
    }

    pub fn prompts(&self) -> Vec<BackendPrompt> {
        return self.prompts.lock().unwrap().clone();
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        return Ok(vec!["gpt-3.5-turbo".to_string(), "gpt-4".to_string()]);
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion<'a>(
        &self,
        prompt: BackendPrompt,
        tx: &'a mpsc::UnboundedSender<BackendResponse>,
    ) -> Result<()> {
        self.prompts.lock().unwrap().push(prompt);

        for chunk in &self.chunks {
            tx.send(BackendResponse::chunk(chunk))?;
        }
        if self.fail {
            bail!("Mock backend failure");
        }
        if self.send_done {
            tx.send(BackendResponse::done())?;
        }

        return Ok(());
    }
}
