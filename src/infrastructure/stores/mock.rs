use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::StoreName;
use crate::domain::models::TranscriptStore;

/// Records every transcript it is asked to save.
#[derive(Default)]
pub struct MockStore {
    fail: bool,
    saved: Mutex<Vec<(String, String)>>,
}

impl MockStore {
    pub fn failing() -> MockStore {
        return MockStore {
            fail: true,
            ..MockStore::default()
        };
    }

    pub fn saved(&self) -> Vec<(String, String)> {
        return self.saved.lock().unwrap().clone();
    }
}

#[async_trait]
impl TranscriptStore for MockStore {
    fn name(&self) -> StoreName {
        return StoreName::Local;
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, username: &str, transcript: &str) -> Result<String> {
        if self.fail {
            bail!("Mock store failure");
        }

        self.saved
            .lock()
            .unwrap()
            .push((username.to_string(), transcript.to_string()));

        return Ok(format!("mock://{username}"));
    }
}
