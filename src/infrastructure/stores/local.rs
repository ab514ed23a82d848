#[cfg(test)]
#[path = "local_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreName;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;

/// Writes transcripts to `<dir>/chats/<name>.txt`. Saving again for the same
/// name replaces the previous file.
pub struct LocalStore {
    pub dir: path::PathBuf,
}

impl Default for LocalStore {
    fn default() -> LocalStore {
        return LocalStore::new(path::PathBuf::from(Config::get(
            ConfigKey::TranscriptsDir,
        )));
    }
}

impl LocalStore {
    pub fn new(dir: path::PathBuf) -> LocalStore {
        return LocalStore { dir };
    }

    fn chats_dir(&self) -> path::PathBuf {
        return self.dir.join("chats");
    }

    pub fn get_file_path(&self, username: &str) -> path::PathBuf {
        return self
            .chats_dir()
            .join(format!("{}.txt", Transcript::file_stem(username)));
    }
}

#[async_trait]
impl TranscriptStore for LocalStore {
    fn name(&self) -> StoreName {
        return StoreName::Local;
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, username: &str, transcript: &str) -> Result<String> {
        let chats_dir = self.chats_dir();
        if !chats_dir.exists() {
            fs::create_dir_all(&chats_dir).await?;
        }

        let file_path = self.get_file_path(username);
        if file_path.exists() {
            tracing::warn!(
                path = ?file_path,
                "Overwriting existing transcript, sessions sharing a name replace each other"
            );
        }

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(transcript.as_bytes()).await?;
        file.flush().await?;

        return Ok(file_path.to_string_lossy().to_string());
    }
}
