use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StoreName {
    Local,
    Bucket,
}

impl StoreName {
    pub fn parse(text: &str) -> Option<StoreName> {
        return StoreName::iter().find(|e| return e.to_string() == text);
    }
}

#[async_trait]
pub trait TranscriptStore {
    fn name(&self) -> StoreName;

    /// Persists a formatted transcript for the given user, returning the
    /// location it was written to.
    async fn save(&self, username: &str, transcript: &str) -> Result<String>;
}

pub type StoreRef = Arc<dyn TranscriptStore + Send + Sync>;
