#[cfg(test)]
#[path = "bucket_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Local;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreName;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;

/// Uploads transcripts as new objects through the object storage JSON API.
/// Every save creates a separate `<name>_<timestamp>.txt` object.
pub struct BucketStore {
    url: String,
    token: String,
    bucket: String,
}

impl BucketStore {
    pub fn new(bucket: &str) -> BucketStore {
        return BucketStore {
            url: Config::get(ConfigKey::BucketURL),
            token: Config::get(ConfigKey::BucketToken),
            bucket: bucket.to_string(),
        };
    }

    pub fn object_name(username: &str, timestamp: &DateTime<Local>) -> String {
        return format!(
            "{}_{}.txt",
            Transcript::file_stem(username),
            timestamp.format("%Y-%m-%d_%H-%M-%S_%3f")
        );
    }
}

#[async_trait]
impl TranscriptStore for BucketStore {
    fn name(&self) -> StoreName {
        return StoreName::Bucket;
    }

    #[allow(clippy::implicit_return)]
    async fn save(&self, username: &str, transcript: &str) -> Result<String> {
        let object = BucketStore::object_name(username, &Local::now());

        let mut req = reqwest::Client::new()
            .post(format!(
                "{url}/upload/storage/v1/b/{bucket}/o",
                url = self.url,
                bucket = self.bucket
            ))
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(transcript.to_string());

        if !self.token.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.token));
        }

        let res = req.send().await?;
        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                bucket = self.bucket,
                object = object,
                "Failed to upload transcript"
            );
            bail!(format!(
                "Failed to upload transcript to bucket {}, status {}",
                self.bucket,
                res.status().as_u16()
            ));
        }

        return Ok(format!("{}/{}", self.bucket, object));
    }
}
