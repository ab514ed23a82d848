pub mod bucket;
pub mod local;
#[cfg(test)]
pub mod mock;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Settings;
use crate::domain::models::StoreName;
use crate::domain::models::StoreRef;

pub struct StoreManager {}

impl StoreManager {
    pub fn get(name: StoreName, settings: &Settings) -> Result<StoreRef> {
        match name {
            StoreName::Local => {
                return Ok(Arc::new(local::LocalStore::default()));
            }
            StoreName::Bucket => {
                if settings.bucket_name.trim().is_empty() {
                    bail!("The bucket transcript store requires bucket_name in the settings file");
                }
                return Ok(Arc::new(bucket::BucketStore::new(&settings.bucket_name)));
            }
        }
    }
}
