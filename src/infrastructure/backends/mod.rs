#[cfg(test)]
pub mod mock;
pub mod openai;

use std::sync::Arc;

use crate::domain::models::BackendRef;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> BackendRef {
        return Arc::new(openai::OpenAI::default());
    }
}
