//! Mock generative backend for testing
//!
//! Replies with canned text (or a canned failure) and records every prompt it
//! receives, so normalizer behavior can be verified without network access.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{HttpError, Result};
use crate::normalizer::GenerativeBackend;

/// Prompts received so far, one `Vec` of parts per call
pub type RecordedPrompts = Arc<Mutex<Vec<Vec<String>>>>;

pub struct MockBackend {
    reply: Option<String>,
    prompts: RecordedPrompts,
}

impl MockBackend {
    /// Backend that always answers with `reply`
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend that always fails as an unavailable service
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle for inspecting prompts after the backend has been moved
    pub fn prompts(&self) -> RecordedPrompts {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, parts: &[&str]) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(parts.iter().map(|p| p.to_string()).collect());
        }

        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(HttpError::Status {
                service: "mock",
                status: 503,
                body: "mock backend unavailable".to_string(),
            }
            .into()),
        }
    }
}
