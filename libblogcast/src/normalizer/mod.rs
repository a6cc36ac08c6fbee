//! Generative content normalizer
//!
//! Turns free-form text into a validated [`PostDraft`]. The raw text is sent to
//! a [`GenerativeBackend`] together with the editor instructions from
//! [`prompt`]; the reply is recovered into a JSON object by [`extract`],
//! repaired, and validated.
//!
//! # Examples
//!
//! ```no_run
//! use libblogcast::config::GeminiConfig;
//! use libblogcast::normalizer::{gemini::GeminiClient, ContentNormalizer};
//!
//! # async fn example() -> libblogcast::error::Result<()> {
//! let config = GeminiConfig {
//!     api_key: Some("your-api-key".to_string()),
//!     ..GeminiConfig::default()
//! };
//!
//! let normalizer = ContentNormalizer::new(Box::new(GeminiClient::from_config(&config)?), &config.language);
//! let draft = normalizer.normalize("Notes on setting up tokio...").await?;
//! println!("{}", draft.title);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::config::GeminiConfig;
use crate::error::{ContentError, Result};
use crate::types::PostDraft;

pub mod extract;
pub mod gemini;
pub mod prompt;

// Available outside tests so integration tests and binaries can swap it in
pub mod mock;

/// A service that answers a single prompt with text
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate a reply for one user turn made of `parts`
    ///
    /// # Errors
    ///
    /// Returns `HttpError` for transport and status failures, and
    /// `ContentError::EmptyResponse` when the service produced no text.
    async fn generate(&self, parts: &[&str]) -> Result<String>;
}

pub struct ContentNormalizer {
    backend: Box<dyn GenerativeBackend>,
    instructions: String,
}

impl ContentNormalizer {
    pub fn new(backend: Box<dyn GenerativeBackend>, language: &str) -> Self {
        Self {
            backend,
            instructions: prompt::instructions(language),
        }
    }

    /// Normalizer backed by Gemini, configured from `config`
    pub fn gemini(config: &GeminiConfig) -> Result<Self> {
        let client = gemini::GeminiClient::from_config(config)?;
        Ok(Self::new(Box::new(client), &config.language))
    }

    /// Generate a draft for `raw_text`
    pub async fn normalize(&self, raw_text: &str) -> Result<PostDraft> {
        let reply = self
            .backend
            .generate(&[self.instructions.as_str(), prompt::INPUT_SEPARATOR, raw_text])
            .await?;

        let draft = parse_draft(&reply)?;
        for warning in draft.warnings() {
            tracing::warn!("{}", warning);
        }

        Ok(draft)
    }
}

/// Recover, repair and validate a backend reply
pub fn parse_draft(reply: &str) -> Result<PostDraft> {
    if reply.trim().is_empty() {
        return Err(ContentError::EmptyResponse.into());
    }

    let (mut object, recovery) = extract::parse_object(reply)?;
    if recovery == extract::Recovery::Sanitized {
        tracing::info!("Generated content needed cleanup before parsing");
    }

    repair(&mut object);
    PostDraft::from_object(&object)
}

/// Default the optional fields so a partial reply still validates
fn repair(object: &mut Map<String, Value>) {
    for key in ["tags", "categories"] {
        if !matches!(object.get(key), Some(Value::Array(_))) {
            object.insert(key.to_string(), Value::Array(Vec::new()));
        }
    }

    if !matches!(object.get("slug"), Some(Value::String(_))) {
        object.insert("slug".to_string(), Value::String(String::new()));
    }
}
