//! Gemini `generateContent` backend

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::{ContentError, HttpError, Result};
use crate::http::{build_client, read_json};
use crate::normalizer::GenerativeBackend;

const SERVICE: &str = "Gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    api_key: SecretString,
    endpoint: String,
    generation: GenerationConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = SecretString::from(config.require_api_key()?.to_string());
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            api_key,
            endpoint,
            generation: GenerationConfig {
                temperature: config.temperature,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
                response_mime_type: "application/json",
            },
            http: build_client(SERVICE)?,
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, parts: &[&str]) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: parts.iter().map(|&text| Part { text }).collect(),
            }],
            generation_config: self.generation.clone(),
        };

        tracing::debug!("Requesting generation from {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|source| HttpError::Transport {
                service: SERVICE,
                source,
            })?;

        let body: GenerateResponse = read_json(SERVICE, response).await?;
        let text = body.into_text();

        if text.trim().is_empty() {
            return Err(ContentError::EmptyResponse.into());
        }

        Ok(text)
    }
}
