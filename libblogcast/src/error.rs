//! Error types for Blogcast

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlogcastError>;

#[derive(Error, Debug)]
pub enum BlogcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl BlogcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BlogcastError::InvalidInput(_) => 3,
            BlogcastError::Auth(_) => 2,
            BlogcastError::Http(HttpError::Status { status, .. })
                if *status == 401 || *status == 403 =>
            {
                2
            }
            BlogcastError::Http(_) => 1,
            BlogcastError::Config(_) => 1,
            BlogcastError::TokenStore(_) => 1,
            BlogcastError::Content(_) => 1,
            BlogcastError::Output(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No authorization code received within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("Callback listener failed: {0}")]
    Listener(String),

    #[error("Token exchange rejected (HTTP {status}): {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Token endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Token response is unusable: {0}")]
    InvalidTokenResponse(String),
}

#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("No token found at {}. Run blog-auth first.", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unreadable response: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Generated content is not valid JSON. Beginning of the cleaned text:\n{snippet}\n\nCause: {source}")]
    Parse {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generated content is JSON but not an object")]
    NotAnObject,

    #[error("Generated content is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Generated content field '{0}' must be a string")]
    NotAString(&'static str),

    #[error("Generative backend returned no text")]
    EmptyResponse,
}
