//! Blogcast - turn raw notes into published blog posts
//!
//! This library provides the pieces behind the `blog-auth` and `blog-post`
//! tools: a one-time OAuth2 authorization flow against WordPress.com, a
//! normalizer that turns free-form text into a structured post via a
//! generative-text backend, and a publisher for the platform's REST API.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod normalizer;
pub mod oauth;
pub mod publisher;
pub mod summary;
pub mod token_store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{BlogcastError, Result};
pub use normalizer::ContentNormalizer;
pub use oauth::AuthorizationFlow;
pub use publisher::PostPublisher;
pub use token_store::TokenStore;
pub use types::{PostDraft, PostStatus, PublishedPost, TokenRecord};
