//! Configuration management for Blogcast
//!
//! Settings come from an optional TOML file and are then overridden by
//! process environment variables (a `.env` file in the working directory is
//! loaded first). The resulting [`Config`] is built once at startup and passed
//! to each component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::PostStatus;

pub const DEFAULT_API_BASE: &str = "https://public-api.wordpress.com/rest/v1.1";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://public-api.wordpress.com/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://public-api.wordpress.com/oauth2/token";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CALLBACK_PORT: u16 = 8765;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wordpress: WordPressConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Also decides where the callback listener binds (port and path)
    pub redirect_uri: String,
    /// Site identifier, e.g. `example.wordpress.com`
    pub site: Option<String>,
    pub api_base: String,
    pub authorize_url: String,
    pub token_url: String,
    pub scope: String,
    pub token_file: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Language the generated post is written in
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub default_status: PostStatus,
    /// When set, replaces the categories of every draft
    pub fixed_categories: Option<Vec<String>>,
}

impl Default for WordPressConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: format!("http://localhost:{}/callback", DEFAULT_CALLBACK_PORT),
            site: None,
            api_base: DEFAULT_API_BASE.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            scope: "global".to_string(),
            token_file: "~/.config/blogcast/wp_token.json".to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            temperature: 0.3,
            top_p: 0.9,
            max_output_tokens: 2048,
            language: "Korean".to_string(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_status: PostStatus::Draft,
            fixed_categories: None,
        }
    }
}

impl fmt::Debug for WordPressConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordPressConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uri", &self.redirect_uri)
            .field("site", &self.site)
            .field("api_base", &self.api_base)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .field("token_file", &self.token_file)
            .finish()
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("language", &self.language)
            .finish()
    }
}

impl Config {
    /// Load configuration from the default location, `.env` and the environment
    ///
    /// A missing config file is not an error: defaults are used and the
    /// environment fills in credentials.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Override file values with environment variables
    ///
    /// Empty values are ignored so that a blank `.env` entry does not wipe a
    /// value from the config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("WP_CLIENT_ID") {
            self.wordpress.client_id = Some(v);
        }
        if let Some(v) = get("WP_CLIENT_SECRET") {
            self.wordpress.client_secret = Some(v);
        }
        if let Some(v) = get("WP_REDIRECT_URI") {
            self.wordpress.redirect_uri = v;
        }
        if let Some(v) = get("WP_SITE") {
            self.wordpress.site = Some(v);
        }
        if let Some(v) = get("WP_TOKEN_FILE") {
            self.wordpress.token_file = v;
        }
        if let Some(v) = get("GEMINI_API_KEY") {
            self.gemini.api_key = Some(v);
        }
        if let Some(v) = get("GEMINI_MODEL") {
            self.gemini.model = v;
        }
    }

    /// Expanded path of the persisted token file
    pub fn token_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.wordpress.token_file).to_string())
    }
}

impl WordPressConfig {
    pub fn require_client_id(&self) -> Result<&str> {
        require(&self.client_id, "wordpress.client_id (WP_CLIENT_ID)")
    }

    pub fn require_client_secret(&self) -> Result<&str> {
        require(&self.client_secret, "wordpress.client_secret (WP_CLIENT_SECRET)")
    }

    pub fn require_site(&self) -> Result<&str> {
        require(&self.site, "wordpress.site (WP_SITE)")
    }
}

impl GeminiConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        require(&self.api_key, "gemini.api_key (GEMINI_API_KEY)")
    }
}

fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingField(field.to_string()).into())
}

/// Resolve the configuration file path, honoring `BLOGCAST_CONFIG` and XDG conventions
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BLOGCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("blogcast").join("config.toml"))
}
