//! Three-legged OAuth2 authorization-code flow against WordPress.com
//!
//! The flow is run once, interactively, to obtain the access token that the
//! publisher uses afterwards:
//!
//! 1. build the authorization URL and show it to the user
//! 2. capture the redirect on a local [`CallbackListener`]
//! 3. exchange the code at the token endpoint
//! 4. persist the response with the [`TokenStore`]
//!
//! # Example
//!
//! ```no_run
//! use libblogcast::{AuthorizationFlow, Config, TokenStore};
//!
//! # async fn example() -> libblogcast::Result<()> {
//! let config = Config::load()?;
//! let flow = AuthorizationFlow::from_config(&config.wordpress)?;
//! let store = TokenStore::new(config.token_path());
//!
//! let record = flow
//!     .run(&store, |url| println!("Open this URL in your browser:\n{}", url))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod callback;

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::config::WordPressConfig;
use crate::error::{AuthError, ConfigError, Result};
use crate::http::REQUEST_TIMEOUT;
use crate::token_store::TokenStore;
use crate::types::TokenRecord;

pub use callback::CallbackListener;

/// How long the flow waits for the user to approve access
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Single-use code delivered by the authorization server's redirect
///
/// Not `Clone`: exchanging it consumes it.
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode([REDACTED])")
    }
}

pub struct AuthorizationFlow {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    callback_path: String,
    authorize_url: Url,
    token_url: Url,
    scope: String,
    callback_addr: SocketAddr,
    callback_timeout: Duration,
    http: reqwest::Client,
}

impl AuthorizationFlow {
    /// Build the flow from the WordPress section of the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the client id/secret are missing, a URL
    /// does not parse, or the redirect URI cannot be served locally.
    pub fn from_config(config: &WordPressConfig) -> Result<Self> {
        let client_id = config.require_client_id()?.to_string();
        let client_secret = SecretString::from(config.require_client_secret()?.to_string());

        let redirect = parse_url("wordpress.redirect_uri", &config.redirect_uri)?;
        let (callback_port, callback_path) = callback_endpoint(&redirect)?;
        let authorize_url = parse_url("wordpress.authorize_url", &config.authorize_url)?;
        let token_url = parse_url("wordpress.token_url", &config.token_url)?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AuthError::Transport)?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: config.redirect_uri.clone(),
            callback_path,
            authorize_url,
            token_url,
            scope: config.scope.clone(),
            callback_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, callback_port)),
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
            http,
        })
    }

    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    pub fn with_callback_port(mut self, port: u16) -> Self {
        self.callback_addr.set_port(port);
        self
    }

    /// URL the user opens to grant access
    pub fn authorization_url(&self) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope);
        url
    }

    /// Bind the callback listener; the returned handle completes the flow
    pub async fn start(&self) -> Result<PendingAuthorization<'_>> {
        let listener = CallbackListener::bind(self.callback_addr, &self.callback_path).await?;

        Ok(PendingAuthorization {
            flow: self,
            url: self.authorization_url(),
            listener,
        })
    }

    /// Run the whole flow, handing the authorization URL to `present`
    pub async fn run<F>(&self, store: &TokenStore, present: F) -> Result<TokenRecord>
    where
        F: FnOnce(&Url),
    {
        let pending = self.start().await?;
        present(pending.authorization_url());
        pending.complete(store).await
    }

    /// Trade an authorization code for an access token
    pub async fn exchange_code(&self, code: AuthorizationCode) -> Result<TokenRecord> {
        tracing::debug!("Exchanging authorization code at {}", self.token_url);

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
        ];

        let response = self
            .http
            .post(self.token_url.clone())
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::Transport)?;

        if !status.is_success() {
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let record: TokenRecord = serde_json::from_str(&body).map_err(|e| {
            AuthError::InvalidTokenResponse(format!("expected JSON with access_token: {}", e))
        })?;

        if record.access_token.trim().is_empty() {
            return Err(AuthError::InvalidTokenResponse("access_token is empty".to_string()).into());
        }

        tracing::info!("Access token obtained");
        Ok(record)
    }
}

/// A flow whose callback listener is up and waiting
pub struct PendingAuthorization<'a> {
    flow: &'a AuthorizationFlow,
    url: Url,
    listener: CallbackListener,
}

impl PendingAuthorization<'_> {
    pub fn authorization_url(&self) -> &Url {
        &self.url
    }

    pub fn callback_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Wait for the redirect, exchange the code and persist the token
    ///
    /// Nothing is written unless the exchange succeeds.
    pub async fn complete(self, store: &TokenStore) -> Result<TokenRecord> {
        let code = self
            .listener
            .wait_for_code(self.flow.callback_timeout)
            .await?;
        let record = self.flow.exchange_code(code).await?;
        store.save(&record)?;
        Ok(record)
    }
}

/// Port and path the local listener must serve for `redirect` to reach it
fn callback_endpoint(redirect: &Url) -> Result<(u16, String)> {
    let invalid = |reason: String| {
        ConfigError::InvalidValue {
            field: "wordpress.redirect_uri".to_string(),
            reason,
        }
    };

    if !matches!(redirect.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "'{}' must be an http(s) URL served by the local callback listener",
            redirect
        ))
        .into());
    }

    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| invalid(format!("'{}' has no port", redirect)))?;

    let path = redirect.path();
    if !path.starts_with('/') {
        return Err(invalid(format!("'{}' has no absolute path", redirect)).into());
    }

    Ok((port, path.to_string()))
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("'{}' is not a valid URL: {}", value, e),
        }
        .into()
    })
}
