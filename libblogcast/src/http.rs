//! Shared HTTP client plumbing for the remote services

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{HttpError, Result};

/// Fixed timeout for every outbound request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response body quoted back in error messages
const MAX_ERROR_BODY_CHARS: usize = 2000;

pub(crate) fn build_client(service: &'static str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("blogcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| HttpError::Transport { service, source }.into())
}

/// Turn a response into `T`, surfacing non-success statuses with their body
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| HttpError::Transport { service, source })?;

    if !status.is_success() {
        tracing::debug!("{} responded with HTTP {}", service, status.as_u16());
        return Err(HttpError::Status {
            service,
            status: status.as_u16(),
            body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
        }
        .into());
    }

    serde_json::from_str(&body).map_err(|e| {
        HttpError::Decode {
            service,
            reason: format!("{} (body: {})", e, truncate_chars(&body, 200)),
        }
        .into()
    })
}

/// First `max` characters of `text`, never splitting a character
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
