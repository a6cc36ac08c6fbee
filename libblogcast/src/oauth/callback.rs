//! Short-lived local listener that captures the OAuth redirect
//!
//! The listener serves a single route on a spawned task. The first request
//! carrying `code` (or `error`) resolves a oneshot channel; the flow awaits
//! that channel with a timeout and then shuts the server down.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{AuthError, Result};
use crate::oauth::AuthorizationCode;

pub const SUCCESS_BODY: &str = "Authorization code received. You can close this window.";
const DENIED_BODY: &str = "Authorization was denied. You can close this window.";

/// Grace period for in-flight responses once a code is captured
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// `Ok(code)` or `Err(reason)` when the user denied access
type Outcome = std::result::Result<String, String>;

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Clone)]
struct CallbackState {
    slot: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

pub struct CallbackListener {
    local_addr: SocketAddr,
    outcome_rx: oneshot::Receiver<Outcome>,
    shutdown_tx: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl CallbackListener {
    /// Bind `addr` and start serving `path`
    pub async fn bind(addr: SocketAddr, path: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AuthError::Listener(format!("cannot bind {}: {}", addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| AuthError::Listener(e.to_string()))?;

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let state = CallbackState {
            slot: Arc::new(Mutex::new(Some(outcome_tx))),
        };

        let app = Router::new()
            .route(path, get(handle_callback))
            .fallback(not_found)
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::debug!("Callback listener serving {} on {}", path, local_addr);

        Ok(Self {
            local_addr,
            outcome_rx,
            shutdown_tx,
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the redirect, then tear the listener down
    pub async fn wait_for_code(self, timeout: Duration) -> Result<AuthorizationCode> {
        let Self {
            outcome_rx,
            shutdown_tx,
            mut server,
            ..
        } = self;

        let outcome = tokio::time::timeout(timeout, outcome_rx).await;

        let _ = shutdown_tx.send(());
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(Ok(()))) => tracing::debug!("Callback listener stopped"),
            Ok(Ok(Err(e))) => tracing::warn!("Callback listener exited with error: {}", e),
            Ok(Err(e)) => tracing::warn!("Callback listener task failed: {}", e),
            Err(_) => {
                tracing::debug!("Callback listener still draining connections, aborting");
                server.abort();
            }
        }

        match outcome {
            Ok(Ok(Ok(code))) => Ok(AuthorizationCode::new(code)),
            Ok(Ok(Err(reason))) => Err(AuthError::Denied(reason).into()),
            Ok(Err(_)) => Err(AuthError::Listener(
                "listener stopped before a code arrived".to_string(),
            )
            .into()),
            Err(_) => Err(AuthError::Timeout(timeout).into()),
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    let outcome: Outcome = match (params.code, params.error) {
        (Some(code), _) if !code.is_empty() => Ok(code),
        (_, Some(error)) => Err(match params.error_description {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        }),
        _ => return (StatusCode::BAD_REQUEST, "Missing authorization code."),
    };

    let sender = state.slot.lock().ok().and_then(|mut slot| slot.take());
    let Some(sender) = sender else {
        return (StatusCode::GONE, "Authorization already completed.");
    };

    let accepted = outcome.is_ok();
    if sender.send(outcome).is_err() {
        tracing::debug!("Callback arrived after the flow stopped waiting");
    }

    if accepted {
        tracing::info!("Authorization code received");
        (StatusCode::OK, SUCCESS_BODY)
    } else {
        tracing::warn!("Authorization denied by the user");
        (StatusCode::OK, DENIED_BODY)
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
