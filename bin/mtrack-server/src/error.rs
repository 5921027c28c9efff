//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Remote failures keep their human-readable message: the browser client
//! shows it and falls back to the local model list, so no remote error is
//! ever fatal to the process.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use mtrack_remote::{RemoteError, SettingsError};

/// All errors that can occur in the mtrack-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the remote-config layer.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Propagated from the settings store.
    #[error("settings store error: {0}")]
    Settings(#[from] SettingsError),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),

            ServerError::Remote(e) => {
                let status = match e {
                    RemoteError::ConfigNotFound { .. } | RemoteError::FileNotFound { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    RemoteError::InvalidCredential => StatusCode::UNAUTHORIZED,
                    RemoteError::RateLimitedOrDenied => StatusCode::FORBIDDEN,
                    RemoteError::NotConfigured => StatusCode::BAD_REQUEST,
                    RemoteError::MalformedConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    RemoteError::TransportError { .. }
                    | RemoteError::Http(_)
                    | RemoteError::Envelope(_) => StatusCode::BAD_GATEWAY,
                };
                (status, e.to_string())
            }

            // Internal errors: log the full detail, return a generic message.
            ServerError::Settings(e) => {
                error!(error = %e, "settings store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
