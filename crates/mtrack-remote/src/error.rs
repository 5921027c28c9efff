//! Error taxonomy for the remote-config layer.

use thiserror::Error;

/// Errors surfaced by remote-config operations.
///
/// None of these are retried automatically and none are fatal: a caller is
/// expected to fall back to its local data source and show the message.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The configured config file does not exist at the requested ref.
    #[error("config file not found: {path}")]
    ConfigNotFound { path: String },

    /// An auxiliary file does not exist at the requested ref.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// The remote rejected the supplied access token.
    #[error("authorization rejected; check the configured access token")]
    InvalidCredential,

    /// The remote returned 403: rate limited or access denied.
    #[error("access forbidden by the remote (rate limited or denied)")]
    RateLimitedOrDenied,

    /// Any other non-success transport status.
    #[error("remote request failed with status {status}")]
    TransportError { status: u16 },

    /// The decoded config content was not a record list.
    #[error("malformed config: {0}")]
    MalformedConfig(String),

    /// An operation that needs connection settings was attempted without any.
    #[error("no repository connection is configured")]
    NotConfigured,

    /// The request itself failed before a status was available.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response envelope could not be decoded into text.
    #[error("invalid content envelope: {0}")]
    Envelope(String),
}

/// Classified outcome of a failed raw content fetch, before the caller
/// decides whether a missing path means a missing config file or a missing
/// auxiliary file.
#[derive(Debug)]
pub enum TransportFailure {
    NotFound,
    Unauthorized,
    Forbidden,
    Status(u16),
    Http(reqwest::Error),
    Envelope(String),
}

impl TransportFailure {
    /// Map onto the error for the main config fetch path.
    pub fn into_config_error(self, path: &str) -> RemoteError {
        self.classify(|| RemoteError::ConfigNotFound {
            path: path.to_owned(),
        })
    }

    /// Map onto the error for auxiliary file retrieval.
    pub fn into_file_error(self, path: &str) -> RemoteError {
        self.classify(|| RemoteError::FileNotFound {
            path: path.to_owned(),
        })
    }

    fn classify(self, not_found: impl FnOnce() -> RemoteError) -> RemoteError {
        match self {
            TransportFailure::NotFound => not_found(),
            TransportFailure::Unauthorized => RemoteError::InvalidCredential,
            TransportFailure::Forbidden => RemoteError::RateLimitedOrDenied,
            TransportFailure::Status(status) => RemoteError::TransportError { status },
            TransportFailure::Http(e) => RemoteError::Http(e),
            TransportFailure::Envelope(m) => RemoteError::Envelope(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path_verbatim() {
        let err = TransportFailure::NotFound.into_config_error("configs/models.yaml");
        assert_eq!(
            err.to_string(),
            "config file not found: configs/models.yaml"
        );

        let err = TransportFailure::NotFound.into_file_error("docs/card.md");
        assert_eq!(err.to_string(), "file not found: docs/card.md");
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            TransportFailure::Unauthorized.into_config_error("p"),
            RemoteError::InvalidCredential
        ));
        assert!(matches!(
            TransportFailure::Forbidden.into_config_error("p"),
            RemoteError::RateLimitedOrDenied
        ));
        assert!(matches!(
            TransportFailure::Status(500).into_config_error("p"),
            RemoteError::TransportError { status: 500 }
        ));
    }
}
