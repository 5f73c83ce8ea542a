//! Error types for backend operations.

use thiserror::Error;

/// Errors returned by the backend seam.
///
/// Lifecycle precondition violations (`Unauthorized`, `AlreadySigned`,
/// `InvalidState`) and missing/stale resources (`NotFound`, `Expired`) are
/// surfaced verbatim to the caller. `Http` is a transport failure the user
/// may manually retry; nothing here retries automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status with no more specific mapping.
    #[error("server error {status}: {message}")]
    Status { status: u16, message: String },

    /// The request lacked a valid credential or the identity is not
    /// permitted to perform the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The addressed resource exists but is no longer active.
    #[error("expired: {0}")]
    Expired(String),

    /// The document has already been signed; signing is at-most-once.
    #[error("document already signed")]
    AlreadySigned,

    /// The document's lifecycle state does not permit the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The server response could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether this failure is a transport problem that a manual retry
    /// could plausibly resolve.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Http(_))
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;
