//! Error types for the client facade.

use thiserror::Error;

use notarie_api::ApiError;
use notarie_auth::AuthError;
use notarie_core::ValidationError;
use notarie_store::StoreError;

/// Errors from client operations.
///
/// Lifecycle verdicts from the backend (`Unauthorized`, `AlreadySigned`,
/// `InvalidState`, `NotFound`, `Expired`) arrive inside [`ApiError`] and
/// are surfaced verbatim; nothing is swallowed or retried here.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad input, caught before any network call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Challenge-response failure.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Backend failure or lifecycle verdict.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Credential store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The operation requires a live credential and none exists.
    #[error("not authenticated")]
    NotAuthenticated,

    /// A local byte source could not be fully read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
