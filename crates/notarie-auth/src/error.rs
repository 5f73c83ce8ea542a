//! Error types for authentication.

use thiserror::Error;

use notarie_api::ApiError;
use notarie_store::StoreError;

use crate::wallet::WalletError;

/// Errors from the challenge-response flow.
///
/// Each stage fails with its own variant so the caller can tell the user
/// exactly where the exchange broke. None of these are retried
/// automatically; every failure requires explicit user re-initiation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No wallet is connected, so there is no identity to authenticate.
    #[error("wallet not connected")]
    NotConnected,

    /// The backend refused or failed to issue a challenge.
    #[error("challenge request failed: {0}")]
    ChallengeRequestFailed(#[source] ApiError),

    /// The wallet declined to sign (or disconnected mid-prompt).
    #[error("signature rejected: {0}")]
    SignatureRejected(#[source] WalletError),

    /// The backend rejected the signed challenge.
    #[error("verification failed: {0}")]
    VerificationFailed(#[source] ApiError),

    /// The credential store failed.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;
