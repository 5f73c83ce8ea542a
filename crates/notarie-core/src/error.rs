//! Error types for Notarie core primitives.

use thiserror::Error;

/// Errors from cryptographic and parsing primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature encoding")]
    InvalidSignatureBytes,

    #[error("signature recovery failed")]
    RecoveryFailed,

    #[error("invalid private key material")]
    InvalidPrivateKey,
}

/// Input validation errors, raised before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file name is empty")]
    EmptyFileName,

    #[error("file is empty")]
    EmptyFile,

    #[error("unsupported file type: .{extension}")]
    UnsupportedFileType { extension: String },

    #[error("file too large: {size} bytes (maximum {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("{field} must be at least 2 characters")]
    NameTooShort { field: &'static str },

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("malformed digest: {0}")]
    MalformedDigest(String),
}
