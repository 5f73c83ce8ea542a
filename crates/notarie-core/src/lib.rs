//! # Notarie Core
//!
//! Pure primitives for the Notarie client: content digests, identities,
//! wallet signature primitives, documents, and input validation.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over protocol data structures.
//!
//! ## Key Types
//!
//! - [`ContentDigest`] - SHA-256 content address of a document's bytes
//! - [`Address`] - account address acting as a login principal
//! - [`Credential`] - bearer credential bound to one identity
//! - [`Document`] / [`DocumentStatus`] - the notarization lifecycle
//! - [`signing_message`] - the canonical message a signer's wallet signs

pub mod credential;
pub mod crypto;
pub mod digest;
pub mod document;
pub mod error;
pub mod identity;
pub mod message;
pub mod validation;

pub use credential::{Credential, TOKEN_TTL_MS};
pub use crypto::{
    address_of, keccak256, personal_message_hash, recover_signer, EthKeypair, WalletSignature,
};
pub use digest::{ContentDigest, DIGEST_ALGORITHM};
pub use document::{
    ChainAnchor, Document, DocumentId, DocumentStatus, InviteToken, SigningProjection,
};
pub use error::{CoreError, ValidationError};
pub use identity::{Address, Contact};
pub use message::signing_message;
pub use validation::{
    extension_of, mime_type, validate_contact, UploadPolicy, ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES,
};
