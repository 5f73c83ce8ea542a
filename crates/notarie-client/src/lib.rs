//! # Notarie Client
//!
//! Unified client for the Notarie notarization service.
//!
//! A document owner uploads a file, invites a counterpart to sign it, and
//! any party can verify that a given file was notarized by hashing it and
//! querying the record store. Authentication is wallet-based
//! challenge-response; the uploaded file's SHA-256 digest ties the record
//! to the exact bytes, and a successful signature is anchored on chain by
//! the backend.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use notarie_api::{ApiConfig, HttpBackend};
//! use notarie_auth::MemoryWallet;
//! use notarie_client::NotarieClient;
//! use notarie_store::SqliteCredentialStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new(ApiConfig::default())?);
//! let wallet = Arc::new(MemoryWallet::random());
//! let store = SqliteCredentialStore::open("session.db")?;
//!
//! let client = NotarieClient::new(backend, wallet, store);
//! if !client.restore().await? {
//!     client.login().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod verify;

pub use client::{digest_file, ClientConfig, NotarieClient};
pub use error::{ClientError, Result};
pub use verify::{VerificationOutcome, VerificationResolver};
