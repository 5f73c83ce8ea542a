//! CredentialStore trait: the abstract interface for credential persistence.
//!
//! The session caches its bearer credential in a durable client-side store
//! so a process restart does not force re-authentication before expiry.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use notarie_core::Credential;

use crate::error::Result;

/// Async interface for persisting at most one credential.
///
/// # Design Notes
///
/// - **Single slot**: a session holds at most one credential; saving
///   replaces whatever was there.
/// - **No expiry logic**: the store persists what it is given. Liveness
///   is the session's concern and is evaluated lazily on use.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the persisted credential, if any.
    async fn load(&self) -> Result<Option<Credential>>;

    /// Persist a credential, replacing any existing one.
    async fn save(&self, credential: &Credential) -> Result<()>;

    /// Remove the persisted credential.
    async fn clear(&self) -> Result<()>;
}

// A shared store is a store.
#[async_trait]
impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    async fn load(&self) -> Result<Option<Credential>> {
        (**self).load().await
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        (**self).save(credential).await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }
}
