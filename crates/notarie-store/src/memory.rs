//! In-memory implementation of the CredentialStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps the credential in memory with no persistence.

use std::sync::RwLock;

use async_trait::async_trait;
use notarie_core::Credential;

use crate::error::Result;
use crate::traits::CredentialStore;

/// In-memory credential store.
///
/// The credential is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<Credential>> {
        Ok(self.slot.read().unwrap().clone())
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        *self.slot.write().unwrap() = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}
