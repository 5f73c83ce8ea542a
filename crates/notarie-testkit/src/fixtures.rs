//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: an in-memory backend shared by
//! owner and signer clients, each with its own wallet and credential store.

use std::sync::Arc;

use notarie_api::MemoryBackend;
use notarie_auth::{MemoryWallet, WalletProvider};
use notarie_client::NotarieClient;
use notarie_core::{Address, Contact, EthKeypair};
use notarie_store::MemoryCredentialStore;

/// A client wired to the fixture's shared backend.
pub type FixtureClient = NotarieClient<MemoryBackend, MemoryWallet, MemoryCredentialStore>;

/// A test fixture with a shared backend and two wallets.
pub struct TestFixture {
    pub backend: Arc<MemoryBackend>,
    pub owner_wallet: Arc<MemoryWallet>,
    pub signer_wallet: Arc<MemoryWallet>,
}

impl TestFixture {
    /// Create a fixture with random keys.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            owner_wallet: Arc::new(MemoryWallet::random()),
            signer_wallet: Arc::new(MemoryWallet::random()),
        }
    }

    /// Create with deterministic keys from seeds.
    pub fn with_seeds(owner_seed: [u8; 32], signer_seed: [u8; 32]) -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
            owner_wallet: Arc::new(MemoryWallet::new(
                EthKeypair::from_seed(&owner_seed).expect("valid seed"),
            )),
            signer_wallet: Arc::new(MemoryWallet::new(
                EthKeypair::from_seed(&signer_seed).expect("valid seed"),
            )),
        }
    }

    pub fn owner_address(&self) -> Address {
        self.owner_wallet.address().expect("owner wallet connected")
    }

    pub fn signer_address(&self) -> Address {
        self.signer_wallet
            .address()
            .expect("signer wallet connected")
    }

    /// A client for the owner wallet with a fresh credential store.
    pub fn owner_client(&self) -> FixtureClient {
        self.client_for(self.owner_wallet.clone())
    }

    /// A client for the signer wallet with a fresh credential store.
    pub fn signer_client(&self) -> FixtureClient {
        self.client_for(self.signer_wallet.clone())
    }

    /// A client for an arbitrary wallet over the shared backend.
    pub fn client_for(&self, wallet: Arc<MemoryWallet>) -> FixtureClient {
        NotarieClient::new(self.backend.clone(), wallet, MemoryCredentialStore::new())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create deterministic wallets for multi-party tests.
pub fn deterministic_wallets(count: usize) -> Vec<Arc<MemoryWallet>> {
    (1..=count)
        .map(|i| {
            let seed = [i as u8; 32];
            Arc::new(MemoryWallet::new(
                EthKeypair::from_seed(&seed).expect("valid seed"),
            ))
        })
        .collect()
}

/// The standard owner contact used across tests.
pub fn owner_contact() -> Contact {
    Contact::new("Alice", "Owner", "alice@example.com")
}

/// The standard signer contact used across tests.
pub fn signer_contact() -> Contact {
    Contact::new("Bob", "Signer", "bob@example.com")
}

/// A PDF-ish payload of the given size.
pub fn sample_pdf(size: usize) -> Vec<u8> {
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(content.len().max(size), 0x20);
    content
}
