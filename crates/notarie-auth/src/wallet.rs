//! Wallet provider abstraction.
//!
//! The core depends only on this interface; MetaMask, WalletConnect, or
//! any other signer plugs in behind it. Signing suspends until the
//! external signer responds or the user cancels - there is no
//! client-imposed timeout on the prompt.

use async_trait::async_trait;
use thiserror::Error;

use notarie_core::{Address, WalletSignature};

/// Errors from the wallet provider.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The user declined the signature prompt.
    #[error("signature request rejected by user")]
    Rejected,

    /// No wallet is connected.
    #[error("wallet not connected")]
    Disconnected,
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, WalletError>;

/// A connected signing provider.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The currently connected identity, if any.
    fn address(&self) -> Option<Address>;

    /// Whether a wallet is connected.
    fn connected(&self) -> bool {
        self.address().is_some()
    }

    /// Produce a signature over the literal message bytes.
    ///
    /// Suspends until the signer responds. A user cancel resolves to
    /// [`WalletError::Rejected`]; the caller must treat that as a clean
    /// return to the previous state, with no side effects.
    async fn sign_message(&self, message: &str) -> Result<WalletSignature>;
}

/// A deterministic in-memory wallet for testing.
pub mod memory {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use notarie_core::EthKeypair;

    /// In-memory wallet holding its key directly.
    ///
    /// Connection state and prompt rejection are switchable so tests can
    /// exercise disconnects and user cancels.
    pub struct MemoryWallet {
        keypair: EthKeypair,
        connected: AtomicBool,
        rejecting: AtomicBool,
    }

    impl MemoryWallet {
        /// Create a connected wallet around the given keypair.
        pub fn new(keypair: EthKeypair) -> Self {
            Self {
                keypair,
                connected: AtomicBool::new(true),
                rejecting: AtomicBool::new(false),
            }
        }

        /// Create a connected wallet with a fresh random key.
        pub fn random() -> Self {
            Self::new(EthKeypair::generate())
        }

        /// Simulate connecting or disconnecting the wallet.
        pub fn set_connected(&self, connected: bool) {
            self.connected.store(connected, Ordering::SeqCst);
        }

        /// Make subsequent signature prompts resolve as user rejections.
        pub fn set_rejecting(&self, rejecting: bool) {
            self.rejecting.store(rejecting, Ordering::SeqCst);
        }

        /// The wallet's keypair (for driving the test backend directly).
        pub fn keypair(&self) -> &EthKeypair {
            &self.keypair
        }
    }

    #[async_trait]
    impl WalletProvider for MemoryWallet {
        fn address(&self) -> Option<Address> {
            if self.connected.load(Ordering::SeqCst) {
                Some(self.keypair.address())
            } else {
                None
            }
        }

        async fn sign_message(&self, message: &str) -> Result<WalletSignature> {
            if !self.connected.load(Ordering::SeqCst) {
                return Err(WalletError::Disconnected);
            }
            if self.rejecting.load(Ordering::SeqCst) {
                return Err(WalletError::Rejected);
            }
            Ok(self.keypair.personal_sign(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryWallet;
    use super::*;
    use notarie_core::recover_signer;

    #[tokio::test]
    async fn test_memory_wallet_signs_as_its_address() {
        let wallet = MemoryWallet::random();
        let address = wallet.address().unwrap();

        let signature = wallet.sign_message("prove it").await.unwrap();
        assert_eq!(recover_signer("prove it", &signature).unwrap(), address);
    }

    #[tokio::test]
    async fn test_memory_wallet_disconnect() {
        let wallet = MemoryWallet::random();
        wallet.set_connected(false);

        assert!(!wallet.connected());
        assert!(wallet.address().is_none());
        assert!(matches!(
            wallet.sign_message("anything").await,
            Err(WalletError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn test_memory_wallet_rejection() {
        let wallet = MemoryWallet::random();
        wallet.set_rejecting(true);
        assert!(matches!(
            wallet.sign_message("anything").await,
            Err(WalletError::Rejected)
        ));

        wallet.set_rejecting(false);
        assert!(wallet.sign_message("anything").await.is_ok());
    }
}
