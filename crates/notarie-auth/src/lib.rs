//! # Notarie Auth
//!
//! Wallet-based challenge-response authentication.
//!
//! There are no passwords. The backend issues a single-use, human-readable
//! challenge bound to an account address; the wallet signs the literal
//! challenge bytes; the backend recovers the signer, compares, and issues
//! a 24 h bearer credential. The credential is cached in a durable store
//! and evaluated lazily at every request decoration - identity change,
//! wallet disconnect, and expiry each drop the session back to Anonymous.

pub mod authenticator;
pub mod error;
pub mod session;
pub mod wallet;

pub use authenticator::Authenticator;
pub use error::{AuthError, Result};
pub use session::{AuthSession, AuthStage, Decoration};
pub use wallet::{memory::MemoryWallet, WalletError, WalletProvider};
