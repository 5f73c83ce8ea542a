//! Session credentials issued by the challenge-response exchange.

use serde::{Deserialize, Serialize};

use crate::identity::Address;

/// How long an issued token stays valid: 24 hours, in milliseconds.
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// A bearer credential bound to one identity.
///
/// Held by exactly one session and never shared across identities. Expiry
/// is evaluated lazily at each use; there are no timers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque token issued by the backend.
    pub token: String,

    /// The identity this credential is bound to.
    pub address: Address,

    /// Expiry instant (Unix milliseconds).
    pub expires_at: i64,
}

impl Credential {
    /// Build a credential issued at `now` with the standard 24 h lifetime.
    pub fn issued(token: String, address: Address, now: i64) -> Self {
        Self {
            token,
            address,
            expires_at: now + TOKEN_TTL_MS,
        }
    }

    /// Whether the credential is still usable at `now`.
    pub fn is_live(&self, now: i64) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }

    /// Whether the credential is bound to the given identity.
    pub fn binds(&self, address: &Address) -> bool {
        self.address == *address
    }
}
