//! The authentication session state machine.
//!
//! Pure state, no I/O: `Anonymous -> ChallengeRequested -> Authenticated`,
//! with every invalidation path leading back to `Anonymous`. Expiry is
//! lazy - evaluated each time the session is asked to decorate a request,
//! never by a timer.

use notarie_core::{Address, Credential};

/// The session's position in the challenge-response protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStage {
    /// No credential, no exchange in flight.
    Anonymous,

    /// A challenge has been issued and awaits the wallet's signature.
    ChallengeRequested {
        address: Address,
        message: String,
    },

    /// A live credential is held.
    Authenticated(Credential),
}

/// Result of evaluating the session for request decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Live credential: attach `Authorization: Bearer <token>`.
    Bearer(String),

    /// No credential held; send the request undecorated.
    Anonymous,

    /// A credential existed but was just invalidated (expired, identity
    /// changed, or wallet disconnected) and has been discarded. The caller
    /// must clear the durable store.
    Invalidated,
}

/// The session state machine.
#[derive(Debug)]
pub struct AuthSession {
    stage: AuthStage,
}

impl AuthSession {
    /// Start anonymous.
    pub fn new() -> Self {
        Self {
            stage: AuthStage::Anonymous,
        }
    }

    pub fn stage(&self) -> &AuthStage {
        &self.stage
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.stage, AuthStage::Authenticated(_))
    }

    /// The identity a held credential is bound to.
    pub fn identity(&self) -> Option<Address> {
        match &self.stage {
            AuthStage::Authenticated(credential) => Some(credential.address),
            _ => None,
        }
    }

    /// Record an issued challenge. Any previously held credential is
    /// discarded - a new exchange supersedes it.
    pub fn begin_challenge(&mut self, address: Address, message: String) {
        self.stage = AuthStage::ChallengeRequested { address, message };
    }

    /// Abandon an in-flight challenge (user cancelled the prompt, or a
    /// later stage failed). No side effects beyond returning to Anonymous.
    pub fn cancel_challenge(&mut self) {
        if matches!(self.stage, AuthStage::ChallengeRequested { .. }) {
            self.stage = AuthStage::Anonymous;
        }
    }

    /// Complete the exchange with the issued credential.
    pub fn complete(&mut self, credential: Credential) {
        self.stage = AuthStage::Authenticated(credential);
    }

    /// Adopt a credential restored from the durable store, but only if it
    /// is still live at `now`.
    pub fn adopt(&mut self, credential: Credential, now: i64) -> bool {
        if credential.is_live(now) {
            self.stage = AuthStage::Authenticated(credential);
            true
        } else {
            false
        }
    }

    /// Drop everything and return to Anonymous.
    pub fn reset(&mut self) {
        self.stage = AuthStage::Anonymous;
    }

    /// Evaluate the credential for decorating an outgoing request.
    ///
    /// A token is attached only while all three hold: the credential is
    /// unexpired at `now`, a wallet is connected, and the connected
    /// identity equals the bound identity. Any violation discards the
    /// credential immediately.
    pub fn decorate(&mut self, now: i64, wallet: Option<Address>) -> Decoration {
        let credential = match &self.stage {
            AuthStage::Authenticated(credential) => credential,
            _ => return Decoration::Anonymous,
        };

        let live = credential.is_live(now);
        let bound = match wallet {
            Some(address) => credential.binds(&address),
            None => false,
        };

        if live && bound {
            Decoration::Bearer(credential.token.clone())
        } else {
            self.stage = AuthStage::Anonymous;
            Decoration::Invalidated
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notarie_core::TOKEN_TTL_MS;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn authenticated_session(now: i64) -> AuthSession {
        let mut session = AuthSession::new();
        session.complete(Credential::issued("tok".into(), addr(1), now));
        session
    }

    #[test]
    fn test_full_exchange() {
        let mut session = AuthSession::new();
        assert_eq!(session.stage(), &AuthStage::Anonymous);

        session.begin_challenge(addr(1), "challenge".into());
        assert!(matches!(
            session.stage(),
            AuthStage::ChallengeRequested { .. }
        ));

        session.complete(Credential::issued("tok".into(), addr(1), 0));
        assert!(session.is_authenticated());
        assert_eq!(session.identity(), Some(addr(1)));
    }

    #[test]
    fn test_cancel_returns_to_anonymous() {
        let mut session = AuthSession::new();
        session.begin_challenge(addr(1), "challenge".into());
        session.cancel_challenge();
        assert_eq!(session.stage(), &AuthStage::Anonymous);
    }

    #[test]
    fn test_decorate_live_credential() {
        let mut session = authenticated_session(1_000);
        assert_eq!(
            session.decorate(2_000, Some(addr(1))),
            Decoration::Bearer("tok".into())
        );
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_decorate_rejects_at_expiry_boundary() {
        // Issued at t, expired at exactly t + TTL and beyond.
        let mut session = authenticated_session(1_000);
        assert_eq!(
            session.decorate(1_000 + TOKEN_TTL_MS + 1_000, Some(addr(1))),
            Decoration::Invalidated
        );
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_identity_change_invalidates_before_next_request() {
        let mut session = authenticated_session(1_000);
        assert_eq!(
            session.decorate(2_000, Some(addr(2))),
            Decoration::Invalidated
        );
        assert_eq!(session.stage(), &AuthStage::Anonymous);

        // The next evaluation finds no credential at all.
        assert_eq!(session.decorate(2_000, Some(addr(2))), Decoration::Anonymous);
    }

    #[test]
    fn test_disconnect_invalidates() {
        let mut session = authenticated_session(1_000);
        assert_eq!(session.decorate(2_000, None), Decoration::Invalidated);
        assert_eq!(session.stage(), &AuthStage::Anonymous);
    }

    #[test]
    fn test_adopt_only_live_credentials() {
        let mut session = AuthSession::new();
        let stale = Credential::issued("tok".into(), addr(1), 0);
        assert!(!session.adopt(stale, TOKEN_TTL_MS + 1));
        assert!(!session.is_authenticated());

        let mut session = AuthSession::new();
        let live = Credential::issued("tok".into(), addr(1), 1_000);
        assert!(session.adopt(live, 2_000));
        assert!(session.is_authenticated());
    }
}
