//! The Authenticator: executes the challenge-response protocol.
//!
//! Brings the backend, the wallet provider, the session state machine, and
//! the credential store together. The backend is the trust boundary: it
//! recovers the signer from the signature and decides whether to issue a
//! credential; the client deliberately does not re-verify.

use std::sync::Arc;

use tokio::sync::Mutex;

use notarie_api::Backend;
use notarie_core::{Address, Credential};
use notarie_store::CredentialStore;

use crate::error::{AuthError, Result};
use crate::session::{AuthSession, Decoration};
use crate::wallet::WalletProvider;

/// Session-scoped authentication context.
///
/// One per connected identity. All methods take `&self`; the session state
/// lives behind a mutex so the authenticator can be shared with the rest
/// of the client.
pub struct Authenticator<B, W, S> {
    backend: Arc<B>,
    wallet: Arc<W>,
    store: S,
    session: Mutex<AuthSession>,
}

impl<B, W, S> Authenticator<B, W, S>
where
    B: Backend,
    W: WalletProvider,
    S: CredentialStore,
{
    /// Create an anonymous authenticator.
    pub fn new(backend: Arc<B>, wallet: Arc<W>, store: S) -> Self {
        Self {
            backend,
            wallet,
            store,
            session: Mutex::new(AuthSession::new()),
        }
    }

    /// The wallet this authenticator signs with.
    pub fn wallet(&self) -> &Arc<W> {
        &self.wallet
    }

    /// Restore a persisted credential, adopting it only if still live.
    ///
    /// Called once at startup so a process restart does not force
    /// re-authentication before the 24 h expiry. Returns whether the
    /// session is now authenticated.
    pub async fn restore(&self) -> Result<bool> {
        let Some(credential) = self.store.load().await? else {
            return Ok(false);
        };

        let mut session = self.session.lock().await;
        if session.adopt(credential, now_millis()) {
            tracing::debug!("restored persisted credential");
            Ok(true)
        } else {
            drop(session);
            tracing::debug!("persisted credential expired, clearing");
            self.store.clear().await?;
            Ok(false)
        }
    }

    /// Run the full challenge-response exchange.
    ///
    /// Each stage fails with its own [`AuthError`] variant and returns the
    /// session to `Anonymous` without side effects. Nothing is retried
    /// automatically.
    pub async fn login(&self) -> Result<Credential> {
        let address = self.wallet.address().ok_or(AuthError::NotConnected)?;

        // Stage 1: obtain a single-use challenge bound to the identity.
        // The message is opaque to us; the backend owns its uniqueness.
        let message = match self.backend.auth_challenge(&address).await {
            Ok(message) => message,
            Err(e) => return Err(AuthError::ChallengeRequestFailed(e)),
        };

        {
            let mut session = self.session.lock().await;
            session.begin_challenge(address, message.clone());
        }

        // Stage 2: the wallet signs the literal challenge bytes. This
        // suspends until the signer responds; a user cancel unwinds
        // cleanly.
        let signature = match self.wallet.sign_message(&message).await {
            Ok(signature) => signature,
            Err(e) => {
                self.session.lock().await.cancel_challenge();
                return Err(AuthError::SignatureRejected(e));
            }
        };

        // Stage 3: the backend verifies and issues the bearer token.
        let token = match self.backend.auth_verify(&address, &message, &signature).await {
            Ok(token) => token,
            Err(e) => {
                self.session.lock().await.cancel_challenge();
                return Err(AuthError::VerificationFailed(e));
            }
        };

        let credential = Credential::issued(token, address, now_millis());
        self.store.save(&credential).await?;
        self.session.lock().await.complete(credential.clone());
        tracing::debug!(address = %address, "authenticated");
        Ok(credential)
    }

    /// Discard the credential and return to `Anonymous`.
    pub async fn logout(&self) -> Result<()> {
        self.session.lock().await.reset();
        self.store.clear().await?;
        Ok(())
    }

    /// The bearer token for decorating an outgoing request, if a live
    /// credential exists.
    ///
    /// Evaluates expiry lazily and enforces the invalidation rules: an
    /// expired token, a disconnected wallet, or a changed identity all
    /// clear the credential (state and store) and yield `None`. Never
    /// returns an expired or address-mismatched token.
    pub async fn authorization(&self) -> Result<Option<String>> {
        let wallet = self.wallet.address();
        let decoration = self
            .session
            .lock()
            .await
            .decorate(now_millis(), wallet);

        match decoration {
            Decoration::Bearer(token) => Ok(Some(token)),
            Decoration::Anonymous => Ok(None),
            Decoration::Invalidated => {
                tracing::warn!("credential invalidated, clearing store");
                self.store.clear().await?;
                Ok(None)
            }
        }
    }

    /// The authenticated identity, if any.
    pub async fn identity(&self) -> Option<Address> {
        self.session.lock().await.identity()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Drop a credential the backend has rejected (e.g. a 401 on an
    /// authenticated call). The only local recovery the client performs.
    pub async fn invalidate(&self) -> Result<()> {
        self.session.lock().await.reset();
        self.store.clear().await?;
        Ok(())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
