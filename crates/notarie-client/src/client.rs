//! The NotarieClient: unified API for the notarization service.
//!
//! Brings authentication, the document lifecycle, and verification into a
//! cohesive interface. All owner-side writes are gated by the
//! authenticator; the invitation and verification paths are public.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use notarie_api::{ApiError, Backend, CreateDocumentForm, SignRequest};
use notarie_auth::{Authenticator, WalletProvider};
use notarie_core::{
    signing_message, validate_contact, Address, Contact, ContentDigest, Credential, Document,
    DocumentId, DocumentStatus, InviteToken, SigningProjection, UploadPolicy,
};
use notarie_store::CredentialStore;

use crate::error::{ClientError, Result};
use crate::verify::{VerificationOutcome, VerificationResolver};

/// Configuration for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Constraints applied to uploads before anything leaves the process.
    pub upload_policy: UploadPolicy,
}

/// The main client struct.
///
/// Provides a unified API for:
/// - Wallet login (challenge-response)
/// - Creating documents and inviting signers
/// - Resolving and completing signing invitations
/// - Verifying files against the record store
pub struct NotarieClient<B, W, S> {
    backend: Arc<B>,
    auth: Authenticator<B, W, S>,
    config: ClientConfig,
}

impl<B, W, S> NotarieClient<B, W, S>
where
    B: Backend,
    W: WalletProvider,
    S: CredentialStore,
{
    /// Create a client with the default configuration.
    pub fn new(backend: Arc<B>, wallet: Arc<W>, store: S) -> Self {
        Self::with_config(backend, wallet, store, ClientConfig::default())
    }

    /// Create a client with an explicit configuration.
    pub fn with_config(
        backend: Arc<B>,
        wallet: Arc<W>,
        store: S,
        config: ClientConfig,
    ) -> Self {
        let auth = Authenticator::new(backend.clone(), wallet, store);
        Self {
            backend,
            auth,
            config,
        }
    }

    /// The authentication context.
    pub fn auth(&self) -> &Authenticator<B, W, S> {
        &self.auth
    }

    /// A verification resolver over the same backend.
    pub fn resolver(&self) -> VerificationResolver<B> {
        VerificationResolver::new(self.backend.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Run the challenge-response login for the connected wallet.
    pub async fn login(&self) -> Result<Credential> {
        Ok(self.auth.login().await?)
    }

    /// Discard the credential and return to anonymous.
    pub async fn logout(&self) -> Result<()> {
        Ok(self.auth.logout().await?)
    }

    /// Adopt a persisted credential from a previous run, if still live.
    pub async fn restore(&self) -> Result<bool> {
        Ok(self.auth.restore().await?)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    /// The bearer token for an owner-gated call, or `NotAuthenticated`.
    async fn bearer(&self) -> Result<String> {
        self.auth
            .authorization()
            .await?
            .ok_or(ClientError::NotAuthenticated)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a document and synchronously invite the signer.
    ///
    /// Validates the upload and both contacts before any network call,
    /// computes the content digest locally, and submits. The document
    /// starts at `sent`; the backend assigns the id and the opaque
    /// invitation token.
    pub async fn create_document(
        &self,
        file_name: &str,
        content: Bytes,
        owner_contact: Contact,
        signer_contact: Contact,
        signer: Option<Address>,
    ) -> Result<DocumentId> {
        self.config
            .upload_policy
            .validate(file_name, content.len() as u64)?;
        validate_contact(&owner_contact)?;
        validate_contact(&signer_contact)?;

        let bearer = self.bearer().await?;
        let owner = self
            .auth
            .identity()
            .await
            .ok_or(ClientError::NotAuthenticated)?;

        let file_hash = ContentDigest::hash(&content);
        tracing::debug!(file_name, digest = %file_hash, "creating document");

        let form = CreateDocumentForm {
            file_name: file_name.to_string(),
            content,
            file_hash,
            owner,
            owner_contact,
            signer_contact,
            signer,
        };
        Ok(self.backend.create_document(&bearer, form).await?)
    }

    /// List the authenticated owner's documents.
    pub async fn documents(&self) -> Result<Vec<Document>> {
        let bearer = self.bearer().await?;
        let records = match self.backend.list_documents(&bearer).await {
            Ok(records) => records,
            Err(e) => return Err(self.handle_rejection(e).await),
        };

        records
            .into_iter()
            .map(|record| Document::try_from(record).map_err(ClientError::Api))
            .collect()
    }

    /// Fetch one of the authenticated owner's documents.
    pub async fn document(&self, id: &DocumentId) -> Result<Document> {
        let bearer = self.bearer().await?;
        let record = match self.backend.get_document(&bearer, id).await {
            Ok(record) => record,
            Err(e) => return Err(self.handle_rejection(e).await),
        };
        Ok(Document::try_from(record)?)
    }

    /// Owner-only transition to `cancelled`.
    pub async fn cancel_document(&self, id: &DocumentId) -> Result<DocumentStatus> {
        let bearer = self.bearer().await?;
        match self.backend.cancel_document(&bearer, id).await {
            Ok(status) => Ok(status),
            Err(e) => Err(self.handle_rejection(e).await),
        }
    }

    /// A backend rejection of our credential is the one failure we recover
    /// from locally: drop the cached credential and return to anonymous.
    /// The error still propagates.
    async fn handle_rejection(&self, error: ApiError) -> ClientError {
        if matches!(error, ApiError::Unauthorized(_)) {
            tracing::warn!("backend rejected credential, clearing");
            if let Err(e) = self.auth.invalidate().await {
                return e.into();
            }
        }
        error.into()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signing Invitations
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve an invitation token to its public-safe projection.
    pub async fn invitation(&self, token: &InviteToken) -> Result<SigningProjection> {
        Ok(self.backend.get_invitation(token).await?)
    }

    /// Complete a signing invitation with the connected wallet.
    ///
    /// The wallet signs the canonical message binding the document's file
    /// name and content digest. Cancelling the prompt leaves the document
    /// untouched. The backend verifies the signature, enforces the
    /// required signer if one was set, and serializes concurrent attempts:
    /// a losing race surfaces as `AlreadySigned`.
    pub async fn sign_invitation(
        &self,
        token: &InviteToken,
        signer_contact: Contact,
    ) -> Result<DocumentStatus> {
        validate_contact(&signer_contact)?;

        let signer = self
            .auth
            .wallet()
            .address()
            .ok_or(ClientError::Auth(notarie_auth::AuthError::NotConnected))?;

        let projection = self.backend.get_invitation(token).await?;
        let message = signing_message(&projection.file_name, &projection.file_hash);

        let signature = self
            .auth
            .wallet()
            .sign_message(&message)
            .await
            .map_err(notarie_auth::AuthError::SignatureRejected)
            .map_err(ClientError::Auth)?;

        let request = SignRequest {
            signer_address: signer,
            signer_first_name: signer_contact.first_name,
            signer_last_name: signer_contact.last_name,
            signer_email: signer_contact.email,
            signature,
            message,
        };
        Ok(self.backend.submit_signature(token, request).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a digest supplied as hex. Public, read-only.
    pub async fn verify_digest(&self, input: &str) -> Result<VerificationOutcome> {
        self.resolver().verify_hex(input).await
    }

    /// Hash a candidate file's bytes and verify the result.
    pub async fn verify_file(&self, content: &[u8]) -> Result<VerificationOutcome> {
        self.resolver().verify_file(content).await
    }
}

/// Compute the content digest of a file on disk.
///
/// Reads the file asynchronously; fails with an I/O error if the source
/// cannot be fully read.
pub async fn digest_file(path: impl AsRef<Path>) -> Result<ContentDigest> {
    let content = tokio::fs::read(path).await?;
    Ok(ContentDigest::hash(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_digest_file_matches_in_memory_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        tokio::fs::write(&path, b"file bytes").await.unwrap();

        let digest = digest_file(&path).await.unwrap();
        assert_eq!(digest, ContentDigest::hash(b"file bytes"));
    }

    #[tokio::test]
    async fn test_digest_file_missing_is_io_error() {
        let result = digest_file("/definitely/not/a/real/path.pdf").await;
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
