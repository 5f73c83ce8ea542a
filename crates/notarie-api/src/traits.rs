//! Backend trait: the abstract interface to the notarization service.
//!
//! This trait allows the client to be transport-agnostic. Implementations
//! include HTTP (production) and in-memory (for tests). The backend is the
//! trust boundary: it recovers signer addresses from signatures, enforces
//! at-most-once signing, and owns challenge uniqueness and expiry.

use async_trait::async_trait;
use notarie_core::{
    Address, ContentDigest, DocumentId, DocumentStatus, InviteToken, SigningProjection,
    WalletSignature,
};

use crate::error::Result;
use crate::types::{CreateDocumentForm, DocumentRecord, SignRequest};

/// Async interface to the backend REST surface.
///
/// Operations that require authentication take the bearer token issued by
/// [`auth_verify`](Backend::auth_verify). Passing a stale token yields
/// `Unauthorized`; the caller clears its cached credential and the user
/// re-initiates login.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Request a single-use, human-readable challenge message bound to
    /// `address`. The message is opaque to the client.
    async fn auth_challenge(&self, address: &Address) -> Result<String>;

    /// Submit the signed challenge. The backend recovers the signer from
    /// the signature, compares it to `address`, and issues a bearer token.
    async fn auth_verify(
        &self,
        address: &Address,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<String>;

    /// Create a document and synchronously issue its signing invitation.
    /// The document starts at `sent`.
    async fn create_document(&self, bearer: &str, form: CreateDocumentForm)
        -> Result<DocumentId>;

    /// List the authenticated owner's documents.
    async fn list_documents(&self, bearer: &str) -> Result<Vec<DocumentRecord>>;

    /// Fetch one document by id.
    async fn get_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentRecord>;

    /// Resolve a signing invitation to its public-safe projection.
    /// No credential required.
    async fn get_invitation(&self, token: &InviteToken) -> Result<SigningProjection>;

    /// Submit a signature for an invitation. At most one signature ever
    /// succeeds per document; losers of a race get `AlreadySigned`.
    async fn submit_signature(
        &self,
        token: &InviteToken,
        request: SignRequest,
    ) -> Result<DocumentStatus>;

    /// Owner-only transition to `cancelled`.
    async fn cancel_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentStatus>;

    /// Look up all records matching a content digest. Public, read-only.
    async fn find_by_digest(&self, digest: &ContentDigest) -> Result<Vec<DocumentRecord>>;
}
