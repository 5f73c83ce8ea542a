//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing. It carries the server-side semantics the
//! client is written against: single-use challenges, signer recovery,
//! at-most-once signing, and simulated chain anchoring. Thread-safe via
//! RwLock.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::RngCore;

use notarie_core::{
    keccak256, recover_signer, signing_message, Address, ChainAnchor, Contact, ContentDigest,
    Document, DocumentId, DocumentStatus, InviteToken, SigningProjection, WalletSignature,
    TOKEN_TTL_MS,
};

use crate::error::{ApiError, Result};
use crate::traits::Backend;
use crate::types::{CreateDocumentForm, DocumentRecord, SignRequest};

/// In-memory backend implementation.
///
/// All state is lost when the backend is dropped.
pub struct MemoryBackend {
    inner: RwLock<MemoryBackendInner>,

    /// When set, invitations older than this many milliseconds expire.
    invite_ttl_ms: Option<i64>,
}

struct MemoryBackendInner {
    /// Pending challenge per address. Reissuing replaces the previous one,
    /// so a stale message can never verify.
    challenges: HashMap<Address, String>,

    /// Issued bearer tokens with their bound address and expiry.
    tokens: HashMap<String, IssuedToken>,

    /// All documents by id.
    documents: HashMap<DocumentId, Document>,

    /// Invitation token -> document id.
    invites: HashMap<InviteToken, DocumentId>,

    /// Counters for ids and simulated block numbers.
    next_id: u64,
    next_block: u64,
}

struct IssuedToken {
    address: Address,
    expires_at: i64,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryBackendInner {
                challenges: HashMap::new(),
                tokens: HashMap::new(),
                documents: HashMap::new(),
                invites: HashMap::new(),
                next_id: 0,
                next_block: 1_000,
            }),
            invite_ttl_ms: None,
        }
    }

    /// Create a backend whose invitations expire after `ttl_ms`.
    pub fn with_invite_ttl(ttl_ms: i64) -> Self {
        let mut backend = Self::new();
        backend.invite_ttl_ms = Some(ttl_ms);
        backend
    }

    /// The invitation token for a document, for handing to the signer in
    /// tests (the production backend delivers it by email).
    pub fn invite_token_for(&self, id: &DocumentId) -> Option<InviteToken> {
        let inner = self.inner.read().unwrap();
        inner
            .invites
            .iter()
            .find(|(_, doc_id)| *doc_id == id)
            .map(|(token, _)| token.clone())
    }

    /// Resolve the address bound to a live bearer token.
    fn authorize(inner: &MemoryBackendInner, bearer: &str, now: i64) -> Result<Address> {
        match inner.tokens.get(bearer) {
            Some(issued) if now < issued.expires_at => Ok(issued.address),
            Some(_) => Err(ApiError::Unauthorized("token expired".into())),
            None => Err(ApiError::Unauthorized("invalid token".into())),
        }
    }

    /// Expire a stale invitation in place. Returns the (possibly updated)
    /// status.
    fn expired_check(&self, doc: &mut Document, now: i64) -> DocumentStatus {
        if let Some(ttl) = self.invite_ttl_ms {
            if !doc.status.is_terminal() && now - doc.created_at > ttl {
                doc.status = DocumentStatus::Expired;
            }
        }
        doc.status
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn auth_challenge(&self, address: &Address) -> Result<String> {
        let mut inner = self.inner.write().unwrap();
        let message = format!(
            "Sign this message to authenticate.\nAddress: {}\nNonce: 0x{}",
            address.to_hex(),
            random_hex(16)
        );
        inner.challenges.insert(*address, message.clone());
        Ok(message)
    }

    async fn auth_verify(
        &self,
        address: &Address,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<String> {
        let mut inner = self.inner.write().unwrap();

        match inner.challenges.get(address) {
            Some(current) if current == message => {}
            _ => return Err(ApiError::Unauthorized("unknown or stale challenge".into())),
        }

        let recovered = recover_signer(message, signature)
            .map_err(|_| ApiError::Unauthorized("signature recovery failed".into()))?;
        if recovered != *address {
            return Err(ApiError::Unauthorized(
                "signature does not match address".into(),
            ));
        }

        // Single-use: consume the challenge only on success, so the user
        // may retry a rejected prompt without a new round-trip.
        inner.challenges.remove(address);

        let token = random_hex(32);
        inner.tokens.insert(
            token.clone(),
            IssuedToken {
                address: *address,
                expires_at: now_millis() + TOKEN_TTL_MS,
            },
        );
        Ok(token)
    }

    async fn create_document(
        &self,
        bearer: &str,
        form: CreateDocumentForm,
    ) -> Result<DocumentId> {
        let now = now_millis();
        let mut inner = self.inner.write().unwrap();
        let owner = Self::authorize(&inner, bearer, now)?;

        if owner != form.owner {
            return Err(ApiError::Unauthorized(
                "owner does not match credential".into(),
            ));
        }

        inner.next_id += 1;
        let id = DocumentId::new(format!("doc-{}", inner.next_id));
        let invite = InviteToken::new(random_hex(16));

        let document = Document {
            id: id.clone(),
            file_hash: form.file_hash,
            file_name: form.file_name,
            file_size: form.content.len() as u64,
            owner,
            owner_contact: form.owner_contact,
            signer_contact: form.signer_contact,
            signer: form.signer,
            // Invitation is synchronous with creation.
            status: DocumentStatus::Sent,
            created_at: now,
            signed_at: None,
            chain_anchor: None,
        };

        inner.invites.insert(invite, id.clone());
        inner.documents.insert(id.clone(), document);
        Ok(id)
    }

    async fn list_documents(&self, bearer: &str) -> Result<Vec<DocumentRecord>> {
        let now = now_millis();
        let inner = self.inner.read().unwrap();
        let owner = Self::authorize(&inner, bearer, now)?;

        Ok(inner
            .documents
            .values()
            .filter(|doc| doc.owner == owner)
            .map(DocumentRecord::from)
            .collect())
    }

    async fn get_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentRecord> {
        let now = now_millis();
        let inner = self.inner.read().unwrap();
        let owner = Self::authorize(&inner, bearer, now)?;

        let doc = inner
            .documents
            .get(id)
            .ok_or_else(|| ApiError::NotFound(format!("document {}", id)))?;
        if doc.owner != owner {
            return Err(ApiError::Unauthorized("not the document owner".into()));
        }
        Ok(DocumentRecord::from(doc))
    }

    async fn get_invitation(&self, token: &InviteToken) -> Result<SigningProjection> {
        let now = now_millis();
        let mut inner = self.inner.write().unwrap();

        let id = inner
            .invites
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("unknown invitation".into()))?;
        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("unknown invitation".into()))?;

        match self.expired_check(doc, now) {
            DocumentStatus::Expired => Err(ApiError::Expired("invitation expired".into())),
            DocumentStatus::Cancelled => {
                Err(ApiError::Expired("invitation cancelled".into()))
            }
            status => Ok(SigningProjection {
                file_name: doc.file_name.clone(),
                file_size: doc.file_size,
                file_hash: doc.file_hash,
                owner_name: doc.owner_contact.full_name(),
                signer_email: doc.signer_contact.email.clone(),
                status,
            }),
        }
    }

    async fn submit_signature(
        &self,
        token: &InviteToken,
        request: SignRequest,
    ) -> Result<DocumentStatus> {
        let now = now_millis();
        let mut inner = self.inner.write().unwrap();

        let id = inner
            .invites
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("unknown invitation".into()))?;

        // Block number for the simulated chain anchor.
        let block_number = inner.next_block;

        let doc = inner
            .documents
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("unknown invitation".into()))?;

        match self.expired_check(doc, now) {
            DocumentStatus::Signed => return Err(ApiError::AlreadySigned),
            DocumentStatus::Expired => {
                return Err(ApiError::InvalidState("invitation expired".into()))
            }
            DocumentStatus::Cancelled => {
                return Err(ApiError::InvalidState("document cancelled".into()))
            }
            DocumentStatus::Pending | DocumentStatus::Sent => {}
        }

        // The signature must cover exactly the canonical message for this
        // document's name and content digest.
        let expected = signing_message(&doc.file_name, &doc.file_hash);
        if request.message != expected {
            return Err(ApiError::Unauthorized("signature message mismatch".into()));
        }

        let recovered = recover_signer(&request.message, &request.signature)
            .map_err(|_| ApiError::Unauthorized("signature recovery failed".into()))?;
        if recovered != request.signer_address {
            return Err(ApiError::Unauthorized(
                "signature does not match signer address".into(),
            ));
        }
        if let Some(required) = doc.signer {
            if recovered != required {
                return Err(ApiError::Unauthorized(
                    "document requires a different signer".into(),
                ));
            }
        }

        doc.status = DocumentStatus::Signed;
        doc.signed_at = Some(now);
        doc.signer = Some(recovered);
        doc.signer_contact = Contact::new(
            &request.signer_first_name,
            &request.signer_last_name,
            &request.signer_email,
        );

        let mut anchor_input = Vec::new();
        anchor_input.extend_from_slice(doc.id.as_str().as_bytes());
        anchor_input.extend_from_slice(doc.file_hash.as_bytes());
        anchor_input.extend_from_slice(&now.to_be_bytes());
        doc.chain_anchor = Some(ChainAnchor {
            tx_hash: format!("0x{}", hex::encode(keccak256(&anchor_input))),
            block_number: Some(block_number),
        });
        inner.next_block += 1;

        Ok(DocumentStatus::Signed)
    }

    async fn cancel_document(&self, bearer: &str, id: &DocumentId) -> Result<DocumentStatus> {
        let now = now_millis();
        let mut inner = self.inner.write().unwrap();
        let owner = Self::authorize(&inner, bearer, now)?;

        let doc = inner
            .documents
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("document {}", id)))?;
        if doc.owner != owner {
            return Err(ApiError::Unauthorized("not the document owner".into()));
        }
        if !doc.status.can_transition_to(DocumentStatus::Cancelled) {
            return Err(ApiError::InvalidState(format!(
                "cannot cancel a {} document",
                doc.status
            )));
        }

        doc.status = DocumentStatus::Cancelled;
        Ok(DocumentStatus::Cancelled)
    }

    async fn find_by_digest(&self, digest: &ContentDigest) -> Result<Vec<DocumentRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .documents
            .values()
            .filter(|doc| doc.file_hash == *digest)
            .map(DocumentRecord::from)
            .collect())
    }
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use notarie_core::EthKeypair;

    async fn login(backend: &MemoryBackend, keypair: &EthKeypair) -> String {
        let address = keypair.address();
        let message = backend.auth_challenge(&address).await.unwrap();
        let signature = keypair.personal_sign(&message);
        backend
            .auth_verify(&address, &message, &signature)
            .await
            .unwrap()
    }

    fn form(owner: Address, content: &[u8], signer: Option<Address>) -> CreateDocumentForm {
        CreateDocumentForm {
            file_name: "contract.pdf".into(),
            content: Bytes::copy_from_slice(content),
            file_hash: ContentDigest::hash(content),
            owner,
            owner_contact: Contact::new("Alice", "Owner", "alice@example.com"),
            signer_contact: Contact::new("Bob", "Signer", "bob@example.com"),
            signer,
        }
    }

    #[tokio::test]
    async fn test_challenges_are_single_use_and_replaced() {
        let backend = MemoryBackend::new();
        let keypair = EthKeypair::generate();
        let address = keypair.address();

        let first = backend.auth_challenge(&address).await.unwrap();
        let second = backend.auth_challenge(&address).await.unwrap();
        assert_ne!(first, second);

        // The stale message no longer verifies.
        let stale_sig = keypair.personal_sign(&first);
        assert!(matches!(
            backend.auth_verify(&address, &first, &stale_sig).await,
            Err(ApiError::Unauthorized(_))
        ));

        // The current one does.
        let sig = keypair.personal_sign(&second);
        assert!(backend.auth_verify(&address, &second, &sig).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_key() {
        let backend = MemoryBackend::new();
        let honest = EthKeypair::generate();
        let imposter = EthKeypair::generate();
        let address = honest.address();

        let message = backend.auth_challenge(&address).await.unwrap();
        let forged = imposter.personal_sign(&message);
        assert!(matches!(
            backend.auth_verify(&address, &message, &forged).await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_live_token() {
        let backend = MemoryBackend::new();
        let keypair = EthKeypair::generate();
        let result = backend
            .create_document("bogus-token", form(keypair.address(), b"bytes", None))
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_sign_happy_path_anchors_on_chain() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let signer = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(
                &bearer,
                form(owner.address(), b"the contract", Some(signer.address())),
            )
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        let projection = backend.get_invitation(&token).await.unwrap();
        assert_eq!(projection.status, DocumentStatus::Sent);

        let message = signing_message(&projection.file_name, &projection.file_hash);
        let status = backend
            .submit_signature(
                &token,
                SignRequest {
                    signer_address: signer.address(),
                    signer_first_name: "Bob".into(),
                    signer_last_name: "Signer".into(),
                    signer_email: "bob@example.com".into(),
                    signature: signer.personal_sign(&message),
                    message,
                },
            )
            .await
            .unwrap();
        assert_eq!(status, DocumentStatus::Signed);

        let record = backend.get_document(&bearer, &id).await.unwrap();
        assert_eq!(record.status, DocumentStatus::Signed);
        assert!(record.signed_at.is_some());
        assert!(record.blockchain_tx_hash.is_some());
        assert!(record.blockchain_block_number.is_some());
    }

    #[tokio::test]
    async fn test_sign_twice_fails_already_signed() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let signer = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(&bearer, form(owner.address(), b"bytes", None))
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        let projection = backend.get_invitation(&token).await.unwrap();
        let message = signing_message(&projection.file_name, &projection.file_hash);
        let request = SignRequest {
            signer_address: signer.address(),
            signer_first_name: "Bob".into(),
            signer_last_name: "Signer".into(),
            signer_email: "bob@example.com".into(),
            signature: signer.personal_sign(&message),
            message,
        };

        backend
            .submit_signature(&token, request.clone())
            .await
            .unwrap();
        let first_signed_at = backend.get_document(&bearer, &id).await.unwrap().signed_at;

        assert!(matches!(
            backend.submit_signature(&token, request).await,
            Err(ApiError::AlreadySigned)
        ));
        // The original signing instant is untouched.
        assert_eq!(
            backend.get_document(&bearer, &id).await.unwrap().signed_at,
            first_signed_at
        );
    }

    #[tokio::test]
    async fn test_required_signer_is_enforced() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let invited = EthKeypair::generate();
        let stranger = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(
                &bearer,
                form(owner.address(), b"bytes", Some(invited.address())),
            )
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        let projection = backend.get_invitation(&token).await.unwrap();
        let message = signing_message(&projection.file_name, &projection.file_hash);
        let result = backend
            .submit_signature(
                &token,
                SignRequest {
                    signer_address: stranger.address(),
                    signer_first_name: "Carol".into(),
                    signer_last_name: "Stranger".into(),
                    signer_email: "carol@example.com".into(),
                    signature: stranger.personal_sign(&message),
                    message,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_sign_rejects_unbound_message() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let signer = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(&bearer, form(owner.address(), b"bytes", None))
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        // A message that does not bind this document's digest.
        let message = "I confirm that I am signing document: contract.pdf".to_string();
        let result = backend
            .submit_signature(
                &token,
                SignRequest {
                    signer_address: signer.address(),
                    signer_first_name: "Bob".into(),
                    signer_last_name: "Signer".into(),
                    signer_email: "bob@example.com".into(),
                    signature: signer.personal_sign(&message),
                    message,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_cancel_then_mutations_fail() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let signer = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(&bearer, form(owner.address(), b"bytes", None))
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        // Fetch the projection while the invitation is live.
        let projection = backend.get_invitation(&token).await.unwrap();

        assert_eq!(
            backend.cancel_document(&bearer, &id).await.unwrap(),
            DocumentStatus::Cancelled
        );
        assert!(matches!(
            backend.cancel_document(&bearer, &id).await,
            Err(ApiError::InvalidState(_))
        ));

        let message = signing_message(&projection.file_name, &projection.file_hash);
        let result = backend
            .submit_signature(
                &token,
                SignRequest {
                    signer_address: signer.address(),
                    signer_first_name: "Bob".into(),
                    signer_last_name: "Signer".into(),
                    signer_email: "bob@example.com".into(),
                    signature: signer.personal_sign(&message),
                    message,
                },
            )
            .await;
        assert!(matches!(result, Err(ApiError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_unknown_invitation_not_found() {
        let backend = MemoryBackend::new();
        let result = backend.get_invitation(&InviteToken::new("nope")).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_expired_invitation() {
        let backend = MemoryBackend::with_invite_ttl(0);
        let owner = EthKeypair::generate();

        let bearer = login(&backend, &owner).await;
        let id = backend
            .create_document(&bearer, form(owner.address(), b"bytes", None))
            .await
            .unwrap();
        let token = backend.invite_token_for(&id).unwrap();

        // A zero TTL expires the invitation at the next touch.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(matches!(
            backend.get_invitation(&token).await,
            Err(ApiError::Expired(_))
        ));
        assert_eq!(
            backend.get_document(&bearer, &id).await.unwrap().status,
            DocumentStatus::Expired
        );
    }

    #[tokio::test]
    async fn test_find_by_digest_returns_all_matches() {
        let backend = MemoryBackend::new();
        let owner = EthKeypair::generate();
        let bearer = login(&backend, &owner).await;

        let content = b"notarize me twice";
        backend
            .create_document(&bearer, form(owner.address(), content, None))
            .await
            .unwrap();
        backend
            .create_document(&bearer, form(owner.address(), content, None))
            .await
            .unwrap();

        let digest = ContentDigest::hash(content);
        assert_eq!(backend.find_by_digest(&digest).await.unwrap().len(), 2);

        let other = ContentDigest::hash(b"unknown content");
        assert!(backend.find_by_digest(&other).await.unwrap().is_empty());
    }
}
