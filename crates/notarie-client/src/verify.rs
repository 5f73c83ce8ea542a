//! Content-addressed verification.
//!
//! Anyone can check whether a file was notarized: hash it, ask the record
//! store, and read the verdict. No credential, no mutation.

use std::sync::Arc;

use notarie_api::Backend;
use notarie_core::{ContentDigest, Document, ValidationError};

use crate::error::{ClientError, Result};

/// The verdict for a queried digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// No record matches: the document is not in the system. This is a
    /// documented outcome, not an error about the digest itself.
    NotFound,

    /// One or more records match. The same content may have been
    /// notarized multiple times under different invitations; all matches
    /// are returned, unordered.
    Notarized(Vec<Document>),
}

impl VerificationOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Notarized(_))
    }

    /// The matching records (empty when not found).
    pub fn records(&self) -> &[Document] {
        match self {
            Self::NotFound => &[],
            Self::Notarized(records) => records,
        }
    }
}

/// Resolves digests against the record store.
pub struct VerificationResolver<B> {
    backend: Arc<B>,
}

impl<B: Backend> VerificationResolver<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Verify a digest supplied as hex (with or without `0x`).
    ///
    /// The input is attacker-controlled: malformed hex is rejected here,
    /// before any query reaches the backend.
    pub async fn verify_hex(&self, input: &str) -> Result<VerificationOutcome> {
        let digest = ContentDigest::from_hex(input.trim())
            .map_err(|_| ValidationError::MalformedDigest(input.to_string()))?;
        self.verify(&digest).await
    }

    /// Verify a parsed digest. Well-formed input never errors for an
    /// unknown digest; that is the `NotFound` outcome.
    pub async fn verify(&self, digest: &ContentDigest) -> Result<VerificationOutcome> {
        let records = self.backend.find_by_digest(digest).await?;
        if records.is_empty() {
            return Ok(VerificationOutcome::NotFound);
        }

        let documents = records
            .into_iter()
            .map(Document::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ClientError::Api)?;
        Ok(VerificationOutcome::Notarized(documents))
    }

    /// Hash a candidate file's bytes and verify the result.
    pub async fn verify_file(&self, content: &[u8]) -> Result<VerificationOutcome> {
        self.verify(&ContentDigest::hash(content)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notarie_api::MemoryBackend;

    #[tokio::test]
    async fn test_unknown_digest_is_not_found_not_error() {
        let resolver = VerificationResolver::new(Arc::new(MemoryBackend::new()));
        let digest = ContentDigest::hash(b"never notarized");

        let outcome = resolver.verify(&digest).await.unwrap();
        assert_eq!(outcome, VerificationOutcome::NotFound);
        assert!(!outcome.is_found());
        assert!(outcome.records().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_hex_rejected_before_query() {
        let resolver = VerificationResolver::new(Arc::new(MemoryBackend::new()));

        for input in ["", "0x12", "not hex at all", "0xzz"] {
            let result = resolver.verify_hex(input).await;
            assert!(
                matches!(
                    result,
                    Err(ClientError::Validation(ValidationError::MalformedDigest(_)))
                ),
                "{input:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_well_formed_hex_accepted() {
        let resolver = VerificationResolver::new(Arc::new(MemoryBackend::new()));
        let digest = ContentDigest::hash(b"anything");

        let outcome = resolver.verify_hex(&digest.to_prefixed_hex()).await.unwrap();
        assert_eq!(outcome, VerificationOutcome::NotFound);
    }
}
