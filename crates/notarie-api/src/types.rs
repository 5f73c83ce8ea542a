//! Wire types for the backend REST surface.
//!
//! Field names on the wire are camelCase. Document records arrive with the
//! owner and signer contacts flattened into prefixed fields; conversion to
//! the typed [`Document`] happens at this boundary so the rest of the
//! client never sees raw strings.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use notarie_core::{
    Address, ChainAnchor, Contact, ContentDigest, Document, DocumentId, DocumentStatus,
    WalletSignature,
};

use crate::error::ApiError;

/// `POST /auth/challenge` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub address: Address,
}

/// `POST /auth/challenge` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub message: String,
}

/// `POST /auth/verify` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub address: Address,
    pub message: String,
    pub signature: WalletSignature,
}

/// `POST /auth/verify` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub token: String,
}

/// Everything submitted with `POST /documents` (multipart).
#[derive(Debug, Clone)]
pub struct CreateDocumentForm {
    pub file_name: String,
    pub content: Bytes,
    pub file_hash: ContentDigest,
    pub owner: Address,
    pub owner_contact: Contact,
    pub signer_contact: Contact,
    /// When set, only this identity may sign the invitation.
    pub signer: Option<Address>,
}

/// `POST /documents` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentResponse {
    pub id: DocumentId,
}

/// `POST /sign/{token}` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub signer_address: Address,
    pub signer_first_name: String,
    pub signer_last_name: String,
    pub signer_email: String,
    pub signature: WalletSignature,
    pub message: String,
}

/// `POST /sign/{token}` and `POST /documents/{id}/cancel` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: DocumentStatus,
}

/// `POST /verify-document` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDocumentRequest {
    pub document_hash: ContentDigest,
}

/// A document record as the backend serves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub document_hash: String,
    pub file_name: String,
    pub file_size: u64,

    pub owner_address: String,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,

    pub signer_address: Option<String>,
    pub signer_first_name: String,
    pub signer_last_name: String,
    pub signer_email: String,

    pub status: DocumentStatus,
    pub created_at: i64,
    pub signed_at: Option<i64>,

    pub blockchain_tx_hash: Option<String>,
    pub blockchain_block_number: Option<u64>,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = ApiError;

    fn try_from(record: DocumentRecord) -> Result<Self, Self::Error> {
        let file_hash = ContentDigest::from_hex(&record.document_hash)
            .map_err(|_| ApiError::InvalidResponse(format!("bad digest: {}", record.document_hash)))?;
        let owner = Address::from_hex(&record.owner_address)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let signer = record
            .signer_address
            .as_deref()
            .map(Address::from_hex)
            .transpose()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let chain_anchor = record.blockchain_tx_hash.map(|tx_hash| ChainAnchor {
            tx_hash,
            block_number: record.blockchain_block_number,
        });

        Ok(Document {
            id: DocumentId::new(record.id),
            file_hash,
            file_name: record.file_name,
            file_size: record.file_size,
            owner,
            owner_contact: Contact::new(
                &record.owner_first_name,
                &record.owner_last_name,
                &record.owner_email,
            ),
            signer_contact: Contact::new(
                &record.signer_first_name,
                &record.signer_last_name,
                &record.signer_email,
            ),
            signer,
            status: record.status,
            created_at: record.created_at,
            signed_at: record.signed_at,
            chain_anchor,
        })
    }
}

impl From<&Document> for DocumentRecord {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.as_str().to_string(),
            document_hash: doc.file_hash.to_prefixed_hex(),
            file_name: doc.file_name.clone(),
            file_size: doc.file_size,
            owner_address: doc.owner.to_hex(),
            owner_first_name: doc.owner_contact.first_name.clone(),
            owner_last_name: doc.owner_contact.last_name.clone(),
            owner_email: doc.owner_contact.email.clone(),
            signer_address: doc.signer.map(|a| a.to_hex()),
            signer_first_name: doc.signer_contact.first_name.clone(),
            signer_last_name: doc.signer_contact.last_name.clone(),
            signer_email: doc.signer_contact.email.clone(),
            status: doc.status,
            created_at: doc.created_at,
            signed_at: doc.signed_at,
            blockchain_tx_hash: doc.chain_anchor.as_ref().map(|a| a.tx_hash.clone()),
            blockchain_block_number: doc.chain_anchor.as_ref().and_then(|a| a.block_number),
        }
    }
}

/// Error body shape used by the backend for non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Document {
        Document {
            id: DocumentId::new("doc-1"),
            file_hash: ContentDigest::hash(b"contract bytes"),
            file_name: "contract.pdf".into(),
            file_size: 14,
            owner: Address::from_bytes([0x0a; 20]),
            owner_contact: Contact::new("Alice", "Owner", "alice@example.com"),
            signer_contact: Contact::new("Bob", "Signer", "bob@example.com"),
            signer: Some(Address::from_bytes([0x0b; 20])),
            status: DocumentStatus::Sent,
            created_at: 1_700_000_000_000,
            signed_at: None,
            chain_anchor: None,
        }
    }

    #[test]
    fn test_record_round_trip() {
        let doc = sample_doc();
        let record = DocumentRecord::from(&doc);
        let back = Document::try_from(record).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_record_wire_field_names() {
        let record = DocumentRecord::from(&sample_doc());
        let json = serde_json::to_value(&record).unwrap();
        for field in [
            "documentHash",
            "fileName",
            "ownerAddress",
            "ownerFirstName",
            "signerEmail",
            "createdAt",
            "blockchainTxHash",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_record_rejects_bad_digest() {
        let mut record = DocumentRecord::from(&sample_doc());
        record.document_hash = "0x1234".into();
        assert!(matches!(
            Document::try_from(record),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
