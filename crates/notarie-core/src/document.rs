//! Documents and their lifecycle.
//!
//! A document's identity is the content digest of its file; its lifecycle
//! is a small forward-only state machine with two terminal failure exits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::ContentDigest;
use crate::identity::{Address, Contact};

/// Backend-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque signing-invitation token.
///
/// Invitations are addressed by this token rather than the document id so
/// document ids cannot be enumerated from invitation links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteToken(pub String);

impl InviteToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InviteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document lifecycle status.
///
/// Forward order is `pending → sent → signed`; `cancelled` and `expired`
/// are terminal failures reachable from the two non-terminal states only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Sent,
    Signed,
    Cancelled,
    Expired,
}

impl DocumentStatus {
    /// Whether any further transition is allowed out of this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Signed | Self::Cancelled | Self::Expired)
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Status never moves backward; the only exits from the forward path
    /// are cancellation and expiry.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Sent)
                | (Self::Pending, Self::Cancelled)
                | (Self::Pending, Self::Expired)
                | (Self::Sent, Self::Signed)
                | (Self::Sent, Self::Cancelled)
                | (Self::Sent, Self::Expired)
        )
    }

    /// Display ordering of the forward path (`pending < sent < signed`).
    ///
    /// UI-only. `cancelled` and `expired` are orthogonal to this ordering
    /// and have no rank.
    pub fn display_rank(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Sent => Some(1),
            Self::Signed => Some(2),
            Self::Cancelled | Self::Expired => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Signed => "signed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to the on-chain anchoring transaction.
///
/// Present only after a successful signature; once present it is immutable
/// evidence and is never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAnchor {
    /// Transaction hash on the anchoring chain.
    pub tx_hash: String,

    /// Block number, once the transaction is included.
    pub block_number: Option<u64>,
}

/// A notarized document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,

    /// Content digest of the uploaded file. Immutable once set.
    pub file_hash: ContentDigest,

    pub file_name: String,
    pub file_size: u64,

    /// The owner who created the document.
    pub owner: Address,
    pub owner_contact: Contact,

    /// The invited signer's contact details.
    pub signer_contact: Contact,

    /// Required signer identity. When present, only this address may
    /// complete the signature transition.
    pub signer: Option<Address>,

    pub status: DocumentStatus,

    /// Creation instant (Unix milliseconds).
    pub created_at: i64,

    /// Set exactly once, by the signature transition.
    pub signed_at: Option<i64>,

    /// On-chain anchoring evidence, recorded by the backend after signing.
    pub chain_anchor: Option<ChainAnchor>,
}

/// The public-safe projection of a document, resolved from an invitation
/// token without any credential.
///
/// Carries what the signing prompt needs: the file identity (name, size,
/// digest) so the signature message can bind to the exact content, the
/// owner's display name, and the invited signer's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningProjection {
    pub file_name: String,
    pub file_size: u64,
    pub file_hash: ContentDigest,
    pub owner_name: String,
    pub signer_email: String,
    pub status: DocumentStatus,
}
