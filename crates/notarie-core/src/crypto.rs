//! Wallet signature primitives.
//!
//! Wraps secp256k1 personal-message signing and recovery with strong types.
//! The client never verifies login signatures itself (the backend is the
//! trust boundary for issuing credentials); these primitives exist for the
//! in-memory wallet and backend used in tests, which must behave exactly
//! like their production counterparts.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::CoreError;
use crate::identity::Address;

/// Keccak-256 of the given bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// The EIP-191 personal-message digest: the wallet signs
/// `keccak256("\x19Ethereum Signed Message:\n" || len || message)`.
pub fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// A 65-byte recoverable signature (r || s || v), as produced by wallet
/// `personal_sign`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature(pub [u8; 65]);

impl WalletSignature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// `0x`-prefixed hex form used on the wire.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        if hex_part.len() != 130 {
            return Err(CoreError::InvalidSignatureBytes);
        }
        let bytes = hex::decode(hex_part).map_err(|_| CoreError::InvalidSignatureBytes)?;
        let mut arr = [0u8; 65];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletSignature({}...)", &hex::encode(self.0)[..16])
    }
}

impl Serialize for WalletSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WalletSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Recover the address that signed `message` with `personal_sign`.
///
/// This is the server side of the trust boundary: the backend recovers the
/// signer and compares it to the claimed identity. The in-memory backend
/// does the same.
pub fn recover_signer(message: &str, signature: &WalletSignature) -> Result<Address, CoreError> {
    let digest = personal_message_hash(message);

    let sig = EcdsaSignature::from_slice(&signature.0[..64])
        .map_err(|_| CoreError::InvalidSignatureBytes)?;

    let v = signature.0[64];
    // Accept both the raw recovery id (0/1) and the Ethereum convention (27/28).
    let recovery_byte = if v >= 27 { v - 27 } else { v };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(CoreError::InvalidSignatureBytes)?;

    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|_| CoreError::RecoveryFailed)?;

    Ok(address_of(&verifying_key))
}

/// Derive the account address of a public key: the low 20 bytes of the
/// Keccak-256 of the uncompressed point (without the 0x04 tag).
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    Address(addr)
}

/// A secp256k1 keypair able to produce wallet signatures.
///
/// Production wallets keep the key behind an external signer; this type
/// backs the in-memory wallet and the test backend.
#[derive(Clone)]
pub struct EthKeypair {
    signing_key: SigningKey,
}

impl EthKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CoreError> {
        let signing_key =
            SigningKey::from_slice(seed).map_err(|_| CoreError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// The account address for this keypair.
    pub fn address(&self) -> Address {
        address_of(self.signing_key.verifying_key())
    }

    /// Sign a message the way wallet `personal_sign` does.
    pub fn personal_sign(&self, message: &str) -> WalletSignature {
        let digest = personal_message_hash(message);
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(&digest)
            .expect("signing with a valid key cannot fail");

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(sig.to_bytes().as_slice());
        bytes[64] = 27 + recovery_id.to_byte();
        WalletSignature(bytes)
    }
}

impl fmt::Debug for EthKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthKeypair({:?})", self.address())
    }
}
