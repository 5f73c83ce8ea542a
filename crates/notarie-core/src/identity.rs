//! Identities: blockchain account addresses acting as login principals.
//!
//! An address is self-authenticating. There are no passwords anywhere in
//! the system; control of the corresponding private key is proven through
//! the challenge-response protocol.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

use crate::error::CoreError;

/// A 20-byte account address.
///
/// Parsed from the `0x` + 40 hex character form. Comparison is byte-wise,
/// so hex case never affects equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse from the `0x`-prefixed hex form.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| CoreError::InvalidAddress(s.to_string()))?;
        if hex_part.len() != 40 {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        let bytes =
            hex::decode(hex_part).map_err(|_| CoreError::InvalidAddress(s.to_string()))?;
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Lowercase `0x`-prefixed hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksum form, used for display.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash: [u8; 32] = Keccak256::digest(lower.as_bytes()).into();

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Contact details attached to the owner and signer of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Contact {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        }
    }

    /// Full name for display ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_round_trip() {
        let addr = Address::from_bytes([0xab; 20]);
        let recovered = Address::from_hex(&addr.to_hex()).unwrap();
        assert_eq!(addr, recovered);
    }

    #[test]
    fn test_address_case_insensitive_parse() {
        let lower = Address::from_hex("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd").unwrap();
        let upper = Address::from_hex("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_address_rejects_malformed() {
        assert!(Address::from_hex("abcdefabcdefabcdefabcdefabcdefabcdefabcd").is_err());
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("0xzzcdefabcdefabcdefabcdefabcdefabcdefabcd").is_err());
        assert!(Address::from_hex("").is_err());
    }

    #[test]
    fn test_eip55_checksum_vector() {
        // Checksum vector from EIP-55.
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_contact_full_name() {
        let contact = Contact::new("John", "Doe", "john.doe@example.com");
        assert_eq!(contact.full_name(), "John Doe");
    }

    #[test]
    fn test_contact_wire_field_names() {
        let contact = Contact::new("John", "Doe", "john.doe@example.com");
        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("lastName").is_some());
        assert!(json.get("email").is_some());
    }
}
