//! The canonical signing message.
//!
//! The signer's wallet signs a human-readable message that binds the
//! signature to the document's file name AND its content digest. Binding
//! the digest removes any ambiguity about which bytes were agreed to:
//! renaming a file changes nothing, altering one byte changes everything.

use crate::digest::ContentDigest;

/// Build the exact message presented to the signer's wallet.
///
/// The backend reconstructs this string from its own record and compares
/// byte-for-byte before accepting a signature, so the format is part of
/// the protocol and must not drift.
pub fn signing_message(file_name: &str, file_hash: &ContentDigest) -> String {
    format!(
        "I confirm that I am signing document: {}\nSHA-256: {}",
        file_name,
        file_hash.to_prefixed_hex()
    )
}
