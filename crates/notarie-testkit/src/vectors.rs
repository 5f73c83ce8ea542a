//! Golden test vectors.
//!
//! The content digest and the canonical signing message are protocol
//! surfaces: the backend reconstructs both independently, so every
//! implementation must produce byte-identical outputs for these inputs.

use notarie_core::{signing_message, ContentDigest};

/// A single golden test vector.
#[derive(Debug)]
pub struct GoldenVector {
    pub name: &'static str,
    /// Raw file content.
    pub payload: &'static [u8],
    /// Expected SHA-256 of the payload, bare hex.
    pub digest_hex: &'static str,
    /// File name used when building the signing message.
    pub file_name: &'static str,
    /// Expected canonical signing message.
    pub message: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty_payload",
            payload: b"",
            digest_hex: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            file_name: "empty.txt",
            message: "I confirm that I am signing document: empty.txt\nSHA-256: 0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        GoldenVector {
            name: "abc_payload",
            payload: b"abc",
            digest_hex: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            file_name: "abc.pdf",
            message: "I confirm that I am signing document: abc.pdf\nSHA-256: 0xba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        GoldenVector {
            name: "hello_world_payload",
            payload: b"hello world",
            digest_hex: "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
            file_name: "hello world.docx",
            message: "I confirm that I am signing document: hello world.docx\nSHA-256: 0xb94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        },
    ]
}

/// Recompute every vector and assert the outputs match.
pub fn verify_all_vectors() {
    for vector in all_vectors() {
        let digest = ContentDigest::hash(vector.payload);
        assert_eq!(
            digest.to_hex(),
            vector.digest_hex,
            "digest mismatch for {}",
            vector.name
        );
        assert_eq!(
            signing_message(vector.file_name, &digest),
            vector.message,
            "message mismatch for {}",
            vector.name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_verify() {
        verify_all_vectors();
    }

    #[test]
    fn test_vectors_deterministic() {
        for vector in all_vectors() {
            let d1 = ContentDigest::hash(vector.payload);
            let d2 = ContentDigest::hash(vector.payload);
            assert_eq!(d1, d2, "digest not deterministic for {}", vector.name);
        }
    }

    #[test]
    fn test_vector_digests_parse_as_wire_input() {
        // The bare and 0x-prefixed forms both resolve to the same digest.
        for vector in all_vectors() {
            let bare = ContentDigest::from_hex(vector.digest_hex).unwrap();
            let prefixed =
                ContentDigest::from_hex(&format!("0x{}", vector.digest_hex)).unwrap();
            assert_eq!(bare, prefixed);
        }
    }
}
