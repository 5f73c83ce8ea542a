//! Proptest strategies for property-based testing.

use proptest::prelude::*;

use notarie_core::{Address, Contact, ContentDigest, DocumentStatus, ALLOWED_EXTENSIONS};

/// Arbitrary content digests.
pub fn digest_strategy() -> impl Strategy<Value = ContentDigest> {
    prop::array::uniform32(any::<u8>()).prop_map(ContentDigest::from_bytes)
}

/// Arbitrary account addresses.
pub fn address_strategy() -> impl Strategy<Value = Address> {
    prop::array::uniform20(any::<u8>()).prop_map(Address::from_bytes)
}

/// File names with an extension from the upload allow-list.
pub fn allowed_file_name_strategy() -> impl Strategy<Value = String> {
    ("[a-z0-9_-]{1,16}", 0..ALLOWED_EXTENSIONS.len())
        .prop_map(|(stem, i)| format!("{}.{}", stem, ALLOWED_EXTENSIONS[i]))
}

/// Contacts that pass validation.
pub fn contact_strategy() -> impl Strategy<Value = Contact> {
    ("[A-Za-z]{2,12}", "[A-Za-z]{2,12}", "[a-z]{1,8}", "[a-z]{2,8}")
        .prop_map(|(first, last, user, domain)| {
            Contact::new(&first, &last, &format!("{}@{}.com", user, domain))
        })
}

/// Arbitrary non-empty file payloads.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..4096)
}

/// Any document status.
pub fn status_strategy() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Pending),
        Just(DocumentStatus::Sent),
        Just(DocumentStatus::Signed),
        Just(DocumentStatus::Cancelled),
        Just(DocumentStatus::Expired),
    ]
}
