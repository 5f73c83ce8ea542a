//! # Notarie Testkit
//!
//! Testing utilities for the Notarie client.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a shared in-memory backend with owner/signer wallets
//!   and wired clients
//! - **Generators**: proptest strategies for property-based testing
//! - **Golden vectors**: known digests and canonical signing messages for
//!   cross-implementation verification
//!
//! ## Test Fixtures
//!
//! Quickly set up a notarization scenario:
//!
//! ```rust
//! use notarie_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let owner = fixture.owner_client();
//! let signer = fixture.signer_client();
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use notarie_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    deterministic_wallets, owner_contact, sample_pdf, signer_contact, FixtureClient, TestFixture,
};
pub use generators::{
    address_strategy, allowed_file_name_strategy, contact_strategy, digest_strategy,
    payload_strategy, status_strategy,
};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
