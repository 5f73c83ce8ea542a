//! # Notarie API
//!
//! The backend seam of the Notarie client.
//!
//! The [`Backend`] trait mirrors the REST surface of the notarization
//! service; [`HttpBackend`] is the production implementation over reqwest,
//! and [`MemoryBackend`] carries the same server-side semantics in memory
//! for tests: single-use challenges, signer recovery, at-most-once
//! signing, and simulated chain anchoring.
//!
//! The backend is the trust boundary. The client never re-verifies login
//! signatures and never enforces signing races locally; it surfaces the
//! backend's verdicts (`Unauthorized`, `AlreadySigned`, ...) verbatim.

pub mod error;
pub mod http;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{ApiError, Result};
pub use http::{ApiConfig, HttpBackend};
pub use memory::MemoryBackend;
pub use traits::Backend;
pub use types::{
    ChallengeRequest, ChallengeResponse, CreateDocumentForm, CreateDocumentResponse,
    DocumentRecord, ErrorBody, SignRequest, StatusResponse, VerifyDocumentRequest, VerifyRequest,
    VerifyResponse,
};
