//! Task types exchanged between the client and the attestation network.
//!
//! A task moves through three calls, each consuming the previous output:
//!
//! ```text
//! SubmitTaskParams ──submit──▶ SubmitTaskResult
//!                                   │
//!                 AttestParams ◀────┘ (flattened into the attest request)
//!                      │
//!                      └──attest──▶ Vec<AttestResult>
//!                                         │ first (task_id, report_tx_hash)
//!                 VerifyAndPollParams ◀───┘
//!                      │
//!                      └──poll────▶ Vec<TaskResult>
//! ```
//!
//! ## Module Organization
//!
//! - `submit` - task submission request and descriptor
//! - `attestation` - attest request and per-attestor results
//! - `result` - polling parameters, task status and final records

mod attestation;
mod result;
mod submit;

// Re-export all types
pub use attestation::{AttestParams, AttestResult, ExtendedParams, JsonResponseFlag};
pub use result::{
    AttestationRecord, TaskResult, TaskStatus, VerifyAndPollParams, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_POLL_TIMEOUT_MS,
};
pub use submit::{SubmitTaskParams, SubmitTaskResult};
