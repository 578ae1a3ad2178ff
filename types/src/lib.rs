// ========== Core Modules ==========
pub mod address;
pub mod chain;
pub mod task; // Task, attestation and settlement types exchanged with the network
pub mod token;

pub use address::Address;

// Chain selection
pub use chain::{ChainConfig, ChainId, NativeCurrency};

pub use token::TokenSymbol;

// Task lifecycle: submit → attest → poll → settle
pub use task::{
    AttestParams, AttestResult, AttestationRecord, ExtendedParams, JsonResponseFlag,
    SubmitTaskParams, SubmitTaskResult, TaskResult, TaskStatus, VerifyAndPollParams,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS,
};

// Error types
pub type TypesResult<T> = Result<T, TypesError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("Unknown token symbol: {0}")]
    UnknownTokenSymbol(String),
}
