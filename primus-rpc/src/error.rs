//! RPC error types

use primus_types::ChainId;
use primus_wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Client not initialized, call init() first")]
    NotInitialized,

    #[error("Unsupported chain id: {0}")]
    UnsupportedChain(ChainId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Task {task_id} failed: {reason}")]
    TaskFailed { task_id: String, reason: String },

    /// The task did not settle before the poll deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A single gateway request exceeded the client's request timeout
    #[error("Gateway request timed out: {0}")]
    RequestTimeout(String),

    #[error("No settled rewards to withdraw")]
    NoRewards,

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
}

impl RpcError {
    /// Build an HTTP error from a non-success response, keeping the body as message
    pub async fn from_response(response: reqwest::Response) -> RpcError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        RpcError::Http { status, message }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RpcError::Serialization(e.to_string())
        } else if e.is_timeout() {
            RpcError::RequestTimeout(e.to_string())
        } else {
            RpcError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        RpcError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
