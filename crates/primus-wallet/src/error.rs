//! Wallet error types

use primus_types::{Address, ChainId};
use thiserror::Error;

/// EIP-1193: the user rejected the request
pub const ERROR_USER_REJECTED: i64 = 4001;
/// EIP-3326: the wallet does not know the requested chain
pub const ERROR_UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("No wallet provider available")]
    NoProvider,

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Account {0} is not managed by this wallet")]
    UnknownAccount(Address),

    #[error("User rejected the request")]
    UserRejected,

    #[error("Unrecognized chain id {0}")]
    UnrecognizedChain(ChainId),

    #[error("No built-in configuration for chain {0}")]
    UnsupportedChain(ChainId),

    #[error("Wallet RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// Map an EIP-1193 error object onto a typed error
    pub fn from_rpc(code: i64, message: impl Into<String>, chain_id: Option<ChainId>) -> Self {
        match (code, chain_id) {
            (ERROR_USER_REJECTED, _) => WalletError::UserRejected,
            (ERROR_UNRECOGNIZED_CHAIN, Some(chain_id)) => WalletError::UnrecognizedChain(chain_id),
            _ => WalletError::Rpc {
                code,
                message: message.into(),
            },
        }
    }

    /// EIP-1193 error code, where one applies
    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::UserRejected => Some(ERROR_USER_REJECTED),
            WalletError::UnrecognizedChain(_) => Some(ERROR_UNRECOGNIZED_CHAIN),
            WalletError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code() == Some(ERROR_UNRECOGNIZED_CHAIN)
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::Transport(e.to_string())
    }
}

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_code_mapping() {
        assert!(matches!(
            WalletError::from_rpc(4001, "denied", None),
            WalletError::UserRejected
        ));
        let err = WalletError::from_rpc(4902, "unknown chain", Some(ChainId::BASE));
        assert!(err.is_unrecognized_chain());

        let other = WalletError::from_rpc(-32603, "internal", None);
        assert_eq!(other.code(), Some(-32603));
        assert!(!other.is_unrecognized_chain());
    }

    #[test]
    fn test_unrecognized_code_without_chain_stays_raw() {
        let err = WalletError::from_rpc(4902, "unknown chain", None);
        assert!(matches!(err, WalletError::Rpc { code: 4902, .. }));
        assert!(err.is_unrecognized_chain());
    }
}
