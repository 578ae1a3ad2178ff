//! The network client contract.

use async_trait::async_trait;
use primus_types::{
    Address, AttestParams, AttestResult, ChainId, SubmitTaskParams, SubmitTaskResult, TaskResult,
    TokenSymbol, VerifyAndPollParams,
};
use primus_wallet::Signer;
use std::sync::Arc;

use crate::error::Result;

/// Chains the network contracts are deployed on
pub const SUPPORTED_CHAIN_IDS: [ChainId; 2] = [ChainId::BASE_SEPOLIA, ChainId::BASE];

pub fn is_supported_chain(chain_id: ChainId) -> bool {
    SUPPORTED_CHAIN_IDS.contains(&chain_id)
}

/// Message signed by the wallet to open a session
pub fn session_message(address: Address, chain_id: ChainId, nonce: u64) -> String {
    format!(
        "Primus Network session\naddress: {}\nchain: {}\nnonce: {}",
        address, chain_id, nonce
    )
}

/// Operations the attestation network exposes to a client.
///
/// `init` must succeed before any other call; afterwards every call acts on
/// behalf of the signer passed to `init`.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Bind the client to a signer on a chain
    async fn init(&self, signer: Arc<dyn Signer>, chain_id: ChainId) -> Result<()>;

    fn supported_chain_ids(&self) -> Vec<ChainId> {
        SUPPORTED_CHAIN_IDS.to_vec()
    }

    /// Create a task; returns once the task transaction is known
    async fn submit_task(&self, params: SubmitTaskParams) -> Result<SubmitTaskResult>;

    /// Run the attestation with the task's assigned attestors
    async fn attest(&self, params: AttestParams) -> Result<Vec<AttestResult>>;

    /// Wait until the task settles (or fails, or the timeout elapses)
    async fn verify_and_poll_task_result(
        &self,
        params: VerifyAndPollParams,
    ) -> Result<Vec<TaskResult>>;

    /// Withdraw rewards of settled tasks; returns the task ids settled by this call
    async fn withdraw_balance(&self, token: TokenSymbol, page_size: u32) -> Result<Vec<String>>;

    /// Full HTTP response captured during `attest` with the JSON-response flag set
    fn get_all_json_response(&self, task_id: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_chains() {
        assert!(is_supported_chain(ChainId::BASE_SEPOLIA));
        assert!(is_supported_chain(ChainId::BASE));
        assert!(!is_supported_chain(ChainId(1)));
    }

    #[test]
    fn test_session_message_mentions_account_and_chain() {
        let message = session_message(Address::new([0xab; 20]), ChainId::BASE, 42);
        assert!(message.contains("0xabababababababababababababababababababab"));
        assert!(message.contains("chain: 8453"));
        assert!(message.ends_with("nonce: 42"));
    }
}
