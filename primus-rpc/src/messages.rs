//! Request/response bodies of the gateway HTTP API

use primus_types::{Address, AttestResult, ChainId, TaskResult, TaskStatus, TokenSymbol};
use serde::{Deserialize, Serialize};

/// Header carrying the session id on authenticated calls
pub const SESSION_HEADER: &str = "x-primus-session";

// ============================================
// Session
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub address: Address,
    pub chain_id: ChainId,
    pub message: String,
    /// 65-byte personal-message signature, `0x` hex
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
}

// ============================================
// Tasks
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskRequest {
    pub template_id: String,
    pub address: Address,
    pub chain_id: ChainId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestResponse {
    pub results: Vec<AttestResult>,
    /// Present when the attest request set `allJsonResponseFlag`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_json_response: Option<String>,
}

/// One poll of a task's state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResultResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub results: Vec<TaskResult>,
}

impl TaskResultResponse {
    pub fn pending() -> Self {
        Self {
            status: TaskStatus::Pending,
            results: Vec::new(),
        }
    }
}

// ============================================
// Rewards
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub token_symbol: TokenSymbol,
    pub page_size: u32,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    pub settled_task_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_result_response_defaults_results() {
        let response: TaskResultResponse =
            serde_json::from_str(r#"{"status":{"state":"pending"}}"#).unwrap();
        assert_eq!(response.status, TaskStatus::Pending);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_withdraw_request_shape() {
        let request = WithdrawRequest {
            token_symbol: TokenSymbol::Eth,
            page_size: 100,
            address: Address::ZERO,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tokenSymbol"], "ETH");
        assert_eq!(value["pageSize"], 100);
    }
}
