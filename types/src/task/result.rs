use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 120_000;

/// Parameters for verifying a report and waiting for task settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAndPollParams {
    pub task_id: String,
    pub report_tx_hash: String,
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl VerifyAndPollParams {
    pub fn new(task_id: impl Into<String>, report_tx_hash: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            report_tx_hash: report_tx_hash.into(),
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Attested payload of a settled task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationRecord {
    /// Opaque data extracted by the template
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Final, verified attestation for a task from one attestor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_id: String,
    pub attestor: String,
    pub attestation: AttestationRecord,
}

/// Task state as reported while polling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Settled,
    Failed { reason: String },
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_params_defaults() {
        let params = VerifyAndPollParams::new("t1", "0xreport");
        assert_eq!(params.interval(), Duration::from_secs(2));
        assert_eq!(params.timeout(), Duration::from_secs(120));

        let params = params.with_interval_ms(250).with_timeout_ms(1_000);
        assert_eq!(params.interval_ms, 250);
        assert_eq!(params.timeout_ms, 1_000);
    }

    #[test]
    fn test_task_status_wire_format() {
        let failed: TaskStatus =
            serde_json::from_str(r#"{"state":"failed","reason":"attestor offline"}"#).unwrap();
        assert_eq!(
            failed,
            TaskStatus::Failed {
                reason: "attestor offline".to_string()
            }
        );
        assert!(failed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
    }

    #[test]
    fn test_task_result_parses_camel_case() {
        let json = r#"{"taskId":"t1","attestor":"0xa","attestation":{"data":"{\"price\":1}"}}"#;
        let result: TaskResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.task_id, "t1");
        assert_eq!(result.attestation.data, "{\"price\":1}");
        assert!(result.attestation.timestamp.is_none());
    }
}
