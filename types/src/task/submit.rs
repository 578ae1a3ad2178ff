use serde::{Deserialize, Serialize};

use crate::Address;

/// Request to create a task for a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskParams {
    /// Template registered with the network (data source + extraction rules)
    pub template_id: String,
    /// Account paying for and owning the task
    pub address: Address,
}

/// Task descriptor returned once the task transaction is on chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskResult {
    pub task_id: String,
    pub task_tx_hash: String,
    /// Attestors assigned to the task
    pub task_attestors: Vec<String>,
    /// Unix seconds
    pub submitted_at: u64,
}
