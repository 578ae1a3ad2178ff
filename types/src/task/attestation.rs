use serde::{Deserialize, Serialize};

use crate::{Address, SubmitTaskResult};

/// Whether attestors should return the full HTTP response they observed.
///
/// The network expects the literal strings `"true"` / `"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonResponseFlag {
    #[serde(rename = "true")]
    Enabled,
    #[serde(rename = "false")]
    Disabled,
}

impl JsonResponseFlag {
    pub fn is_enabled(&self) -> bool {
        matches!(self, JsonResponseFlag::Enabled)
    }
}

impl From<bool> for JsonResponseFlag {
    fn from(value: bool) -> Self {
        if value {
            JsonResponseFlag::Enabled
        } else {
            JsonResponseFlag::Disabled
        }
    }
}

/// Optional attestation tuning, sent as a JSON string in `extendedParams`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedParams {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub att_url_optimization: bool,
}

impl ExtendedParams {
    pub fn is_empty(&self) -> bool {
        !self.att_url_optimization
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Attest request: the full task descriptor plus template and caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestParams {
    pub template_id: String,
    pub address: Address,
    #[serde(flatten)]
    pub task: SubmitTaskResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_params: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_json_response_flag: Option<JsonResponseFlag>,
}

impl AttestParams {
    pub fn new(template_id: impl Into<String>, address: Address, task: SubmitTaskResult) -> Self {
        Self {
            template_id: template_id.into(),
            address,
            task,
            extended_params: None,
            all_json_response_flag: None,
        }
    }

    pub fn with_extended_params(mut self, params: &ExtendedParams) -> Self {
        if !params.is_empty() {
            self.extended_params = Some(params.to_json_string());
        }
        self
    }

    pub fn with_all_json_response(mut self, enabled: bool) -> Self {
        self.all_json_response_flag = enabled.then_some(JsonResponseFlag::Enabled);
        self
    }

    pub fn wants_all_json_response(&self) -> bool {
        self.all_json_response_flag
            .map(|flag| flag.is_enabled())
            .unwrap_or(false)
    }
}

/// One attestor's report for a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestResult {
    pub task_id: String,
    pub attestor: String,
    pub attestor_url: String,
    /// Transaction carrying the attestor's report
    pub report_tx_hash: String,
    /// Unix seconds
    pub attestation_time: u64,
}
