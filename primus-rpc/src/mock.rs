//! In-memory attestation network for development and testing.
//!
//! The MockNetwork simulates the gateway without any chain access:
//! - Tasks get random ids and keccak-derived transaction hashes
//! - Every configured attestor reports on every task
//! - A task settles after a configurable number of polls
//! - Settled tasks accrue rewards until withdrawn
//!
//! Every call is recorded as a [`MockCall`] so callers can check ordering
//! and the exact parameters that reached the network.

use async_trait::async_trait;
use parking_lot::RwLock;
use primus_types::{
    Address, AttestParams, AttestResult, AttestationRecord, ChainId, SubmitTaskParams,
    SubmitTaskResult, TaskResult, TaskStatus, TokenSymbol, VerifyAndPollParams,
};
use primus_wallet::{keccak256, recover_address, Signer};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::client::{is_supported_chain, session_message, NetworkClient};
use crate::error::{Result, RpcError};
use crate::messages::TaskResultResponse;
use crate::poll::poll_until_settled;

/// Attestor simulated by the mock network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAttestor {
    pub address: String,
    pub url: String,
}

impl MockAttestor {
    pub fn new(address: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            url: url.into(),
        }
    }
}

/// A call that reached the mock network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Init { address: Address, chain_id: ChainId },
    SubmitTask(SubmitTaskParams),
    Attest(AttestParams),
    Poll(VerifyAndPollParams),
    Withdraw { token: TokenSymbol, page_size: u32 },
}

impl MockCall {
    pub fn name(&self) -> &'static str {
        match self {
            MockCall::Init { .. } => "init",
            MockCall::SubmitTask(_) => "submit_task",
            MockCall::Attest(_) => "attest",
            MockCall::Poll(_) => "poll",
            MockCall::Withdraw { .. } => "withdraw",
        }
    }
}

#[derive(Debug, Clone)]
struct MockConfig {
    attestors: Vec<MockAttestor>,
    polls_until_settled: u32,
    attestation_data: String,
    fail_submit: Option<String>,
    fail_attest: Option<String>,
    fail_withdraw: Option<String>,
    fail_task: Option<String>,
}

#[derive(Debug, Clone)]
struct MockTask {
    descriptor: SubmitTaskResult,
    template_id: String,
    owner: Address,
    reports: Vec<AttestResult>,
    polls: u32,
    settled: bool,
    withdrawn: bool,
}

/// Mock network implementing [`NetworkClient`]
pub struct MockNetwork {
    config: MockConfig,
    session: RwLock<Option<(Address, ChainId)>>,
    tasks: RwLock<HashMap<String, MockTask>>,
    calls: RwLock<Vec<MockCall>>,
    json_responses: RwLock<HashMap<String, String>>,
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn hash_hex(parts: &[&str]) -> String {
    format!("0x{}", hex::encode(keccak256(parts.concat().as_bytes())))
}

fn injected(message: &str) -> RpcError {
    RpcError::Http {
        status: 500,
        message: message.to_string(),
    }
}

impl MockNetwork {
    /// Mock network with default settings (two attestors, settles on second poll)
    pub fn new() -> Self {
        MockNetworkBuilder::new().build()
    }

    pub fn builder() -> MockNetworkBuilder {
        MockNetworkBuilder::new()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.read().iter().map(MockCall::name).collect()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }

    fn record(&self, call: MockCall) {
        self.calls.write().push(call);
    }

    fn session_account(&self) -> Result<Address> {
        let session = *self.session.read();
        session
            .map(|(address, _)| address)
            .ok_or(RpcError::NotInitialized)
    }

    /// One poll of a task; advances the task towards settlement
    fn poll_once(&self, task_id: &str) -> Result<TaskResultResponse> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| RpcError::InvalidRequest(format!("unknown task {}", task_id)))?;

        if let Some(reason) = &self.config.fail_task {
            return Ok(TaskResultResponse {
                status: TaskStatus::Failed {
                    reason: reason.clone(),
                },
                results: Vec::new(),
            });
        }

        task.polls += 1;
        if task.polls < self.config.polls_until_settled {
            return Ok(TaskResultResponse::pending());
        }

        task.settled = true;
        let timestamp = unix_secs();
        let results = task
            .reports
            .iter()
            .map(|report| TaskResult {
                task_id: task.descriptor.task_id.clone(),
                attestor: report.attestor.clone(),
                attestation: AttestationRecord {
                    data: self.config.attestation_data.clone(),
                    recipient: Some(task.owner.to_string()),
                    timestamp: Some(timestamp),
                },
            })
            .collect();

        Ok(TaskResultResponse {
            status: TaskStatus::Settled,
            results,
        })
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkClient for MockNetwork {
    async fn init(&self, signer: Arc<dyn Signer>, chain_id: ChainId) -> Result<()> {
        let address = signer.address();
        self.record(MockCall::Init { address, chain_id });

        if !is_supported_chain(chain_id) {
            return Err(RpcError::UnsupportedChain(chain_id));
        }

        let message = session_message(address, chain_id, unix_secs());
        let signature = signer.sign_message(message.as_bytes()).await?;
        let recovered = recover_address(message.as_bytes(), &signature)?;
        if recovered != address {
            return Err(RpcError::InvalidRequest(format!(
                "session signature recovers to {}, expected {}",
                recovered, address
            )));
        }

        *self.session.write() = Some((address, chain_id));
        info!(address = %address, chain_id = %chain_id, "Mock network session opened");
        Ok(())
    }

    async fn submit_task(&self, params: SubmitTaskParams) -> Result<SubmitTaskResult> {
        self.record(MockCall::SubmitTask(params.clone()));
        let owner = self.session_account()?;
        if params.address != owner {
            return Err(RpcError::InvalidRequest(format!(
                "task address {} does not match session account {}",
                params.address, owner
            )));
        }

        if let Some(message) = &self.config.fail_submit {
            return Err(injected(message));
        }
        if params.template_id.is_empty() {
            return Err(RpcError::InvalidRequest("empty template id".to_string()));
        }

        let task_id = format!("0x{}", uuid::Uuid::new_v4().simple());
        let descriptor = SubmitTaskResult {
            task_id: task_id.clone(),
            task_tx_hash: hash_hex(&["submit:", &task_id]),
            task_attestors: self
                .config
                .attestors
                .iter()
                .map(|a| a.address.clone())
                .collect(),
            submitted_at: unix_secs(),
        };

        self.tasks.write().insert(
            task_id.clone(),
            MockTask {
                descriptor: descriptor.clone(),
                template_id: params.template_id,
                owner,
                reports: Vec::new(),
                polls: 0,
                settled: false,
                withdrawn: false,
            },
        );

        debug!(task_id = %task_id, "Mock task created");
        Ok(descriptor)
    }

    async fn attest(&self, params: AttestParams) -> Result<Vec<AttestResult>> {
        self.record(MockCall::Attest(params.clone()));
        self.session_account()?;

        if let Some(message) = &self.config.fail_attest {
            return Err(injected(message));
        }

        let mut tasks = self.tasks.write();
        let task = tasks
            .get_mut(&params.task.task_id)
            .ok_or_else(|| RpcError::InvalidRequest(format!("unknown task {}", params.task.task_id)))?;

        if task.template_id != params.template_id {
            return Err(RpcError::InvalidRequest(format!(
                "template {} does not match task template {}",
                params.template_id, task.template_id
            )));
        }

        let now = unix_secs();
        let task_id = task.descriptor.task_id.clone();
        task.reports = self
            .config
            .attestors
            .iter()
            .map(|attestor| AttestResult {
                task_id: task_id.clone(),
                attestor: attestor.address.clone(),
                attestor_url: attestor.url.clone(),
                report_tx_hash: hash_hex(&["report:", &task_id, &attestor.address]),
                attestation_time: now,
            })
            .collect();

        if params.wants_all_json_response() {
            let response = serde_json::json!({
                "taskId": task_id,
                "templateId": params.template_id,
                "response": {
                    "status": 200,
                    "body": self.config.attestation_data,
                },
            });
            self.json_responses
                .write()
                .insert(task_id.clone(), response.to_string());
        }

        Ok(task.reports.clone())
    }

    async fn verify_and_poll_task_result(
        &self,
        params: VerifyAndPollParams,
    ) -> Result<Vec<TaskResult>> {
        self.record(MockCall::Poll(params.clone()));
        self.session_account()?;

        {
            let tasks = self.tasks.read();
            let task = tasks
                .get(&params.task_id)
                .ok_or_else(|| RpcError::InvalidRequest(format!("unknown task {}", params.task_id)))?;
            if !task
                .reports
                .iter()
                .any(|r| r.report_tx_hash == params.report_tx_hash)
            {
                return Err(RpcError::InvalidRequest(format!(
                    "report {} does not belong to task {}",
                    params.report_tx_hash, params.task_id
                )));
            }
        }

        poll_until_settled(&params, || {
            let response = self.poll_once(&params.task_id);
            async move { response }
        })
        .await
    }

    async fn withdraw_balance(&self, token: TokenSymbol, page_size: u32) -> Result<Vec<String>> {
        self.record(MockCall::Withdraw { token, page_size });
        let owner = self.session_account()?;
        if page_size == 0 {
            return Err(RpcError::InvalidRequest("page size must be positive".to_string()));
        }

        if let Some(message) = &self.config.fail_withdraw {
            return Err(injected(message));
        }

        let mut tasks = self.tasks.write();
        let mut claimable: Vec<&mut MockTask> = tasks
            .values_mut()
            .filter(|t| t.owner == owner && t.settled && !t.withdrawn)
            .collect();
        if claimable.is_empty() {
            return Err(RpcError::NoRewards);
        }

        claimable.sort_by_key(|t| t.descriptor.submitted_at);
        let settled = claimable
            .into_iter()
            .take(page_size as usize)
            .map(|task| {
                task.withdrawn = true;
                task.descriptor.task_id.clone()
            })
            .collect::<Vec<_>>();

        info!(token = %token, tasks = settled.len(), "Mock rewards withdrawn");
        Ok(settled)
    }

    fn get_all_json_response(&self, task_id: &str) -> Option<String> {
        self.json_responses.read().get(task_id).cloned()
    }
}

/// Builder for MockNetwork
pub struct MockNetworkBuilder {
    config: MockConfig,
}

impl MockNetworkBuilder {
    pub fn new() -> Self {
        Self {
            config: MockConfig {
                attestors: vec![
                    MockAttestor::new(
                        "0x0000000000000000000000000000000000a77e51",
                        "https://attestor-1.mock.primus.local",
                    ),
                    MockAttestor::new(
                        "0x0000000000000000000000000000000000a77e52",
                        "https://attestor-2.mock.primus.local",
                    ),
                ],
                polls_until_settled: 2,
                attestation_data: r#"{"result":"ok"}"#.to_string(),
                fail_submit: None,
                fail_attest: None,
                fail_withdraw: None,
                fail_task: None,
            },
        }
    }

    /// Replace the attestor set
    pub fn attestors(mut self, attestors: Vec<MockAttestor>) -> Self {
        self.config.attestors = attestors;
        self
    }

    /// Number of polls after which a task reports settled (0 and 1 settle immediately)
    pub fn settle_after_polls(mut self, polls: u32) -> Self {
        self.config.polls_until_settled = polls;
        self
    }

    pub fn attestation_data(mut self, data: impl Into<String>) -> Self {
        self.config.attestation_data = data.into();
        self
    }

    pub fn fail_submit(mut self, message: impl Into<String>) -> Self {
        self.config.fail_submit = Some(message.into());
        self
    }

    pub fn fail_attest(mut self, message: impl Into<String>) -> Self {
        self.config.fail_attest = Some(message.into());
        self
    }

    pub fn fail_withdraw(mut self, message: impl Into<String>) -> Self {
        self.config.fail_withdraw = Some(message.into());
        self
    }

    /// Report every task as failed when polled
    pub fn fail_task(mut self, reason: impl Into<String>) -> Self {
        self.config.fail_task = Some(reason.into());
        self
    }

    pub fn build(self) -> MockNetwork {
        MockNetwork {
            config: self.config,
            session: RwLock::new(None),
            tasks: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
            json_responses: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MockNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primus_wallet::LocalSigner;

    async fn initialized(network: MockNetwork) -> (MockNetwork, Address) {
        let signer = Arc::new(LocalSigner::generate());
        let address = signer.address();
        network.init(signer, ChainId::BASE_SEPOLIA).await.unwrap();
        (network, address)
    }

    fn fast_poll(task_id: &str, report: &str) -> VerifyAndPollParams {
        VerifyAndPollParams::new(task_id, report)
            .with_interval_ms(5)
            .with_timeout_ms(1_000)
    }

    #[tokio::test]
    async fn test_requires_init() {
        let network = MockNetwork::new();
        let err = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address: Address::ZERO,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::NotInitialized));
    }

    #[tokio::test]
    async fn test_full_task_lifecycle() {
        let (network, address) = initialized(MockNetwork::new()).await;

        let task = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address,
            })
            .await
            .unwrap();
        assert_eq!(task.task_attestors.len(), 2);
        assert!(task.task_tx_hash.starts_with("0x"));

        let reports = network
            .attest(AttestParams::new("tpl", address, task.clone()).with_all_json_response(true))
            .await
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.task_id == task.task_id));

        let results = network
            .verify_and_poll_task_result(fast_poll(&task.task_id, &reports[0].report_tx_hash))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].attestation.data, r#"{"result":"ok"}"#);

        let json = network.get_all_json_response(&task.task_id).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["taskId"], task.task_id.as_str());

        let settled = network.withdraw_balance(TokenSymbol::Eth, 100).await.unwrap();
        assert_eq!(settled, vec![task.task_id.clone()]);

        // Rewards are paid once
        let again = network.withdraw_balance(TokenSymbol::Eth, 100).await;
        assert!(matches!(again, Err(RpcError::NoRewards)));

        assert_eq!(
            network.call_names(),
            vec!["init", "submit_task", "attest", "poll", "withdraw", "withdraw"]
        );
    }

    #[tokio::test]
    async fn test_poll_rejects_foreign_report() {
        let (network, address) = initialized(MockNetwork::new()).await;
        let task = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address,
            })
            .await
            .unwrap();
        network
            .attest(AttestParams::new("tpl", address, task.clone()))
            .await
            .unwrap();

        let err = network
            .verify_and_poll_task_result(fast_poll(&task.task_id, "0xdeadbeef"))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_failed_task_surfaces() {
        let (network, address) =
            initialized(MockNetwork::builder().fail_task("attestor quorum not reached").build())
                .await;
        let task = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address,
            })
            .await
            .unwrap();
        let reports = network
            .attest(AttestParams::new("tpl", address, task.clone()))
            .await
            .unwrap();

        let err = network
            .verify_and_poll_task_result(fast_poll(&task.task_id, &reports[0].report_tx_hash))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::TaskFailed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_settlement_times_out() {
        let (network, address) =
            initialized(MockNetwork::builder().settle_after_polls(1_000).build()).await;
        let task = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address,
            })
            .await
            .unwrap();
        let reports = network
            .attest(AttestParams::new("tpl", address, task.clone()))
            .await
            .unwrap();

        let err = network
            .verify_and_poll_task_result(
                VerifyAndPollParams::new(task.task_id.clone(), reports[0].report_tx_hash.clone())
                    .with_interval_ms(2_000)
                    .with_timeout_ms(10_000),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_withdraw_without_settlement() {
        let (network, _) = initialized(MockNetwork::new()).await;
        let err = network
            .withdraw_balance(TokenSymbol::Eth, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::NoRewards));
    }

    #[tokio::test]
    async fn test_submit_for_other_account_rejected() {
        let (network, _) = initialized(MockNetwork::new()).await;
        let err = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address: Address::new([0x11; 20]),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidRequest(_)));
        assert_eq!(network.task_count(), 0);
    }

    #[tokio::test]
    async fn test_withdraw_zero_page_size_rejected() {
        let (network, address) =
            initialized(MockNetwork::builder().settle_after_polls(1).build()).await;
        let task = network
            .submit_task(SubmitTaskParams {
                template_id: "tpl".to_string(),
                address,
            })
            .await
            .unwrap();
        let reports = network
            .attest(AttestParams::new("tpl", address, task.clone()))
            .await
            .unwrap();
        network
            .verify_and_poll_task_result(fast_poll(&task.task_id, &reports[0].report_tx_hash))
            .await
            .unwrap();

        let err = network.withdraw_balance(TokenSymbol::Eth, 0).await.unwrap_err();
        assert!(matches!(err, RpcError::InvalidRequest(_)));

        // The settled task is still claimable
        let settled = network.withdraw_balance(TokenSymbol::Eth, 1).await.unwrap();
        assert_eq!(settled, vec![task.task_id]);
    }

    #[tokio::test]
    async fn test_init_unsupported_chain() {
        let network = MockNetwork::new();
        let err = network
            .init(Arc::new(LocalSigner::generate()), ChainId(10))
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::UnsupportedChain(_)));
    }
}
