//! The attestation flow.
//!
//! ```text
//! connect_and_initialize ─▶ submit_task ─▶ execute_attestation ─▶ poll_task_result
//!                                                                      │
//!                              (optional) get_full_response ◀──────────┤
//!                              (optional) withdraw_balance  ◀──────────┘
//! ```
//!
//! Steps run strictly in order and each consumes the previous output.
//! Failures before the optional steps abort the flow and are returned
//! unchanged; a failed withdrawal only yields an empty list.

use primus_rpc::{NetworkClient, RpcError};
use primus_types::{
    Address, AttestParams, AttestResult, ChainId, ExtendedParams, SubmitTaskParams,
    SubmitTaskResult, TaskResult, TokenSymbol,
};
use primus_wallet::{ensure_network, NetworkSwitch, Signer, WalletError, WalletProvider};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{Config, PollConfig};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Attestation returned no results for task {0}")]
    EmptyAttestation(String),
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;

/// Progress callbacks; every method defaults to doing nothing
pub trait FlowReporter: Send + Sync {
    fn connected(&self, _session: &Session) {}
    fn submitting(&self) {}
    fn submitted(&self, _task: &SubmitTaskResult) {}
    fn attesting(&self) {}
    fn attested(&self, _results: &[AttestResult]) {}
    fn polling(&self, _task_id: &str, _poll: &PollConfig) {}
    fn settled(&self, _results: &[TaskResult]) {}
    fn poll_failed(&self) {}
    fn full_response(&self, _task_id: &str, _response: Option<&Value>) {}
    fn withdrawn(&self, _task_ids: &[String]) {}
    fn withdraw_skipped(&self, _error: &RpcError) {}
}

/// Reporter that ignores all progress
pub struct SilentReporter;

impl FlowReporter for SilentReporter {}

/// Connected account and the signer bound to the network client
#[derive(Clone)]
pub struct Session {
    pub address: Address,
    pub chain_id: ChainId,
    pub signer: Arc<dyn Signer>,
    pub network_switch: NetworkSwitch,
    pub supported_chain_ids: Vec<ChainId>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("network_switch", &self.network_switch)
            .finish_non_exhaustive()
    }
}

/// What a run should do beyond the mandatory steps
#[derive(Debug, Clone)]
pub struct FlowOptions {
    pub chain_id: ChainId,
    pub template_id: String,
    pub poll: PollConfig,
    pub extended_params: ExtendedParams,
    /// Ask attestors for the full HTTP response and return it parsed
    pub full_response: bool,
    /// Withdraw rewards after settlement
    pub withdraw: Option<WithdrawOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOptions {
    pub token: TokenSymbol,
    pub page_size: u32,
}

impl FlowOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chain_id: config.chain_id,
            template_id: config.template_id.clone(),
            poll: config.poll.clone(),
            extended_params: ExtendedParams::default(),
            full_response: false,
            withdraw: None,
        }
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub address: Address,
    pub submit: SubmitTaskResult,
    pub attest: Vec<AttestResult>,
    pub results: Vec<TaskResult>,
    pub full_response: Option<Value>,
    pub settled_task_ids: Option<Vec<String>>,
}

/// Connect the wallet, select the chain, then initialize the network client.
///
/// The wallet is switched to `chain_id` before `init` is called.
pub async fn connect_and_initialize(
    provider: &dyn WalletProvider,
    client: &dyn NetworkClient,
    chain_id: ChainId,
    reporter: &dyn FlowReporter,
) -> FlowResult<Session> {
    info!("Connecting wallet");
    let accounts = provider.request_accounts().await?;
    let address = *accounts.first().ok_or(WalletError::NoAccounts)?;
    let signer = provider.signer(address)?;
    info!(address = %address, "Wallet connected");

    let network_switch = ensure_network(provider, chain_id).await?;

    info!(chain_id = %chain_id, "Initializing network client");
    client.init(signer.clone(), chain_id).await?;

    let supported_chain_ids = client.supported_chain_ids();
    info!(
        supported = ?supported_chain_ids.iter().map(|c| c.value()).collect::<Vec<_>>(),
        "Network client initialized"
    );

    let session = Session {
        address,
        chain_id,
        signer,
        network_switch,
        supported_chain_ids,
    };
    reporter.connected(&session);
    Ok(session)
}

pub async fn submit_task(
    client: &dyn NetworkClient,
    template_id: &str,
    address: Address,
    reporter: &dyn FlowReporter,
) -> FlowResult<SubmitTaskResult> {
    reporter.submitting();
    let task = client
        .submit_task(SubmitTaskParams {
            template_id: template_id.to_string(),
            address,
        })
        .await?;

    info!(
        task_id = %task.task_id,
        tx_hash = %task.task_tx_hash,
        attestors = task.task_attestors.len(),
        "Task submitted"
    );
    reporter.submitted(&task);
    Ok(task)
}

pub async fn execute_attestation(
    client: &dyn NetworkClient,
    template_id: &str,
    address: Address,
    task: &SubmitTaskResult,
    extended_params: &ExtendedParams,
    all_json_response: bool,
    reporter: &dyn FlowReporter,
) -> FlowResult<Vec<AttestResult>> {
    reporter.attesting();
    let params = AttestParams::new(template_id, address, task.clone())
        .with_extended_params(extended_params)
        .with_all_json_response(all_json_response);

    let results = client.attest(params).await?;
    if results.is_empty() {
        return Err(FlowError::EmptyAttestation(task.task_id.clone()));
    }

    info!(task_id = %task.task_id, results = results.len(), "Attestation complete");
    reporter.attested(&results);
    Ok(results)
}

pub async fn poll_task_result(
    client: &dyn NetworkClient,
    task_id: &str,
    report_tx_hash: &str,
    poll: &PollConfig,
    reporter: &dyn FlowReporter,
) -> FlowResult<Vec<TaskResult>> {
    reporter.polling(task_id, poll);
    let outcome = client
        .verify_and_poll_task_result(poll.params(task_id, report_tx_hash))
        .await;

    match outcome {
        Ok(results) => {
            info!(task_id = %task_id, results = results.len(), "Task complete");
            reporter.settled(&results);
            Ok(results)
        }
        Err(e) => {
            reporter.poll_failed();
            Err(e.into())
        }
    }
}

/// Withdraw settled rewards; any failure means there was nothing to withdraw
pub async fn withdraw_balance(
    client: &dyn NetworkClient,
    token: TokenSymbol,
    page_size: u32,
    reporter: &dyn FlowReporter,
) -> Vec<String> {
    match client.withdraw_balance(token, page_size).await {
        Ok(task_ids) => {
            info!(token = %token, settled = task_ids.len(), "Rewards withdrawn");
            reporter.withdrawn(&task_ids);
            task_ids
        }
        Err(e) => {
            warn!(error = %e, "Withdrawal failed or no rewards available");
            reporter.withdraw_skipped(&e);
            Vec::new()
        }
    }
}

/// Full HTTP response captured during attestation, parsed as JSON
pub fn get_full_response(
    client: &dyn NetworkClient,
    task_id: &str,
    reporter: &dyn FlowReporter,
) -> Option<Value> {
    let parsed = match client.get_all_json_response(task_id) {
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Full response is not valid JSON");
                Some(Value::String(raw))
            }
        },
        None => {
            warn!(
                task_id = %task_id,
                "No full response recorded; attest with the JSON-response flag enabled"
            );
            None
        }
    };
    reporter.full_response(task_id, parsed.as_ref());
    parsed
}

/// Run the whole flow
pub async fn run_flow(
    provider: &dyn WalletProvider,
    client: &dyn NetworkClient,
    options: &FlowOptions,
    reporter: &dyn FlowReporter,
) -> FlowResult<FlowOutcome> {
    match run_steps(provider, client, options, reporter).await {
        Ok(outcome) => {
            info!(task_id = %outcome.submit.task_id, "Attestation flow complete");
            Ok(outcome)
        }
        Err(e) => {
            error!(error = %e, "Attestation flow failed");
            Err(e)
        }
    }
}

async fn run_steps(
    provider: &dyn WalletProvider,
    client: &dyn NetworkClient,
    options: &FlowOptions,
    reporter: &dyn FlowReporter,
) -> FlowResult<FlowOutcome> {
    let session = connect_and_initialize(provider, client, options.chain_id, reporter).await?;

    let submit = submit_task(client, &options.template_id, session.address, reporter).await?;

    let attest = execute_attestation(
        client,
        &options.template_id,
        session.address,
        &submit,
        &options.extended_params,
        options.full_response,
        reporter,
    )
    .await?;

    // Non-empty, checked by execute_attestation
    let first = &attest[0];
    let results = poll_task_result(
        client,
        &first.task_id,
        &first.report_tx_hash,
        &options.poll,
        reporter,
    )
    .await?;

    let full_response = if options.full_response {
        get_full_response(client, &first.task_id, reporter)
    } else {
        None
    };

    let settled_task_ids = match options.withdraw {
        Some(withdraw) => {
            Some(withdraw_balance(client, withdraw.token, withdraw.page_size, reporter).await)
        }
        None => None,
    };

    Ok(FlowOutcome {
        address: session.address,
        submit,
        attest,
        results,
        full_response,
        settled_task_ids,
    })
}
