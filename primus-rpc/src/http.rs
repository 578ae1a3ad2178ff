//! HTTP client for the network gateway.

use async_trait::async_trait;
use parking_lot::RwLock;
use primus_types::{
    AttestParams, AttestResult, ChainId, SubmitTaskParams, SubmitTaskResult, TaskResult,
    TokenSymbol, VerifyAndPollParams,
};
use primus_wallet::Signer;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::client::{is_supported_chain, session_message, NetworkClient};
use crate::error::{Result, RpcError};
use crate::messages::{
    AttestResponse, SessionRequest, SessionResponse, SubmitTaskRequest, TaskResultResponse,
    WithdrawRequest, WithdrawResponse, SESSION_HEADER,
};
use crate::poll::poll_until_settled;

/// Configuration for [`HttpNetworkClient`]
#[derive(Debug, Clone)]
pub struct HttpNetworkClientConfig {
    /// Gateway base URL, e.g. `http://127.0.0.1:8700`
    pub base_url: String,
    /// Per-request timeout (polling has its own overall timeout)
    pub request_timeout: Duration,
}

impl Default for HttpNetworkClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8700".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpNetworkClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

struct Session {
    signer: Arc<dyn Signer>,
    chain_id: ChainId,
    session_id: String,
}

pub struct HttpNetworkClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<Session>>,
    /// task id → full HTTP response captured during attest
    json_responses: RwLock<HashMap<String, String>>,
}

impl HttpNetworkClient {
    pub fn new(config: HttpNetworkClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RpcError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
            json_responses: RwLock::new(HashMap::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Session id, signer and chain of the active session
    fn session(&self) -> Result<(String, Arc<dyn Signer>, ChainId)> {
        self.session
            .read()
            .as_ref()
            .map(|s| (s.session_id.clone(), s.signer.clone(), s.chain_id))
            .ok_or(RpcError::NotInitialized)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(RpcError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        session_id: Option<&str>,
        body: &B,
    ) -> Result<T> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(id) = session_id {
            request = request.header(SESSION_HEADER, id);
        }
        Self::decode(request.send().await?).await
    }

    async fn fetch_task_result(
        &self,
        session_id: &str,
        task_id: &str,
        report_tx_hash: &str,
    ) -> Result<TaskResultResponse> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/tasks/{}/result", task_id)))
            .header(SESSION_HEADER, session_id)
            .query(&[("reportTxHash", report_tx_hash)])
            .send()
            .await?;
        Self::decode(response).await
    }
}

/// Task ids end up in URL paths
fn check_task_id(task_id: &str) -> Result<()> {
    let valid = !task_id.is_empty()
        && task_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RpcError::InvalidRequest(format!("invalid task id: {:?}", task_id)))
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[async_trait]
impl NetworkClient for HttpNetworkClient {
    async fn init(&self, signer: Arc<dyn Signer>, chain_id: ChainId) -> Result<()> {
        if !is_supported_chain(chain_id) {
            return Err(RpcError::UnsupportedChain(chain_id));
        }

        let address = signer.address();
        let message = session_message(address, chain_id, unix_millis());
        let signature = signer.sign_message(message.as_bytes()).await?;

        let request = SessionRequest {
            address,
            chain_id,
            message,
            signature: format!("0x{}", hex::encode(signature)),
        };
        let response: SessionResponse = self.post("/api/v1/session", None, &request).await?;

        info!(
            address = %address,
            chain_id = %chain_id,
            gateway = %self.base_url,
            "Network session established"
        );

        *self.session.write() = Some(Session {
            signer,
            chain_id,
            session_id: response.session_id,
        });
        Ok(())
    }

    async fn submit_task(&self, params: SubmitTaskParams) -> Result<SubmitTaskResult> {
        let (session_id, signer, chain_id) = self.session()?;
        if params.address != signer.address() {
            return Err(RpcError::InvalidRequest(format!(
                "task address {} does not match session account {}",
                params.address,
                signer.address()
            )));
        }

        debug!(template_id = %params.template_id, "Submitting task");
        let request = SubmitTaskRequest {
            template_id: params.template_id,
            address: params.address,
            chain_id,
        };
        self.post("/api/v1/tasks", Some(&session_id), &request).await
    }

    async fn attest(&self, params: AttestParams) -> Result<Vec<AttestResult>> {
        let (session_id, _, _) = self.session()?;
        check_task_id(&params.task.task_id)?;

        debug!(
            task_id = %params.task.task_id,
            attestors = params.task.task_attestors.len(),
            "Requesting attestation"
        );
        let path = format!("/api/v1/tasks/{}/attest", params.task.task_id);
        let response: AttestResponse = self.post(&path, Some(&session_id), &params).await?;

        if params.wants_all_json_response() {
            if let Some(json) = response.all_json_response {
                self.json_responses
                    .write()
                    .insert(params.task.task_id.clone(), json);
            }
        }

        Ok(response.results)
    }

    async fn verify_and_poll_task_result(
        &self,
        params: VerifyAndPollParams,
    ) -> Result<Vec<TaskResult>> {
        let (session_id, _, _) = self.session()?;
        check_task_id(&params.task_id)?;

        poll_until_settled(&params, || {
            self.fetch_task_result(&session_id, &params.task_id, &params.report_tx_hash)
        })
        .await
    }

    async fn withdraw_balance(&self, token: TokenSymbol, page_size: u32) -> Result<Vec<String>> {
        let (session_id, signer, _) = self.session()?;
        if page_size == 0 {
            return Err(RpcError::InvalidRequest("page size must be positive".to_string()));
        }

        let request = WithdrawRequest {
            token_symbol: token,
            page_size,
            address: signer.address(),
        };
        let response: WithdrawResponse = self
            .post("/api/v1/rewards/withdraw", Some(&session_id), &request)
            .await?;
        Ok(response.settled_task_ids)
    }

    fn get_all_json_response(&self, task_id: &str) -> Option<String> {
        self.json_responses.read().get(task_id).cloned()
    }
}
