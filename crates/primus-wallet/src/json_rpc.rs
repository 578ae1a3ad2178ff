//! Wallet reached over JSON-RPC 2.0 (an external signing backend).
//!
//! The backend is expected to speak the EIP-1193 request methods that a
//! browser wallet exposes: `eth_requestAccounts`, `eth_chainId`,
//! `wallet_switchEthereumChain`, `wallet_addEthereumChain` and `personal_sign`.

use async_trait::async_trait;
use primus_types::{Address, ChainConfig, ChainId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::{WalletError, WalletResult};
use crate::provider::WalletProvider;
use crate::signer::Signer;

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

// ============================================
// Transport
// ============================================

struct RpcTransport {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcTransport {
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
        chain_hint: Option<ChainId>,
    ) -> WalletResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method = method, id = id, "Wallet RPC request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(WalletError::from_rpc(error.code, error.message, chain_hint));
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|e| WalletError::Transport(format!("{} returned malformed result: {}", method, e)))
    }
}

/// Wallet provider backed by a JSON-RPC endpoint
pub struct JsonRpcWallet {
    transport: Arc<RpcTransport>,
}

impl JsonRpcWallet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            transport: Arc::new(RpcTransport {
                http: reqwest::Client::new(),
                url: url.into(),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.transport.url
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.transport
            .call("eth_requestAccounts", json!([]), None)
            .await
    }

    async fn chain_id(&self) -> WalletResult<ChainId> {
        self.transport.call("eth_chainId", json!([]), None).await
    }

    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()> {
        let _: Value = self
            .transport
            .call(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id.to_hex() }]),
                Some(chain_id),
            )
            .await?;
        Ok(())
    }

    async fn add_chain(&self, config: &ChainConfig) -> WalletResult<()> {
        let _: Value = self
            .transport
            .call(
                "wallet_addEthereumChain",
                json!([config]),
                Some(config.chain_id),
            )
            .await?;
        Ok(())
    }

    fn signer(&self, address: Address) -> WalletResult<Arc<dyn Signer>> {
        Ok(Arc::new(RemoteSigner {
            transport: self.transport.clone(),
            address,
        }))
    }
}

/// Signer that delegates to the backend's `personal_sign`
pub struct RemoteSigner {
    transport: Arc<RpcTransport>,
    address: Address,
}

#[async_trait]
impl Signer for RemoteSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        let encoded = format!("0x{}", hex::encode(message));
        let signature: String = self
            .transport
            .call("personal_sign", json!([encoded, self.address]), None)
            .await?;

        let digits = signature.strip_prefix("0x").unwrap_or(&signature);
        hex::decode(digits).map_err(|e| WalletError::InvalidSignature(e.to_string()))
    }
}
