//! Builds the wallet provider and network client selected by the config

use anyhow::{Context, Result};
use primus_rpc::{HttpNetworkClient, HttpNetworkClientConfig, MockNetwork, NetworkClient};
use primus_wallet::{
    JsonRpcWallet, LocalSigner, LocalWallet, Signer, WalletError, WalletProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Config, NetworkMode, WalletMode};

pub async fn build_wallet(config: &Config) -> Result<Arc<dyn WalletProvider>> {
    match config.wallet.mode {
        WalletMode::Local => {
            let key_file = &config.wallet.key_file;
            if !key_file.exists() {
                return Err(WalletError::NoProvider).with_context(|| {
                    format!(
                        "Key file {} not found; run `primus key generate` or set wallet.key_file",
                        key_file.display()
                    )
                });
            }
            let signer = LocalSigner::from_file(key_file)
                .await
                .with_context(|| format!("Failed to load key from {}", key_file.display()))?;
            let start_chain = config.wallet.initial_chain_id.unwrap_or(config.chain_id);
            debug!(address = %signer.address(), chain_id = %start_chain, "Local wallet ready");
            Ok(Arc::new(LocalWallet::new(Arc::new(signer), start_chain)))
        }
        WalletMode::Rpc => {
            if config.wallet.rpc_url.trim().is_empty() {
                return Err(WalletError::NoProvider).context("wallet.rpc_url is not set");
            }
            info!(url = %config.wallet.rpc_url, "Using JSON-RPC wallet");
            Ok(Arc::new(JsonRpcWallet::new(config.wallet.rpc_url.clone())))
        }
    }
}

pub fn build_client(config: &Config) -> Result<Arc<dyn NetworkClient>> {
    match config.network.mode {
        NetworkMode::Http => {
            let client = HttpNetworkClient::new(HttpNetworkClientConfig {
                base_url: config.network.endpoint.clone(),
                request_timeout: Duration::from_secs(config.network.request_timeout_secs),
            })?;
            info!(endpoint = %client.base_url(), "Using network gateway");
            Ok(Arc::new(client))
        }
        NetworkMode::Mock => {
            info!("Using in-memory mock network");
            Ok(Arc::new(MockNetwork::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_wallet_requires_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.wallet.key_file = dir.path().join("missing.key");

        let err = build_wallet(&config).await.err().unwrap();
        assert!(err.to_string().contains("primus key generate"));
        assert!(matches!(
            err.downcast_ref::<WalletError>(),
            Some(WalletError::NoProvider)
        ));
    }

    #[tokio::test]
    async fn test_rpc_wallet_requires_url() {
        let mut config = Config::default();
        config.wallet.mode = WalletMode::Rpc;
        config.wallet.rpc_url = " ".to_string();

        let err = build_wallet(&config).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<WalletError>(),
            Some(WalletError::NoProvider)
        ));
    }

    #[tokio::test]
    async fn test_local_wallet_from_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("primus.key");
        let signer = LocalSigner::generate();
        signer.save_to_file(&key_file).await.unwrap();

        let mut config = Config::default();
        config.wallet.key_file = key_file;

        let wallet = build_wallet(&config).await.unwrap();
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![signer.address()]);
        assert_eq!(wallet.chain_id().await.unwrap(), config.chain_id);
    }

    #[test]
    fn test_mock_client() {
        let mut config = Config::default();
        config.network.mode = NetworkMode::Mock;
        let client = build_client(&config).unwrap();
        assert_eq!(client.supported_chain_ids().len(), 2);
    }
}
