//! In-process wallet backed by a [`LocalSigner`].
//!
//! Behaves like a browser wallet with a single account: it starts on one
//! chain, only switches to chains it knows about (4902 otherwise), and adding
//! a chain also selects it.

use async_trait::async_trait;
use parking_lot::RwLock;
use primus_types::{Address, ChainConfig, ChainId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{WalletError, WalletResult};
use crate::provider::WalletProvider;
use crate::signer::{LocalSigner, Signer};

/// Requests the wallet has received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletRequest {
    RequestAccounts,
    SwitchChain(ChainId),
    AddChain(ChainId),
}

pub struct LocalWallet {
    signer: Arc<LocalSigner>,
    current_chain: RwLock<ChainId>,
    known_chains: RwLock<HashSet<ChainId>>,
    requests: RwLock<Vec<WalletRequest>>,
    reject_accounts: bool,
    reject_switches: bool,
}

impl LocalWallet {
    pub fn new(signer: Arc<LocalSigner>, chain_id: ChainId) -> Self {
        let mut known = HashSet::new();
        known.insert(chain_id);
        Self {
            signer,
            current_chain: RwLock::new(chain_id),
            known_chains: RwLock::new(known),
            requests: RwLock::new(Vec::new()),
            reject_accounts: false,
            reject_switches: false,
        }
    }

    /// Mark an additional chain as already configured in the wallet
    pub fn with_known_chain(self, chain_id: ChainId) -> Self {
        self.known_chains.write().insert(chain_id);
        self
    }

    /// Refuse account access, as a user dismissing the prompt would
    pub fn rejecting_accounts(mut self) -> Self {
        self.reject_accounts = true;
        self
    }

    /// Refuse every chain switch
    pub fn rejecting_switches(mut self) -> Self {
        self.reject_switches = true;
        self
    }

    pub fn local_signer(&self) -> Arc<LocalSigner> {
        self.signer.clone()
    }

    pub fn requests(&self) -> Vec<WalletRequest> {
        self.requests
            .read()
            .iter()
            .filter(|r| !matches!(r, WalletRequest::RequestAccounts))
            .cloned()
            .collect()
    }

    pub fn all_requests(&self) -> Vec<WalletRequest> {
        self.requests.read().clone()
    }

    fn record(&self, request: WalletRequest) {
        self.requests.write().push(request);
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        self.record(WalletRequest::RequestAccounts);
        if self.reject_accounts {
            return Err(WalletError::UserRejected);
        }
        Ok(vec![self.signer.address()])
    }

    async fn chain_id(&self) -> WalletResult<ChainId> {
        Ok(*self.current_chain.read())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()> {
        self.record(WalletRequest::SwitchChain(chain_id));
        if self.reject_switches {
            return Err(WalletError::UserRejected);
        }
        if !self.known_chains.read().contains(&chain_id) {
            debug!(chain_id = %chain_id, "Switch requested to unknown chain");
            return Err(WalletError::UnrecognizedChain(chain_id));
        }
        *self.current_chain.write() = chain_id;
        info!(chain_id = %chain_id, "Local wallet switched chain");
        Ok(())
    }

    async fn add_chain(&self, config: &ChainConfig) -> WalletResult<()> {
        self.record(WalletRequest::AddChain(config.chain_id));
        self.known_chains.write().insert(config.chain_id);
        *self.current_chain.write() = config.chain_id;
        info!(
            chain_id = %config.chain_id,
            chain_name = %config.chain_name,
            "Local wallet added chain"
        );
        Ok(())
    }

    fn signer(&self, address: Address) -> WalletResult<Arc<dyn Signer>> {
        if address != self.signer.address() {
            return Err(WalletError::UnknownAccount(address));
        }
        Ok(self.signer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_accounts_returns_signer_address() {
        let signer = Arc::new(LocalSigner::generate());
        let wallet = LocalWallet::new(signer.clone(), ChainId::BASE_SEPOLIA);

        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![signer.address()]);
        assert_eq!(wallet.all_requests(), vec![WalletRequest::RequestAccounts]);
    }

    #[tokio::test]
    async fn test_rejected_account_access() {
        let wallet = LocalWallet::new(Arc::new(LocalSigner::generate()), ChainId::BASE)
            .rejecting_accounts();
        assert!(matches!(
            wallet.request_accounts().await,
            Err(WalletError::UserRejected)
        ));
    }

    #[tokio::test]
    async fn test_signer_for_unknown_account() {
        let wallet = LocalWallet::new(Arc::new(LocalSigner::generate()), ChainId::BASE);
        assert!(matches!(
            wallet.signer(Address::ZERO),
            Err(WalletError::UnknownAccount(_))
        ));
    }
}
