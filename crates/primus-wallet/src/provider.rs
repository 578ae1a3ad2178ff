//! Wallet provider abstraction (EIP-1193 request surface)

use async_trait::async_trait;
use primus_types::{Address, ChainConfig, ChainId};
use std::sync::Arc;

use crate::error::WalletResult;
use crate::signer::Signer;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`: asks the wallet for account access
    async fn request_accounts(&self) -> WalletResult<Vec<Address>>;

    /// `eth_chainId`: chain the wallet is currently on
    async fn chain_id(&self) -> WalletResult<ChainId>;

    /// `wallet_switchEthereumChain`
    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()>;

    /// `wallet_addEthereumChain`
    async fn add_chain(&self, config: &ChainConfig) -> WalletResult<()>;

    /// Signer for one of the accounts returned by `request_accounts`
    fn signer(&self, address: Address) -> WalletResult<Arc<dyn Signer>>;
}
