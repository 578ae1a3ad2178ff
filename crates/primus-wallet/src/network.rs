//! Network selection: make sure the wallet is on the chain the client targets.

use primus_types::{ChainConfig, ChainId};
use tracing::{debug, info};

use crate::error::{WalletError, WalletResult};
use crate::provider::WalletProvider;

/// What `ensure_network` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSwitch {
    /// Wallet was already on the target chain
    AlreadySelected,
    /// Wallet switched to a chain it knew
    Switched { from: ChainId },
    /// Wallet did not know the chain; it was added from the built-in config
    Added { from: ChainId },
}

/// Switch the wallet to `target` if it is on another chain.
///
/// A switch failure with code 4902 (unknown chain) is answered by adding the
/// chain from [`ChainConfig::known`]; every other failure is returned as is.
pub async fn ensure_network<P>(provider: &P, target: ChainId) -> WalletResult<NetworkSwitch>
where
    P: WalletProvider + ?Sized,
{
    let current = provider.chain_id().await?;
    if current == target {
        debug!(chain_id = %target, "Wallet already on target chain");
        return Ok(NetworkSwitch::AlreadySelected);
    }

    info!(from = %current, to = %target, "Switching wallet chain");

    match provider.switch_chain(target).await {
        Ok(()) => Ok(NetworkSwitch::Switched { from: current }),
        Err(e) if e.is_unrecognized_chain() => {
            let config =
                ChainConfig::known(target).ok_or(WalletError::UnsupportedChain(target))?;
            info!(
                chain_id = %target,
                chain_name = %config.chain_name,
                "Chain unknown to wallet, adding it"
            );
            provider.add_chain(&config).await?;
            Ok(NetworkSwitch::Added { from: current })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::{LocalWallet, WalletRequest};
    use crate::signer::LocalSigner;
    use std::sync::Arc;

    fn wallet_on(chain_id: ChainId) -> LocalWallet {
        LocalWallet::new(Arc::new(LocalSigner::generate()), chain_id)
    }

    #[tokio::test]
    async fn test_no_switch_when_chain_matches() {
        let wallet = wallet_on(ChainId::BASE_SEPOLIA);
        let outcome = ensure_network(&wallet, ChainId::BASE_SEPOLIA).await.unwrap();

        assert_eq!(outcome, NetworkSwitch::AlreadySelected);
        assert!(wallet.requests().is_empty());
    }

    #[tokio::test]
    async fn test_switch_to_known_chain() {
        let wallet = wallet_on(ChainId::BASE).with_known_chain(ChainId::BASE_SEPOLIA);
        let outcome = ensure_network(&wallet, ChainId::BASE_SEPOLIA).await.unwrap();

        assert_eq!(outcome, NetworkSwitch::Switched { from: ChainId::BASE });
        assert_eq!(
            wallet.requests(),
            vec![WalletRequest::SwitchChain(ChainId::BASE_SEPOLIA)]
        );
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId::BASE_SEPOLIA);
    }

    #[tokio::test]
    async fn test_unknown_chain_is_added() {
        let wallet = wallet_on(ChainId::BASE);
        let outcome = ensure_network(&wallet, ChainId::BASE_SEPOLIA).await.unwrap();

        assert_eq!(outcome, NetworkSwitch::Added { from: ChainId::BASE });
        assert_eq!(
            wallet.requests(),
            vec![
                WalletRequest::SwitchChain(ChainId::BASE_SEPOLIA),
                WalletRequest::AddChain(ChainId::BASE_SEPOLIA),
            ]
        );
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId::BASE_SEPOLIA);
    }

    #[tokio::test]
    async fn test_unknown_chain_without_config_fails() {
        let wallet = wallet_on(ChainId::BASE);
        let err = ensure_network(&wallet, ChainId(1)).await.unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedChain(ChainId(1))));
    }

    #[tokio::test]
    async fn test_rejected_switch_propagates() {
        let wallet = wallet_on(ChainId::BASE)
            .with_known_chain(ChainId::BASE_SEPOLIA)
            .rejecting_switches();
        let err = ensure_network(&wallet, ChainId::BASE_SEPOLIA)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::UserRejected));
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId::BASE);
    }
}
