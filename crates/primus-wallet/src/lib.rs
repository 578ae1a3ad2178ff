//! # Primus Wallet
//!
//! Signing backends and wallet providers for the Primus attestation client.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    WalletProvider Trait                         │
//! │  • request_accounts()  • chain_id()                             │
//! │  • switch_chain()      • add_chain()      • signer()            │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                                  │
//!                ▼                                  ▼
//!   ┌────────────────────────┐        ┌────────────────────────────┐
//!   │      LocalWallet       │        │       JsonRpcWallet        │
//!   │  • LocalSigner (k256)  │        │  • EIP-1193 over JSON-RPC  │
//!   │  • simulated chains    │        │  • RemoteSigner            │
//!   └────────────────────────┘        └────────────────────────────┘
//! ```
//!
//! `ensure_network` puts a provider on the target chain before the network
//! client is initialized, adding the chain when the wallet does not know it.

pub mod error;
pub mod json_rpc;
pub mod local;
pub mod network;
pub mod provider;
pub mod signer;

pub use error::{WalletError, WalletResult, ERROR_UNRECOGNIZED_CHAIN, ERROR_USER_REJECTED};
pub use json_rpc::{JsonRpcWallet, RemoteSigner};
pub use local::{LocalWallet, WalletRequest};
pub use network::{ensure_network, NetworkSwitch};
pub use provider::WalletProvider;
pub use signer::{eip191_hash, keccak256, recover_address, LocalSigner, Signer};
