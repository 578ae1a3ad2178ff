//! Primus RPC - client side of the attestation network
//!
//! This module provides the interface the client uses to drive a task
//! through the network:
//! - Session setup (wallet signature over a login message)
//! - Task submission and attestation
//! - Verification and polling of the settled result
//! - Reward withdrawal for settled tasks
//!
//! `HttpNetworkClient` talks to a network gateway over HTTP/JSON.
//! `MockNetwork` (feature `mock`) runs the same contract in memory.

pub mod client;
pub mod error;
pub mod http;
pub mod messages;
pub mod poll;

#[cfg(feature = "mock")]
pub mod mock;

pub use client::{is_supported_chain, session_message, NetworkClient, SUPPORTED_CHAIN_IDS};
pub use error::{Result, RpcError};
pub use http::{HttpNetworkClient, HttpNetworkClientConfig};
pub use messages::*;
pub use poll::poll_until_settled;

#[cfg(feature = "mock")]
pub use mock::{MockAttestor, MockCall, MockNetwork, MockNetworkBuilder};
