//! Primus CLI library: configuration, the attestation flow and its
//! terminal reporting. The `primus` binary is a thin layer over these.

pub mod config;
pub mod context;
pub mod flow;
pub mod output;

pub use config::Config;
pub use flow::{
    run_flow, FlowError, FlowOptions, FlowOutcome, FlowReporter, Session, SilentReporter,
    WithdrawOptions,
};
