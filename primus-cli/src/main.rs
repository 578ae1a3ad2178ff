//! Primus CLI
//!
//! Runs the attestation flow against the Primus network and manages the
//! local wallet key and configuration.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use primus_cli::Config;
use primus_types::{ChainId, TokenSymbol};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "primus")]
#[command(about = "Primus attestation network CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config_dir>/primus/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect, submit a task, attest and wait for the result
    Run(RunArgs),

    /// Withdraw rewards for settled tasks
    Withdraw(WithdrawArgs),

    /// List supported chains
    Chains,

    /// Local wallet key management
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Template ID from the developer hub
    #[arg(long)]
    template_id: Option<String>,

    /// Chain ID, decimal or 0x-prefixed hex
    #[arg(long)]
    chain_id: Option<ChainId>,

    /// Withdraw rewards once the task settles
    #[arg(long)]
    withdraw: bool,

    /// Request and print the full JSON response
    #[arg(long)]
    full_response: bool,

    /// Enable attestation URL optimization
    #[arg(long)]
    att_url_optimization: bool,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Poll timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Args)]
pub struct WithdrawArgs {
    /// Token to withdraw
    #[arg(long)]
    token: Option<TokenSymbol>,

    /// Maximum number of settled tasks per withdrawal
    #[arg(long)]
    page_size: Option<u32>,

    /// Chain ID, decimal or 0x-prefixed hex
    #[arg(long)]
    chain_id: Option<ChainId>,
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Generate a new secp256k1 key
    Generate {
        /// Output file (defaults to wallet.key_file)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Show the address of the configured key
    Show,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Run(args) => commands::run::handle(args, config).await,
        Commands::Withdraw(args) => commands::withdraw::handle(args, config).await,
        Commands::Chains => commands::chains::handle(&config),
        Commands::Key { action } => commands::key::handle(action, &config).await,
        Commands::Config { action } => commands::config::handle(action, &config, &config_path),
    }
}
