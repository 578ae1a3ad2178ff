//! `primus withdraw`

use anyhow::Result;
use colored::Colorize;
use primus_cli::context::{build_client, build_wallet};
use primus_cli::flow::{connect_and_initialize, withdraw_balance};
use primus_cli::output::ConsoleReporter;
use primus_cli::Config;

use crate::WithdrawArgs;

pub async fn handle(args: WithdrawArgs, mut config: Config) -> Result<()> {
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    let token = args.token.unwrap_or(config.rewards.token);
    let page_size = args.page_size.unwrap_or(config.rewards.page_size);
    if page_size == 0 {
        anyhow::bail!("--page-size must be greater than zero");
    }

    println!("{} Withdrawing rewards...", "→".cyan().bold());
    println!("  Token:      {}", token.to_string().cyan());
    println!("  Page size:  {}", page_size.to_string().cyan());
    println!();

    let wallet = build_wallet(&config).await?;
    let client = build_client(&config)?;
    let reporter = ConsoleReporter::new();

    connect_and_initialize(wallet.as_ref(), client.as_ref(), config.chain_id, &reporter).await?;
    let settled = withdraw_balance(client.as_ref(), token, page_size, &reporter).await;
    if settled.is_empty() {
        println!("{} Nothing withdrawn", "!".yellow().bold());
    }
    Ok(())
}
