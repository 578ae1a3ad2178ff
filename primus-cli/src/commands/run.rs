//! `primus run`

use anyhow::Result;
use colored::Colorize;
use primus_cli::context::{build_client, build_wallet};
use primus_cli::flow::{run_flow, FlowOptions, WithdrawOptions};
use primus_cli::output::{banner, ConsoleReporter};
use primus_cli::Config;
use primus_types::ExtendedParams;
use tracing::info;

use crate::RunArgs;

pub async fn handle(args: RunArgs, mut config: Config) -> Result<()> {
    if let Some(template_id) = args.template_id {
        config.template_id = template_id;
    }
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.poll.interval_ms = interval_ms;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.poll.timeout_ms = timeout_ms;
    }
    config.validate()?;

    banner("Primus attestation");
    println!("  Template:   {}", config.template_id.cyan());
    println!("  Chain:      {}", config.chain_id.to_string().cyan());
    println!("  Network:    {:?}", config.network.mode);
    println!();

    let wallet = build_wallet(&config).await?;
    let client = build_client(&config)?;

    let mut options = FlowOptions::from_config(&config);
    options.extended_params = ExtendedParams {
        att_url_optimization: args.att_url_optimization,
    };
    options.full_response = args.full_response;
    if args.withdraw {
        options.withdraw = Some(WithdrawOptions {
            token: config.rewards.token,
            page_size: config.rewards.page_size,
        });
    }

    let reporter = ConsoleReporter::new();
    match run_flow(wallet.as_ref(), client.as_ref(), &options, &reporter).await {
        Ok(outcome) => {
            println!();
            println!("{} Attestation flow complete", "✓".green().bold());
            info!(
                task_id = %outcome.submit.task_id,
                results = outcome.results.len(),
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            println!();
            println!("{} Attestation flow failed: {}", "✗".red().bold(), e.to_string().red());
            Err(e.into())
        }
    }
}
