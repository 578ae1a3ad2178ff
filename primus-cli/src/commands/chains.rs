//! `primus chains`

use anyhow::Result;
use colored::Colorize;
use primus_cli::Config;
use primus_rpc::SUPPORTED_CHAIN_IDS;
use primus_types::ChainConfig;

pub fn handle(config: &Config) -> Result<()> {
    println!("{} Supported chains:", "→".cyan().bold());
    for chain_id in SUPPORTED_CHAIN_IDS {
        let marker = if chain_id == config.chain_id { "*".green().bold() } else { " ".normal() };
        match ChainConfig::known(chain_id) {
            Some(chain) => {
                println!(
                    "{} {:<8} {:<10} {}",
                    marker,
                    chain_id.to_string().cyan(),
                    chain.chain_id.to_hex(),
                    chain.chain_name
                );
                println!("             RPC:      {}", chain.rpc_urls.join(", ").dimmed());
                println!("             Explorer: {}", chain.block_explorer_urls.join(", ").dimmed());
            }
            None => println!("{} {}", marker, chain_id.to_string().cyan()),
        }
    }
    Ok(())
}
