//! `primus key`

use anyhow::{Context, Result};
use colored::Colorize;
use primus_cli::config::expand_home;
use primus_cli::Config;
use primus_wallet::{LocalSigner, Signer};

use crate::KeyAction;

pub async fn handle(action: KeyAction, config: &Config) -> Result<()> {
    match action {
        KeyAction::Generate { out, force } => {
            let path = out
                .map(|p| expand_home(&p))
                .unwrap_or_else(|| config.wallet.key_file.clone());
            if path.exists() && !force {
                println!(
                    "{} Key file {} already exists (use --force to overwrite)",
                    "✗".red().bold(),
                    path.display().to_string().red()
                );
                return Ok(());
            }

            println!("{} Generating secp256k1 key...", "→".cyan().bold());
            let signer = LocalSigner::generate();
            signer
                .save_to_file(&path)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("{} Key generated", "✓".green().bold());
            println!("  Address:    {}", signer.address().to_string().cyan());
            println!("  Public key: {}", signer.public_key_hex());
            println!("  Saved to:   {}", path.display());
            Ok(())
        }

        KeyAction::Show => {
            let path = &config.wallet.key_file;
            println!("{} Reading key: {}", "→".cyan().bold(), path.display().to_string().cyan());
            match LocalSigner::from_file(path).await {
                Ok(signer) => {
                    println!("  Address:    {}", signer.address().to_string().cyan());
                    println!("  Public key: {}", signer.public_key_hex());
                }
                Err(e) => {
                    println!("{} Failed to load key: {}", "✗".red().bold(), e.to_string().red());
                    println!(
                        "{} Run `primus key generate` to create one",
                        "→".dimmed()
                    );
                }
            }
            Ok(())
        }
    }
}
