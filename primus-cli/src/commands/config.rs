//! `primus config`

use anyhow::Result;
use colored::Colorize;
use primus_cli::Config;
use std::path::Path;

use crate::ConfigAction;

pub fn handle(action: ConfigAction, config: &Config, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{} Effective configuration", "→".cyan().bold());
            println!("  Source: {}", path.display().to_string().dimmed());
            println!();
            print!("{}", config.to_toml()?);
            if let Err(e) = config.validate() {
                println!();
                println!("{} {}", "!".yellow().bold(), e.to_string().yellow());
            }
            Ok(())
        }

        ConfigAction::Init { force } => {
            if path.exists() && !force {
                println!(
                    "{} {} already exists (use --force to overwrite)",
                    "✗".red().bold(),
                    path.display().to_string().red()
                );
                return Ok(());
            }
            Config::default().save(path)?;
            println!("{} Wrote {}", "✓".green().bold(), path.display().to_string().cyan());
            println!(
                "{} Set template_id before running `primus run`",
                "→".dimmed()
            );
            Ok(())
        }
    }
}
