//! Terminal output for the attestation flow

use chrono::{DateTime, SecondsFormat};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use primus_rpc::RpcError;
use primus_types::{AttestResult, SubmitTaskResult, TaskResult};
use primus_wallet::NetworkSwitch;
use serde_json::Value;
use std::time::Duration;

use crate::config::PollConfig;
use crate::flow::{FlowReporter, Session};

/// Number of settled task ids printed before eliding the rest
const SETTLED_PREVIEW: usize = 5;

/// Unix seconds as ISO-8601 UTC with milliseconds (`2024-01-01T00:00:00.000Z`)
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| format!("{}s", secs))
}

/// First `limit` ids joined with `, `, followed by `...` when some were cut
pub fn preview_ids(ids: &[String], limit: usize) -> String {
    let shown = ids
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if ids.len() > limit {
        format!("{}...", shown)
    } else {
        shown
    }
}

pub fn banner(title: &str) {
    println!("{}", "=".repeat(50));
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Reporter printing each step, with a spinner while polling
pub struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowReporter for ConsoleReporter {
    fn connected(&self, session: &Session) {
        println!("{} Wallet connected: {}", "✓".green().bold(), session.address.to_string().cyan());
        match session.network_switch {
            NetworkSwitch::AlreadySelected => {}
            NetworkSwitch::Switched { from } => println!(
                "{} Switched chain {} → {}",
                "→".cyan().bold(),
                from,
                session.chain_id.to_string().cyan()
            ),
            NetworkSwitch::Added { from } => println!(
                "{} Added chain {} to wallet (was on {})",
                "→".cyan().bold(),
                session.chain_id.to_string().cyan(),
                from
            ),
        }
        let supported = session
            .supported_chain_ids
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{} Network client initialized", "✓".green().bold());
        println!("  Supported chains: {}", supported);
    }

    fn submitting(&self) {
        println!();
        println!("{} Submitting task...", "→".cyan().bold());
    }

    fn submitted(&self, task: &SubmitTaskResult) {
        println!("{} Task submitted", "✓".green().bold());
        println!("  Task ID:    {}", task.task_id.cyan());
        println!("  Tx hash:    {}", task.task_tx_hash);
        println!("  Attestors:  {}", task.task_attestors.join(", "));
        println!("  Submitted:  {}", format_timestamp(task.submitted_at));
    }

    fn attesting(&self) {
        println!();
        println!("{} Running attestation...", "→".cyan().bold());
    }

    fn attested(&self, results: &[AttestResult]) {
        println!("{} Attestation complete ({} result(s))", "✓".green().bold(), results.len());
        for (index, item) in results.iter().enumerate() {
            println!();
            println!("  --- Attestor {} ---", index + 1);
            println!("  Attestor:   {}", item.attestor.cyan());
            println!("  URL:        {}", item.attestor_url);
            println!("  Report tx:  {}", item.report_tx_hash);
            println!("  Time:       {}", format_timestamp(item.attestation_time));
        }
    }

    fn polling(&self, task_id: &str, poll: &PollConfig) {
        println!();
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message(format!(
            "Polling task {} (every {} ms, timeout {} ms)",
            task_id, poll.interval_ms, poll.timeout_ms
        ));
        spinner.enable_steady_tick(Duration::from_millis(120));
        *self.spinner.lock() = Some(spinner);
    }

    fn settled(&self, results: &[TaskResult]) {
        self.stop_spinner();
        println!("{} Task complete ({} result(s))", "✓".green().bold(), results.len());
        for (index, item) in results.iter().enumerate() {
            println!();
            println!("  --- Result {} ---", index + 1);
            println!("  Task ID:    {}", item.task_id.cyan());
            println!("  Attestor:   {}", item.attestor);
            println!("  Data:       {}", item.attestation.data);
        }
    }

    fn poll_failed(&self) {
        self.stop_spinner();
    }

    fn full_response(&self, _task_id: &str, response: Option<&Value>) {
        println!();
        match response {
            Some(value) => {
                let pretty =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                println!("{} Full response:", "✓".green().bold());
                println!("{}", pretty);
            }
            None => println!(
                "{} No full response data (attest with --full-response to capture it)",
                "!".yellow().bold()
            ),
        }
    }

    fn withdrawn(&self, task_ids: &[String]) {
        println!();
        println!("{} Rewards withdrawn", "✓".green().bold());
        println!("  Settled tasks: {}", task_ids.len());
        println!("  Task IDs:      {}", preview_ids(task_ids, SETTLED_PREVIEW));
    }

    fn withdraw_skipped(&self, error: &RpcError) {
        println!();
        println!("{} Withdrawal failed or no rewards available", "!".yellow().bold());
        println!("  Error: {}", error.to_string().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_preview_ids() {
        let ids: Vec<String> = (1..=7).map(|i| format!("t{}", i)).collect();
        assert_eq!(preview_ids(&ids, 5), "t1, t2, t3, t4, t5...");
        assert_eq!(preview_ids(&ids[..2], 5), "t1, t2");
        assert_eq!(preview_ids(&[], 5), "");
    }
}
