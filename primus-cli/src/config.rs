//! Configuration for the Primus CLI
//!
//! Resolution order: built-in defaults, then the TOML file, then `PRIMUS_*`
//! environment variables, then command-line flags.

use anyhow::{bail, Context, Result};
use primus_rpc::is_supported_chain;
use primus_types::{
    ChainId, TokenSymbol, VerifyAndPollParams, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder shipped in generated configs; runs refuse to use it
pub const PLACEHOLDER_TEMPLATE_ID: &str = "YOUR_TEMPLATE_ID";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chain the client and wallet must be on
    pub chain_id: ChainId,

    /// Template created in the Primus developer hub
    pub template_id: String,

    pub poll: PollConfig,
    pub network: NetworkConfig,
    pub wallet: WalletConfig,
    pub rewards: RewardsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }
}

impl PollConfig {
    pub fn params(&self, task_id: &str, report_tx_hash: &str) -> VerifyAndPollParams {
        VerifyAndPollParams::new(task_id, report_tx_hash)
            .with_interval_ms(self.interval_ms)
            .with_timeout_ms(self.timeout_ms)
    }
}

/// How the client reaches the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    /// Gateway over HTTP
    Http,
    /// In-memory network (offline runs)
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub mode: NetworkMode,
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mode: NetworkMode::Http,
            endpoint: "http://127.0.0.1:8700".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Where signatures come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletMode {
    /// Key file on disk
    Local,
    /// External signer speaking EIP-1193 JSON-RPC
    Rpc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub mode: WalletMode,
    pub key_file: PathBuf,
    pub rpc_url: String,
    /// Chain a local wallet starts on; defaults to `chain_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_chain_id: Option<ChainId>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            mode: WalletMode::Local,
            key_file: default_key_path(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            initial_chain_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    pub token: TokenSymbol,
    pub page_size: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            token: TokenSymbol::Eth,
            page_size: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: ChainId::BASE_SEPOLIA,
            template_id: PLACEHOLDER_TEMPLATE_ID.to_string(),
            poll: PollConfig::default(),
            network: NetworkConfig::default(),
            wallet: WalletConfig::default(),
            rewards: RewardsConfig::default(),
        }
    }
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("primus")
}

fn default_key_path() -> PathBuf {
    config_root().join("key")
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl Config {
    /// `<config_dir>/primus/config.toml`
    pub fn default_path() -> PathBuf {
        config_root().join("config.toml")
    }

    /// Load from an explicit path (must exist) or the default path (optional)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.wallet.key_file = expand_home(&config.wallet.key_file);
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Apply `PRIMUS_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = get("PRIMUS_CHAIN_ID") {
            self.chain_id = chain_id.parse().context("Invalid PRIMUS_CHAIN_ID")?;
        }
        if let Some(template_id) = get("PRIMUS_TEMPLATE_ID") {
            self.template_id = template_id;
        }
        if let Some(endpoint) = get("PRIMUS_NETWORK_ENDPOINT") {
            self.network.endpoint = endpoint;
        }
        if let Some(mode) = get("PRIMUS_NETWORK_MODE") {
            self.network.mode = match mode.to_lowercase().as_str() {
                "http" => NetworkMode::Http,
                "mock" => NetworkMode::Mock,
                other => bail!("Invalid PRIMUS_NETWORK_MODE: {}", other),
            };
        }
        if let Some(key_file) = get("PRIMUS_WALLET_KEY_FILE") {
            self.wallet.key_file = expand_home(Path::new(&key_file));
        }
        if let Some(rpc_url) = get("PRIMUS_WALLET_RPC_URL") {
            self.wallet.rpc_url = rpc_url;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !is_supported_chain(self.chain_id) {
            bail!(
                "Chain {} is not supported (use {} or {})",
                self.chain_id,
                ChainId::BASE_SEPOLIA,
                ChainId::BASE
            );
        }
        if self.template_id.trim().is_empty() || self.template_id == PLACEHOLDER_TEMPLATE_ID {
            bail!("template_id is not set; create a template and set it in the config or PRIMUS_TEMPLATE_ID");
        }
        if self.poll.interval_ms == 0 {
            bail!("poll.interval_ms must be greater than zero");
        }
        if self.poll.timeout_ms < self.poll.interval_ms {
            bail!("poll.timeout_ms must not be shorter than poll.interval_ms");
        }
        if self.rewards.page_size == 0 {
            bail!("rewards.page_size must be greater than zero");
        }
        if self.network.mode == NetworkMode::Http && self.network.endpoint.trim().is_empty() {
            bail!("network.endpoint is required in http mode");
        }
        if self.wallet.mode == WalletMode::Rpc && self.wallet.rpc_url.trim().is_empty() {
            bail!("wallet.rpc_url is required in rpc mode");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> Config {
        Config {
            template_id: "tpl-123".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chain_id, ChainId::BASE_SEPOLIA);
        assert_eq!(config.poll.interval_ms, 2_000);
        assert_eq!(config.poll.timeout_ms, 120_000);
        assert_eq!(config.rewards.page_size, 100);
        // The placeholder template must be replaced before running
        assert!(config.validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            chain_id = 8453
            template_id = "tpl-abc"

            [poll]
            interval_ms = 500

            [network]
            mode = "mock"
            "#,
        )
        .unwrap();

        assert_eq!(config.chain_id, ChainId::BASE);
        assert_eq!(config.template_id, "tpl-abc");
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.poll.timeout_ms, 120_000);
        assert_eq!(config.network.mode, NetworkMode::Mock);
        assert_eq!(config.wallet.mode, WalletMode::Local);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = valid();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRIMUS_CHAIN_ID", "0x2105"),
            ("PRIMUS_TEMPLATE_ID", "tpl-env"),
            ("PRIMUS_NETWORK_MODE", "MOCK"),
            ("PRIMUS_WALLET_RPC_URL", "http://signer:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.chain_id, ChainId::BASE);
        assert_eq!(config.template_id, "tpl-env");
        assert_eq!(config.network.mode, NetworkMode::Mock);
        assert_eq!(config.wallet.rpc_url, "http://signer:9000");
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "PRIMUS_NETWORK_MODE").then(|| "carrier-pigeon".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rules() {
        let mut config = valid();
        config.chain_id = ChainId(1);
        assert!(config.validate().is_err());

        let mut config = valid();
        config.poll.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.poll.timeout_ms = 1_000;
        config.poll.interval_ms = 2_000;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.rewards.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = valid();
        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_poll_params_forwarded() {
        let poll = PollConfig {
            interval_ms: 750,
            timeout_ms: 9_000,
        };
        let params = poll.params("t1", "0xr");
        assert_eq!(params.interval_ms, 750);
        assert_eq!(params.timeout_ms, 9_000);
        assert_eq!(params.report_tx_hash, "0xr");
    }
}
