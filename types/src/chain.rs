//! Chain identifiers and the network parameters a wallet needs to add a chain.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// EVM chain identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Base Sepolia testnet
    pub const BASE_SEPOLIA: ChainId = ChainId(84532);
    /// Base mainnet
    pub const BASE: ChainId = ChainId(8453);

    pub fn value(&self) -> u64 {
        self.0
    }

    /// `0x`-prefixed lowercase hex, as wallets expect in `wallet_switchEthereumChain`
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Parse decimal (`84532`) or hex (`0x14a34`)
    pub fn parse(s: &str) -> Result<Self, TypesError> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(ChainId)
            .map_err(|_| TypesError::InvalidChainId(s.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

impl FromStr for ChainId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        ChainId(value)
    }
}

// Wallet JSON-RPC answers with hex strings; configs use plain numbers.
impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(ChainId(n)),
            Raw::Text(s) => ChainId::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Native currency description (EIP-3085)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn eth() -> Self {
        Self {
            name: "ETH".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

/// Parameters for `wallet_addEthereumChain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// Serialized as hex for the wallet request
    #[serde(with = "hex_chain_id")]
    pub chain_id: ChainId,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

impl ChainConfig {
    /// Built-in configuration for the chains the network is deployed on
    pub fn known(chain_id: ChainId) -> Option<ChainConfig> {
        match chain_id {
            ChainId::BASE_SEPOLIA => Some(ChainConfig {
                chain_id,
                chain_name: "Base Sepolia".to_string(),
                rpc_urls: vec!["https://sepolia.base.org".to_string()],
                block_explorer_urls: vec!["https://sepolia.basescan.org".to_string()],
                native_currency: NativeCurrency::eth(),
            }),
            ChainId::BASE => Some(ChainConfig {
                chain_id,
                chain_name: "Base".to_string(),
                rpc_urls: vec!["https://mainnet.base.org".to_string()],
                block_explorer_urls: vec!["https://basescan.org".to_string()],
                native_currency: NativeCurrency::eth(),
            }),
            _ => None,
        }
    }

    /// All built-in configurations, testnet first
    pub fn all_known() -> Vec<ChainConfig> {
        [ChainId::BASE_SEPOLIA, ChainId::BASE]
            .into_iter()
            .filter_map(ChainConfig::known)
            .collect()
    }
}

mod hex_chain_id {
    use super::ChainId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ChainId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChainId, D::Error> {
        ChainId::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_hex() {
        assert_eq!(ChainId::BASE_SEPOLIA.to_hex(), "0x14a34");
        assert_eq!(ChainId::BASE.to_hex(), "0x2105");
    }

    #[test]
    fn test_chain_id_parse() {
        assert_eq!(ChainId::parse("84532").unwrap(), ChainId::BASE_SEPOLIA);
        assert_eq!(ChainId::parse("0x2105").unwrap(), ChainId::BASE);
        assert!(ChainId::parse("base").is_err());
    }

    #[test]
    fn test_chain_id_deserialize_number_or_hex() {
        let a: ChainId = serde_json::from_str("8453").unwrap();
        let b: ChainId = serde_json::from_str("\"0x2105\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_known_chain_configs() {
        let sepolia = ChainConfig::known(ChainId::BASE_SEPOLIA).unwrap();
        assert_eq!(sepolia.chain_name, "Base Sepolia");
        assert_eq!(sepolia.rpc_urls, vec!["https://sepolia.base.org"]);
        assert_eq!(sepolia.native_currency.decimals, 18);

        assert!(ChainConfig::known(ChainId(1)).is_none());
        assert_eq!(ChainConfig::all_known().len(), 2);
    }

    #[test]
    fn test_chain_config_wallet_shape() {
        let config = ChainConfig::known(ChainId::BASE).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["chainId"], "0x2105");
        assert_eq!(value["chainName"], "Base");
        assert_eq!(value["blockExplorerUrls"][0], "https://basescan.org");
        assert_eq!(value["nativeCurrency"]["symbol"], "ETH");
    }
}
