//! Reward token symbols

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Token in which attestation rewards are paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TokenSymbol {
    #[default]
    #[serde(rename = "ETH")]
    Eth,
}

impl TokenSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Eth => "ETH",
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(TokenSymbol::Eth),
            _ => Err(TypesError::UnknownTokenSymbol(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_symbol_parse() {
        assert_eq!("eth".parse::<TokenSymbol>().unwrap(), TokenSymbol::Eth);
        assert!("USDC".parse::<TokenSymbol>().is_err());
        assert_eq!(serde_json::to_string(&TokenSymbol::Eth).unwrap(), "\"ETH\"");
    }
}
