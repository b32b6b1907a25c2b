//! Shared types for the send core
//!
//! Plain data that crosses module boundaries. Types that carry live handles
//! (requests with pre-built handlers, results with completion handles) live
//! in `send`.

use crate::amount::DEFAULT_DECIMALS;
use serde::{Deserialize, Serialize};

// =============================================================================
// Network
// =============================================================================

/// Which side of a chain's deployments the session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn is_testnet(&self) -> bool {
        matches!(self, Network::Testnet)
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("Unknown network: {}", other)),
        }
    }
}

// =============================================================================
// Coins and fees
// =============================================================================

/// Coin representation (integer amount in minimal denom)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(amount: impl ToString, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Standard fee: coins paid plus the gas limit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSpec {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl FeeSpec {
    pub fn new(amount: Vec<Coin>, gas: impl Into<String>) -> Self {
        Self {
            amount,
            gas: gas.into(),
        }
    }

    /// Denomination of the first fee coin, if any
    pub fn denomination(&self) -> Option<&str> {
        self.amount.first().map(|c| c.denom.as_str())
    }

    /// Quantity of the first fee coin, if any
    pub fn quantity(&self) -> Option<&str> {
        self.amount.first().map(|c| c.amount.as_str())
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Token metadata used to move between display and on-chain amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
    /// Minimal denom (or contract address for contract tokens)
    pub coin_minimal_denom: String,
    /// Display symbol
    pub coin_denom: String,
    #[serde(default)]
    pub coin_decimals: Option<u8>,
    /// IBC trace denom when the token is held as a voucher
    #[serde(default)]
    pub ibc_denom: Option<String>,
    /// Denom on the token's origin chain
    #[serde(default)]
    pub origin_denom: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_evm: bool,
}

impl TokenDescriptor {
    pub fn new(minimal_denom: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            coin_minimal_denom: minimal_denom.into(),
            coin_denom: symbol.into(),
            coin_decimals: Some(decimals),
            ibc_denom: None,
            origin_denom: None,
            name: None,
            icon: None,
            is_evm: false,
        }
    }

    pub fn with_ibc_denom(mut self, ibc_denom: impl Into<String>) -> Self {
        self.ibc_denom = Some(ibc_denom.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn decimals(&self) -> u8 {
        self.coin_decimals.unwrap_or(DEFAULT_DECIMALS)
    }

    /// Denom used in chain messages: the IBC trace denom when present
    pub fn message_denom(&self) -> &str {
        self.ibc_denom
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.coin_minimal_denom)
    }
}

// =============================================================================
// Transaction records
// =============================================================================

/// Kind of transfer, as recorded in activity history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "send")]
    Send,
    #[serde(rename = "ibc/transfer")]
    IbcTransfer,
    #[serde(rename = "cw20TokenTransfer")]
    Cw20TokenTransfer,
    #[serde(rename = "secretTokenTransfer")]
    SecretTokenTransfer,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Send => "send",
            TxType::IbcTransfer => "ibc/transfer",
            TxType::Cw20TokenTransfer => "cw20TokenTransfer",
            TxType::SecretTokenTransfer => "secretTokenTransfer",
        }
    }
}

/// On-chain metadata attached to a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxMetadata {
    pub to_address: String,
    pub token: Coin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_chain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
}

impl TxMetadata {
    /// Metadata for a same-chain bank send
    pub fn send(to_address: &str, token: Coin) -> Self {
        Self {
            to_address: to_address.to_string(),
            token,
            source_channel: None,
            to_chain: None,
            contract: None,
        }
    }

    /// Metadata for an IBC transfer over `channel`
    pub fn ibc(channel: &str, to_address: &str, token: Coin, to_chain: Option<String>) -> Self {
        Self {
            to_address: to_address.to_string(),
            token,
            source_channel: Some(channel.to_string()),
            to_chain,
            contract: None,
        }
    }

    /// Metadata for a contract-token transfer
    pub fn contract(contract: &str, to_address: &str, token: Coin) -> Self {
        Self {
            to_address: to_address.to_string(),
            token,
            source_channel: None,
            to_chain: None,
            contract: Some(contract.to_string()),
        }
    }
}

/// Broadcast data handed to the activity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub tx_hash: String,
    pub tx_type: TxType,
    pub metadata: TxMetadata,
    pub fee_denomination: Option<String>,
    pub fee_quantity: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parse() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_fee_spec_first_coin() {
        let fee = FeeSpec::new(vec![Coin::new(5000, "uatom")], "200000");
        assert_eq!(fee.denomination(), Some("uatom"));
        assert_eq!(fee.quantity(), Some("5000"));
        assert_eq!(FeeSpec::default().denomination(), None);
    }

    #[test]
    fn test_token_message_denom() {
        let token = TokenDescriptor::new("uatom", "ATOM", 6);
        assert_eq!(token.message_denom(), "uatom");

        let voucher = token.clone().with_ibc_denom("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2");
        assert!(voucher.message_denom().starts_with("ibc/"));

        let mut no_decimals = TokenDescriptor::new("ufoo", "FOO", 6);
        no_decimals.coin_decimals = None;
        assert_eq!(no_decimals.decimals(), 6);
    }

    #[test]
    fn test_tx_type_serialization() {
        assert_eq!(serde_json::to_string(&TxType::IbcTransfer).unwrap(), "\"ibc/transfer\"");
        assert_eq!(TxType::Cw20TokenTransfer.as_str(), "cw20TokenTransfer");
    }

    #[test]
    fn test_metadata_skips_empty_fields() {
        let meta = TxMetadata::send("cosmos1xyz", Coin::new(1, "uatom"));
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("toAddress"));
        assert!(!json.contains("sourceChannel"));
    }
}
