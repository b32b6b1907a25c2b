//! Chain Metadata
//!
//! Immutable per-chain records. The chain family is resolved once, when the
//! record is built, so nothing downstream re-derives it from chain id
//! substrings or coin types.

use crate::types::{Network, TokenDescriptor};
use serde::{Deserialize, Serialize};

/// BIP-44 coin type of Ethereum-style signing
pub const EVM_COIN_TYPE: u32 = 60;

/// Chains that ship their own transaction client
pub const CUSTOM_CLIENT_CHAINS: &[(&str, &str)] = &[("injective", "injective")];

/// Chains whose fees are fixed by the protocol and which send through a native client
pub const FIXED_FEE_CHAINS: &[(&str, FixedFeeVariant)] = &[
    ("thorchain", FixedFeeVariant::Thorchain),
    ("mayachain", FixedFeeVariant::Mayachain),
];

/// Chain ids served by the specialised testnet handler
pub const PRIVACY_TOKEN_CHAIN_IDS: &[&str] = &["atlantic-2", "arctic-1"];

/// Chains whose standard client needs extra message types registered
pub const REGISTRY_EXTENSION_CHAINS: &[&str] = &["stride"];

/// Fixed-fee chain clients. The two differ only in which chain they target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedFeeVariant {
    Thorchain,
    Mayachain,
}

impl FixedFeeVariant {
    pub fn chain_key(&self) -> &'static str {
        match self {
            FixedFeeVariant::Thorchain => "thorchain",
            FixedFeeVariant::Mayachain => "mayachain",
        }
    }
}

/// How transactions are built and signed for a chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChainFamily {
    Standard,
    EvmCompatible,
    Custom(String),
    FixedFee(FixedFeeVariant),
    PrivacyToken,
}

impl ChainFamily {
    /// Resolve the family from raw registry data.
    ///
    /// Priority: explicit custom client, fixed-fee set, EVM coin type,
    /// privacy-token testnet chain id, standard.
    pub fn resolve(key: &str, chain_id: &str, coin_type: u32, custom_client: Option<&str>) -> Self {
        if let Some(handler) = custom_client {
            return ChainFamily::Custom(handler.to_string());
        }
        if let Some((_, handler)) = CUSTOM_CLIENT_CHAINS.iter().find(|(k, _)| *k == key) {
            return ChainFamily::Custom(handler.to_string());
        }
        if let Some((_, variant)) = FIXED_FEE_CHAINS.iter().find(|(k, _)| *k == key) {
            return ChainFamily::FixedFee(*variant);
        }
        if coin_type == EVM_COIN_TYPE {
            return ChainFamily::EvmCompatible;
        }
        let chain_id = chain_id.to_lowercase();
        if PRIVACY_TOKEN_CHAIN_IDS.iter().any(|id| chain_id.contains(id)) {
            return ChainFamily::PrivacyToken;
        }
        ChainFamily::Standard
    }

    pub fn is_fixed_fee(&self) -> bool {
        matches!(self, ChainFamily::FixedFee(_))
    }

    pub fn label(&self) -> String {
        match self {
            ChainFamily::Standard => "standard".to_string(),
            ChainFamily::EvmCompatible => "evm-compatible".to_string(),
            ChainFamily::Custom(id) => format!("custom:{}", id),
            ChainFamily::FixedFee(v) => format!("fixed-fee:{}", v.chain_key()),
            ChainFamily::PrivacyToken => "privacy-token".to_string(),
        }
    }
}

/// RPC / REST endpoints per network
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainApis {
    #[serde(default)]
    pub rpc: Option<String>,
    #[serde(default)]
    pub rest: Option<String>,
    #[serde(default)]
    pub rpc_test: Option<String>,
    #[serde(default)]
    pub rest_test: Option<String>,
}

/// Read-only metadata for one chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    pub key: String,
    pub chain_name: String,
    pub chain_id: String,
    pub testnet_chain_id: Option<String>,
    pub address_prefix: String,
    pub coin_type: u32,
    pub registry_path: String,
    pub native_denoms: Vec<TokenDescriptor>,
    pub fee_denom: String,
    pub apis: ChainApis,
    pub evm_chain_id: Option<u64>,
    pub evm_chain_id_testnet: Option<u64>,
    pub api_available: bool,
    pub chain_symbol_image_url: Option<String>,
    pub family: ChainFamily,
    pub registry_extension: bool,
    pub dual_address: bool,
}

impl ChainMetadata {
    pub fn chain_id_for(&self, network: Network) -> Option<&str> {
        match network {
            Network::Mainnet => Some(self.chain_id.as_str()),
            Network::Testnet => self.testnet_chain_id.as_deref(),
        }
    }

    pub fn evm_chain_id_for(&self, network: Network) -> Option<u64> {
        match network {
            Network::Mainnet => self.evm_chain_id,
            Network::Testnet => self.evm_chain_id_testnet,
        }
    }

    pub fn rest_for(&self, network: Network) -> Option<&str> {
        let url = match network {
            Network::Mainnet => self.apis.rest.as_deref(),
            Network::Testnet => self.apis.rest_test.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    pub fn rpc_for(&self, network: Network) -> Option<&str> {
        let url = match network {
            Network::Mainnet => self.apis.rpc.as_deref(),
            Network::Testnet => self.apis.rpc_test.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    /// Whether 0x recipients are acceptable on this chain
    pub fn supports_evm_address(&self) -> bool {
        self.dual_address || matches!(self.family, ChainFamily::EvmCompatible)
    }

    /// Native token used when nothing more specific is known
    pub fn native_denom(&self) -> Option<&TokenDescriptor> {
        self.native_denoms
            .iter()
            .find(|d| d.coin_minimal_denom == self.fee_denom)
            .or_else(|| self.native_denoms.first())
    }

    pub fn find_native_denom(&self, minimal_denom: &str) -> Option<&TokenDescriptor> {
        self.native_denoms
            .iter()
            .find(|d| d.coin_minimal_denom == minimal_denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_resolution_priority() {
        assert_eq!(
            ChainFamily::resolve("injective", "injective-1", 60, None),
            ChainFamily::Custom("injective".to_string())
        );
        assert_eq!(
            ChainFamily::resolve("thorchain", "thorchain-mainnet-v1", 931, None),
            ChainFamily::FixedFee(FixedFeeVariant::Thorchain)
        );
        assert_eq!(
            ChainFamily::resolve("evmos", "evmos_9001-2", 60, None),
            ChainFamily::EvmCompatible
        );
        assert_eq!(
            ChainFamily::resolve("seiTestnet2", "Atlantic-2", 118, None),
            ChainFamily::PrivacyToken
        );
        assert_eq!(
            ChainFamily::resolve("cosmos", "cosmoshub-4", 118, None),
            ChainFamily::Standard
        );
        assert_eq!(
            ChainFamily::resolve("cosmos", "cosmoshub-4", 118, Some("special")),
            ChainFamily::Custom("special".to_string())
        );
    }

    #[test]
    fn test_family_labels() {
        assert_eq!(ChainFamily::FixedFee(FixedFeeVariant::Mayachain).label(), "fixed-fee:mayachain");
        assert_eq!(ChainFamily::Custom("injective".into()).label(), "custom:injective");
    }
}
