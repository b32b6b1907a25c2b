//! Address Classifier
//!
//! Maps an address string to the chain that owns it. Bech32 addresses are
//! resolved through the registry's prefix table; 0x addresses skip prefix
//! mapping and are tagged as EVM.

use super::evm::{is_evm_address, to_checksum_address};
use super::AddressError;
use crate::registry::{ChainMetadata, ChainRegistry};
use serde::Serialize;

/// Result of classifying an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddressKind {
    /// Bech32 address whose prefix maps to a registered chain
    Bech32 { prefix: String, chain_key: String },
    /// Externally-owned 0x account, in EIP-55 form
    Evm { checksummed: String },
}

impl AddressKind {
    pub fn chain_key(&self) -> Option<&str> {
        match self {
            AddressKind::Bech32 { chain_key, .. } => Some(chain_key),
            AddressKind::Evm { .. } => None,
        }
    }

    pub fn is_evm(&self) -> bool {
        matches!(self, AddressKind::Evm { .. })
    }
}

/// Human-readable prefix of a bech32 address
pub fn decode_prefix(address: &str) -> Result<String, AddressError> {
    let (hrp, _data, _variant) =
        bech32::decode(address.trim()).map_err(|e| AddressError::Decode(e.to_string()))?;
    Ok(hrp)
}

/// Classify `address` against the registry.
///
/// Deterministic: the same input always gives the same chain key or the
/// same error.
pub fn classify(registry: &ChainRegistry, address: &str) -> Result<AddressKind, AddressError> {
    let trimmed = address.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        if !is_evm_address(trimmed) {
            return Err(AddressError::InvalidEvmAddress(trimmed.to_string()));
        }
        return Ok(AddressKind::Evm {
            checksummed: to_checksum_address(trimmed)?,
        });
    }

    let prefix = decode_prefix(trimmed)?;
    match registry.chain_key_for_prefix(&prefix) {
        Some(chain_key) => Ok(AddressKind::Bech32 {
            chain_key: chain_key.to_string(),
            prefix,
        }),
        None => Err(AddressError::UnsupportedChain(prefix)),
    }
}

/// Whether `address` is a recipient any registered chain accepts
pub fn is_valid_address(registry: &ChainRegistry, address: &str) -> bool {
    classify(registry, address).is_ok()
}

/// Every chain that accepts `address` as a recipient. A bech32 address
/// maps to its prefix owner; a 0x address to every EVM-capable chain.
pub fn chains_accepting<'r>(registry: &'r ChainRegistry, address: &str) -> Vec<&'r ChainMetadata> {
    match classify(registry, address) {
        Ok(AddressKind::Bech32 { chain_key, .. }) => registry.chain(&chain_key).into_iter().collect(),
        Ok(AddressKind::Evm { .. }) => registry.evm_capable_chains(),
        Err(_) => Vec::new(),
    }
}

/// Shorten an address for display: `cosmo...9dd02`
pub fn slice_address(address: &str) -> String {
    const VISIBLE: usize = 5;
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= VISIBLE * 2 {
        return address.to_string();
    }
    let head: String = chars[..VISIBLE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin;
    use bech32::{ToBase32, Variant};

    fn address(prefix: &str, fill: u8) -> String {
        bech32::encode(prefix, [fill; 20].to_base32(), Variant::Bech32).unwrap()
    }

    #[test]
    fn test_classify_bech32() {
        let registry = builtin();
        let addr = address("osmo", 7);
        assert_eq!(
            classify(registry, &addr).unwrap(),
            AddressKind::Bech32 {
                prefix: "osmo".to_string(),
                chain_key: "osmosis".to_string()
            }
        );
    }

    #[test]
    fn test_classify_unknown_prefix() {
        let addr = address("unknownchain", 1);
        assert_eq!(
            classify(builtin(), &addr),
            Err(AddressError::UnsupportedChain("unknownchain".to_string()))
        );
    }

    #[test]
    fn test_classify_invalid_bech32() {
        assert!(matches!(
            classify(builtin(), "cosmos1notvalid"),
            Err(AddressError::Decode(_))
        ));
        assert!(!is_valid_address(builtin(), ""));
    }

    #[test]
    fn test_classify_evm() {
        let kind = classify(builtin(), "0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        assert!(kind.is_evm());
        assert_eq!(kind.chain_key(), None);
        assert!(classify(builtin(), "0x1234").is_err());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let addr = address("cosmos", 3);
        assert_eq!(classify(builtin(), &addr), classify(builtin(), &addr));
        assert_eq!(classify(builtin(), "garbage"), classify(builtin(), "garbage"));
    }

    #[test]
    fn test_chains_accepting() {
        let registry = builtin();
        let cosmos = chains_accepting(registry, &address("cosmos", 1));
        assert_eq!(cosmos.len(), 1);
        assert_eq!(cosmos[0].key, "cosmos");

        let evm = chains_accepting(registry, "0xd8da6bf26964af9d7eed9e03e53415d37aa96045");
        let keys: Vec<_> = evm.iter().map(|c| c.key.as_str()).collect();
        assert!(keys.contains(&"evmos"));
        assert!(keys.contains(&"sei"));
        assert!(!keys.contains(&"cosmos"));
    }

    #[test]
    fn test_slice_address() {
        assert_eq!(
            slice_address("cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu"),
            "cosmo...zv7xu"
        );
        assert_eq!(slice_address("short"), "short");
    }
}
