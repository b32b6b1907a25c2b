//! Chain Registry Store
//!
//! Loads chain records once per session and exposes the three read-only
//! lookups the send core needs: chains by key, chain keys by bech32 prefix,
//! and token descriptors by minimal denom.

use super::chain::{ChainApis, ChainFamily, ChainMetadata, REGISTRY_EXTENSION_CHAINS};
use crate::error::{HawalaError, HawalaResult};
use crate::types::TokenDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Raw registry entry as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub key: String,
    pub chain_name: String,
    pub chain_id: String,
    #[serde(default)]
    pub testnet_chain_id: Option<String>,
    pub address_prefix: String,
    pub coin_type: u32,
    pub chain_registry_path: String,
    #[serde(default)]
    pub native_denoms: Vec<TokenDescriptor>,
    #[serde(default)]
    pub fee_denom: Option<String>,
    #[serde(default)]
    pub apis: ChainApis,
    #[serde(default)]
    pub evm_chain_id: Option<u64>,
    #[serde(default)]
    pub evm_chain_id_testnet: Option<u64>,
    #[serde(default = "default_true")]
    pub api_available: bool,
    #[serde(default)]
    pub chain_symbol_image_url: Option<String>,
    #[serde(default)]
    pub custom_client: Option<String>,
    #[serde(default)]
    pub registry_extension: bool,
    #[serde(default)]
    pub dual_address: bool,
    #[serde(default)]
    pub cw20_tokens: Vec<TokenDescriptor>,
}

fn default_true() -> bool {
    true
}

impl ChainEntry {
    fn into_metadata(self) -> (ChainMetadata, Vec<TokenDescriptor>) {
        let family = ChainFamily::resolve(
            &self.key,
            &self.chain_id,
            self.coin_type,
            self.custom_client.as_deref(),
        );
        let registry_extension =
            self.registry_extension || REGISTRY_EXTENSION_CHAINS.contains(&self.key.as_str());
        let fee_denom = self
            .fee_denom
            .or_else(|| self.native_denoms.first().map(|d| d.coin_minimal_denom.clone()))
            .unwrap_or_default();

        let metadata = ChainMetadata {
            key: self.key,
            chain_name: self.chain_name,
            chain_id: self.chain_id,
            testnet_chain_id: self.testnet_chain_id,
            address_prefix: self.address_prefix,
            coin_type: self.coin_type,
            registry_path: self.chain_registry_path,
            native_denoms: self.native_denoms,
            fee_denom,
            apis: self.apis,
            evm_chain_id: self.evm_chain_id,
            evm_chain_id_testnet: self.evm_chain_id_testnet,
            api_available: self.api_available,
            chain_symbol_image_url: self.chain_symbol_image_url,
            family,
            registry_extension,
            dual_address: self.dual_address,
        };
        (metadata, self.cw20_tokens)
    }
}

/// On-disk registry file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    pub chains: Vec<ChainEntry>,
    /// Extra token descriptors not native to any listed chain
    #[serde(default)]
    pub denoms: Vec<TokenDescriptor>,
}

/// Read-only chain registry
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, ChainMetadata>,
    prefixes: HashMap<String, String>,
    denoms: HashMap<String, TokenDescriptor>,
    /// chain key -> contract address -> descriptor
    contract_tokens: HashMap<String, HashMap<String, TokenDescriptor>>,
}

impl ChainRegistry {
    /// Build a registry, rejecting duplicate chain keys and address prefixes
    pub fn from_file(file: RegistryFile) -> HawalaResult<Self> {
        let mut registry = Self::default();

        for entry in file.chains {
            if registry.chains.contains_key(&entry.key) {
                return Err(HawalaError::config(format!("Duplicate chain key: {}", entry.key)));
            }
            if let Some(owner) = registry.prefixes.get(&entry.address_prefix) {
                return Err(HawalaError::config(format!(
                    "Address prefix '{}' is claimed by both {} and {}",
                    entry.address_prefix, owner, entry.key
                )));
            }
            registry.insert(entry);
        }

        for denom in file.denoms {
            registry
                .denoms
                .entry(denom.coin_minimal_denom.clone())
                .or_insert(denom);
        }

        Ok(registry)
    }

    pub fn from_json(json: &str) -> HawalaResult<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> HawalaResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HawalaError::config(format!(
                "Cannot read registry file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    fn insert(&mut self, entry: ChainEntry) {
        let (metadata, cw20_tokens) = entry.into_metadata();

        for denom in &metadata.native_denoms {
            self.denoms
                .entry(denom.coin_minimal_denom.clone())
                .or_insert_with(|| denom.clone());
        }

        if !cw20_tokens.is_empty() {
            let table = self.contract_tokens.entry(metadata.key.clone()).or_default();
            for token in cw20_tokens {
                self.denoms
                    .entry(token.coin_minimal_denom.clone())
                    .or_insert_with(|| token.clone());
                table.insert(token.coin_minimal_denom.clone(), token);
            }
        }

        self.prefixes
            .insert(metadata.address_prefix.clone(), metadata.key.clone());
        self.chains.insert(metadata.key.clone(), metadata);
    }

    pub fn chain(&self, key: &str) -> Option<&ChainMetadata> {
        self.chains.get(key)
    }

    /// Chain key registered for a bech32 prefix
    pub fn chain_key_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    pub fn chain_for_prefix(&self, prefix: &str) -> Option<&ChainMetadata> {
        self.chain_key_for_prefix(prefix).and_then(|k| self.chain(k))
    }

    pub fn prefixes(&self) -> &HashMap<String, String> {
        &self.prefixes
    }

    pub fn denom(&self, minimal_denom: &str) -> Option<&TokenDescriptor> {
        self.denoms.get(minimal_denom)
    }

    /// Whether `denom` is a known contract (CW20) token on `chain_key`
    pub fn is_contract_token(&self, chain_key: &str, denom: &str) -> bool {
        self.contract_tokens
            .get(chain_key)
            .is_some_and(|t| t.contains_key(denom))
    }

    /// Descriptor for a token that can be sent from `chain_key`: the denom
    /// table first, then the chain's own native denoms.
    pub fn supports_token(&self, chain_key: &str, minimal_denom: &str) -> Option<TokenDescriptor> {
        self.denoms
            .get(minimal_denom)
            .or_else(|| {
                self.chain(chain_key)
                    .and_then(|c| c.find_native_denom(minimal_denom))
            })
            .cloned()
    }

    /// All chains, sorted by key
    pub fn chains(&self) -> Vec<&ChainMetadata> {
        let mut chains: Vec<_> = self.chains.values().collect();
        chains.sort_by(|a, b| a.key.cmp(&b.key));
        chains
    }

    /// Chains that accept 0x recipients
    pub fn evm_capable_chains(&self) -> Vec<&ChainMetadata> {
        self.chains()
            .into_iter()
            .filter(|c| c.supports_evm_address())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
