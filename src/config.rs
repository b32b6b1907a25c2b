//! Session configuration
//!
//! Loaded from an optional JSON file, then overridden from the environment:
//! - `HAWALA_NETWORK`: `mainnet` or `testnet`
//! - `HAWALA_ACTIVE_CHAIN`: chain key of the active chain
//! - `HAWALA_REGISTRY`: path to a chain registry JSON file

use crate::error::{HawalaError, HawalaResult};
use crate::registry::{self, ChainRegistry};
use crate::tx::PollOptions;
use crate::types::Network;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_NETWORK: &str = "HAWALA_NETWORK";
pub const ENV_ACTIVE_CHAIN: &str = "HAWALA_ACTIVE_CHAIN";
pub const ENV_REGISTRY: &str = "HAWALA_REGISTRY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendConfig {
    pub network: Network,
    pub active_chain: String,
    /// Offset added to the current time for IBC transfer timeouts
    pub ibc_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub poll_timeout_ms: u64,
    /// Chain registry replacing the built-in table
    pub registry_file: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            active_chain: "cosmos".to_string(),
            ibc_timeout_secs: 120,
            poll_interval_ms: 2_000,
            poll_timeout_ms: 60_000,
            registry_file: None,
            log_filter: "hawala_send=info".to_string(),
        }
    }
}

impl SendConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> HawalaResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            HawalaError::config(format!(
                "Cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: SendConfig = serde_json::from_str(&content)
            .map_err(|e| HawalaError::config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> HawalaResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> HawalaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup(ENV_NETWORK) {
            self.network = network.parse().map_err(HawalaError::config)?;
        }
        if let Some(chain) = lookup(ENV_ACTIVE_CHAIN) {
            self.active_chain = chain.trim().to_string();
        }
        if let Some(path) = lookup(ENV_REGISTRY) {
            self.registry_file = Some(PathBuf::from(path));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> HawalaResult<()> {
        if self.active_chain.is_empty() {
            return Err(HawalaError::config("active_chain must not be empty"));
        }
        if self.ibc_timeout_secs == 0 {
            return Err(HawalaError::config("ibc_timeout_secs must be positive"));
        }
        if self.poll_interval_ms == 0 || self.poll_timeout_ms < self.poll_interval_ms {
            return Err(HawalaError::config(
                "poll_timeout_ms must be at least poll_interval_ms, and both positive",
            ));
        }
        Ok(())
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_millis(self.poll_timeout_ms),
        }
    }

    /// Registry named by the config, or the built-in table
    pub fn load_registry(&self) -> HawalaResult<ChainRegistry> {
        match &self.registry_file {
            Some(path) => ChainRegistry::load(path),
            None => Ok(registry::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SendConfig::default();
        assert_eq!(config.ibc_timeout_secs, 120);
        assert_eq!(config.poll_options(), PollOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SendConfig = serde_json::from_str(r#"{"network":"testnet"}"#).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.active_chain, "cosmos");
    }

    #[test]
    fn test_env_overrides() {
        let config = SendConfig::default()
            .apply_overrides(env(&[
                (ENV_NETWORK, "testnet"),
                (ENV_ACTIVE_CHAIN, "osmosis"),
                (ENV_REGISTRY, "/tmp/chains.json"),
            ]))
            .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.active_chain, "osmosis");
        assert_eq!(config.registry_file, Some(PathBuf::from("/tmp/chains.json")));
    }

    #[test]
    fn test_invalid_network_rejected() {
        let err = SendConfig::default()
            .apply_overrides(env(&[(ENV_NETWORK, "devnet")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_invalid_poll_window() {
        let config = SendConfig {
            poll_interval_ms: 5_000,
            poll_timeout_ms: 1_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builtin_registry_by_default() {
        let registry = SendConfig::default().load_registry().unwrap();
        assert!(registry.chain("cosmos").is_some());
    }
}
