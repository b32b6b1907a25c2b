//! Channel Resolver
//!
//! Two steps on the inter-chain path: look up the transfer channel for a
//! chain pair, then confirm it is active. A failing lookup service means
//! "no channel known" and never aborts the send by itself.

use super::channels::ChannelRegistry;
use super::types::ChannelValidation;
use crate::error::HawalaResult;
use crate::registry::ChainMetadata;
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use tracing::{debug, warn};

/// Channel lookup service keyed by chain registry paths
pub trait ChannelLookup: Send + Sync {
    fn resolve_channel<'a>(
        &'a self,
        src_registry_path: &'a str,
        dst_registry_path: &'a str,
    ) -> BoxFuture<'a, HawalaResult<Option<String>>>;
}

/// Confirms a channel is currently active between a specific chain pair
pub trait ChannelValidator: Send + Sync {
    fn validate_channel<'a>(
        &'a self,
        channel_id: &'a str,
        src: &'a ChainMetadata,
        dst: &'a ChainMetadata,
    ) -> BoxFuture<'a, ChannelValidation>;
}

/// Message used when no channel is known or the validator gave no reason
pub fn no_active_channel_message(src_name: &str, dst_name: &str) -> String {
    format!("No active IBC channels from {} to {}", src_name, dst_name)
}

pub struct ChannelResolver {
    lookup: Arc<dyn ChannelLookup>,
    validator: Arc<dyn ChannelValidator>,
}

impl ChannelResolver {
    pub fn new(lookup: Arc<dyn ChannelLookup>, validator: Arc<dyn ChannelValidator>) -> Self {
        Self { lookup, validator }
    }

    /// Resolver backed by the built-in channel table
    pub fn known_channels() -> Self {
        Self::new(Arc::new(StaticChannelLookup), Arc::new(StaticChannelValidator))
    }

    /// Channel id from `src` to `dst`, or `None` when unknown or the lookup failed
    pub async fn resolve(&self, src: &ChainMetadata, dst: &ChainMetadata) -> Option<String> {
        match self
            .lookup
            .resolve_channel(&src.registry_path, &dst.registry_path)
            .await
        {
            Ok(channel) => {
                debug!(src = %src.registry_path, dst = %dst.registry_path, ?channel, "channel lookup");
                channel
            }
            Err(e) => {
                warn!(
                    src = %src.registry_path,
                    dst = %dst.registry_path,
                    error = %e,
                    "channel lookup failed, treating as unknown"
                );
                None
            }
        }
    }

    /// Validate `channel_id` for the pair. A failure message always names
    /// both chains.
    pub async fn validate(
        &self,
        channel_id: &str,
        src: &ChainMetadata,
        dst: &ChainMetadata,
    ) -> ChannelValidation {
        let validation = self.validator.validate_channel(channel_id, src, dst).await;
        if validation.success {
            return validation;
        }

        let message = match validation.message {
            Some(m) if m.contains(&src.chain_name) && m.contains(&dst.chain_name) => m,
            Some(m) if !m.trim().is_empty() => {
                format!("{} ({} to {})", m, src.chain_name, dst.chain_name)
            }
            _ => no_active_channel_message(&src.chain_name, &dst.chain_name),
        };
        debug!(channel = channel_id, %message, "channel rejected");
        ChannelValidation::failed(message)
    }
}

/// Lookup backed by the built-in channel table
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticChannelLookup;

impl ChannelLookup for StaticChannelLookup {
    fn resolve_channel<'a>(
        &'a self,
        src_registry_path: &'a str,
        dst_registry_path: &'a str,
    ) -> BoxFuture<'a, HawalaResult<Option<String>>> {
        let channel = ChannelRegistry::get_channel(src_registry_path, dst_registry_path)
            .map(|c| c.channel_id);
        Box::pin(future::ready(Ok(channel)))
    }
}

/// Accepts only channels the built-in table lists as open for the pair
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticChannelValidator;

impl ChannelValidator for StaticChannelValidator {
    fn validate_channel<'a>(
        &'a self,
        channel_id: &'a str,
        src: &'a ChainMetadata,
        dst: &'a ChainMetadata,
    ) -> BoxFuture<'a, ChannelValidation> {
        let validation = match ChannelRegistry::get_channel(&src.registry_path, &dst.registry_path) {
            Some(known) if known.channel_id == channel_id && known.is_open() => ChannelValidation::ok(),
            Some(known) if known.channel_id != channel_id => ChannelValidation::failed(format!(
                "{} is not the transfer channel, expected {}",
                channel_id, known.channel_id
            )),
            Some(_) => ChannelValidation::failed(format!("{} is not open", channel_id)),
            None => ChannelValidation {
                success: false,
                message: None,
            },
        };
        Box::pin(future::ready(validation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HawalaError;
    use crate::registry::builtin;

    struct FailingLookup;

    impl ChannelLookup for FailingLookup {
        fn resolve_channel<'a>(
            &'a self,
            _src: &'a str,
            _dst: &'a str,
        ) -> BoxFuture<'a, HawalaResult<Option<String>>> {
            Box::pin(future::ready(Err(HawalaError::network_error("connection refused"))))
        }
    }

    struct RejectingValidator(Option<&'static str>);

    impl ChannelValidator for RejectingValidator {
        fn validate_channel<'a>(
            &'a self,
            _channel_id: &'a str,
            _src: &'a ChainMetadata,
            _dst: &'a ChainMetadata,
        ) -> BoxFuture<'a, ChannelValidation> {
            let validation = ChannelValidation {
                success: false,
                message: self.0.map(str::to_string),
            };
            Box::pin(future::ready(validation))
        }
    }

    #[tokio::test]
    async fn test_resolve_known_channel() {
        let registry = builtin();
        let resolver = ChannelResolver::known_channels();
        let cosmos = registry.chain("cosmos").unwrap();
        let osmosis = registry.chain("osmosis").unwrap();

        assert_eq!(
            resolver.resolve(cosmos, osmosis).await.as_deref(),
            Some("channel-141")
        );
        assert!(resolver.validate("channel-141", cosmos, osmosis).await.success);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_unknown() {
        let registry = builtin();
        let resolver = ChannelResolver::new(Arc::new(FailingLookup), Arc::new(StaticChannelValidator));
        let cosmos = registry.chain("cosmos").unwrap();
        let osmosis = registry.chain("osmosis").unwrap();
        assert_eq!(resolver.resolve(cosmos, osmosis).await, None);
    }

    #[tokio::test]
    async fn test_wrong_channel_names_both_chains() {
        let registry = builtin();
        let resolver = ChannelResolver::known_channels();
        let cosmos = registry.chain("cosmos").unwrap();
        let osmosis = registry.chain("osmosis").unwrap();

        let validation = resolver.validate("channel-9", cosmos, osmosis).await;
        assert!(!validation.success);
        let message = validation.message.unwrap();
        assert!(message.contains("Cosmos Hub"));
        assert!(message.contains("Osmosis"));
    }

    #[tokio::test]
    async fn test_validator_without_message_gets_default() {
        let registry = builtin();
        let resolver = ChannelResolver::new(
            Arc::new(StaticChannelLookup),
            Arc::new(RejectingValidator(None)),
        );
        let cosmos = registry.chain("cosmos").unwrap();
        let juno = registry.chain("juno").unwrap();

        let validation = resolver.validate("channel-207", cosmos, juno).await;
        assert_eq!(
            validation.message.as_deref(),
            Some("No active IBC channels from Cosmos Hub to Juno")
        );
    }

    #[tokio::test]
    async fn test_validator_message_kept_when_complete() {
        let registry = builtin();
        let resolver = ChannelResolver::new(
            Arc::new(StaticChannelLookup),
            Arc::new(RejectingValidator(Some("Cosmos Hub to Juno is paused"))),
        );
        let cosmos = registry.chain("cosmos").unwrap();
        let juno = registry.chain("juno").unwrap();

        let validation = resolver.validate("channel-207", cosmos, juno).await;
        assert_eq!(validation.message.as_deref(), Some("Cosmos Hub to Juno is paused"));
    }
}
