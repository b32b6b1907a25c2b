//! REST-backed channel validation
//!
//! Queries the source chain's `ibc.core.channel.v1` REST endpoints.

use super::resolver::ChannelValidator;
use super::types::{ChannelState, ChannelValidation, TRANSFER_PORT};
use crate::error::{HawalaError, HawalaResult};
use crate::registry::ChainMetadata;
use crate::types::Network;
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    channel: ChannelBody,
}

#[derive(Debug, Deserialize)]
struct ChannelBody {
    state: ChannelState,
}

#[derive(Debug, Deserialize)]
struct ClientStateResponse {
    identified_client_state: IdentifiedClientState,
}

#[derive(Debug, Deserialize)]
struct IdentifiedClientState {
    client_state: ClientState,
}

#[derive(Debug, Deserialize)]
struct ClientState {
    chain_id: String,
}

/// Validates channels against the source chain's REST API
pub struct RestChannelValidator {
    client: reqwest::Client,
    network: Network,
}

impl RestChannelValidator {
    pub fn new(network: Network) -> HawalaResult<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, network })
    }

    fn channel_url(rest: &str, channel_id: &str) -> String {
        format!(
            "{}/ibc/core/channel/v1/channels/{}/ports/{}",
            rest.trim_end_matches('/'),
            channel_id,
            TRANSFER_PORT
        )
    }

    async fn check(
        &self,
        channel_id: &str,
        src: &ChainMetadata,
        dst: &ChainMetadata,
    ) -> HawalaResult<ChannelValidation> {
        let rest = src.rest_for(self.network).ok_or_else(|| {
            HawalaError::network_error(format!("{} has no REST endpoint", src.chain_name))
        })?;
        let url = Self::channel_url(rest, channel_id);

        let channel: ChannelResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if channel.channel.state != ChannelState::Open {
            return Ok(ChannelValidation::failed(format!(
                "{} is {:?}",
                channel_id, channel.channel.state
            )));
        }

        let client_state: ClientStateResponse = self
            .client
            .get(format!("{}/client_state", url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let counterparty = client_state.identified_client_state.client_state.chain_id;
        debug!(channel = channel_id, %counterparty, "channel counterparty");

        match dst.chain_id_for(self.network) {
            Some(expected) if expected == counterparty => Ok(ChannelValidation::ok()),
            _ => Ok(ChannelValidation::failed(format!(
                "{} leads to {}, not {}",
                channel_id, counterparty, dst.chain_name
            ))),
        }
    }
}

impl ChannelValidator for RestChannelValidator {
    fn validate_channel<'a>(
        &'a self,
        channel_id: &'a str,
        src: &'a ChainMetadata,
        dst: &'a ChainMetadata,
    ) -> BoxFuture<'a, ChannelValidation> {
        Box::pin(async move {
            match self.check(channel_id, src, dst).await {
                Ok(validation) => validation,
                Err(e) => ChannelValidation::failed(format!(
                    "Unable to verify {}: {}",
                    channel_id, e.message
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_url() {
        assert_eq!(
            RestChannelValidator::channel_url("https://cosmos-api.polkachu.com/", "channel-141"),
            "https://cosmos-api.polkachu.com/ibc/core/channel/v1/channels/channel-141/ports/transfer"
        );
    }

    #[test]
    fn test_parse_channel_response() {
        let json = r#"{"channel":{"state":"STATE_OPEN","ordering":"ORDER_UNORDERED","counterparty":{"port_id":"transfer","channel_id":"channel-0"},"connection_hops":["connection-257"],"version":"ics20-1"},"proof":null}"#;
        let parsed: ChannelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.channel.state, ChannelState::Open);
    }

    #[test]
    fn test_parse_client_state() {
        let json = r#"{"identified_client_state":{"client_id":"07-tendermint-259","client_state":{"@type":"/ibc.lightclients.tendermint.v1.ClientState","chain_id":"osmosis-1"}}}"#;
        let parsed: ClientStateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.identified_client_state.client_state.chain_id, "osmosis-1");
    }

    #[tokio::test]
    async fn test_missing_rest_endpoint_fails_softly() {
        let validator = RestChannelValidator::new(Network::Testnet).unwrap();
        let registry = crate::registry::builtin();
        let juno = registry.chain("juno").unwrap();
        let osmosis = registry.chain("osmosis").unwrap();

        let validation = validator.validate_channel("channel-0", juno, osmosis).await;
        assert!(!validation.success);
        assert!(validation.message.unwrap().contains("no REST endpoint"));
    }
}
