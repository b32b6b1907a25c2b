//! Token path selection and routing
//!
//! Pure functions over the registry. Nothing here touches the network, so
//! the CLI can dry-run a send with them.

use crate::address::{decode_prefix, evm_to_bech32, is_evm_address};
use crate::ibc::ChannelRegistry;
use crate::registry::{ChainFamily, ChainMetadata, ChainRegistry, FixedFeeVariant};
use serde::Serialize;

/// Bech32 prefix of privacy-token (SNIP20) contract addresses
pub const PRIVACY_TOKEN_PREFIX: &str = "secret";

/// How a token is moved. Mutually exclusive, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "path", content = "variant", rename_all = "snake_case")]
pub enum TokenPath {
    ContractToken,
    PrivacyToken,
    FixedFee(FixedFeeVariant),
    Standard,
}

fn is_privacy_token_denom(denom: &str) -> bool {
    decode_prefix(denom).is_ok_and(|prefix| prefix == PRIVACY_TOKEN_PREFIX)
}

/// Pick the path for sending `denom` from the active chain
pub fn select_path(registry: &ChainRegistry, active: &ChainMetadata, denom: &str) -> TokenPath {
    if registry.is_contract_token(&active.key, denom) {
        return TokenPath::ContractToken;
    }
    if is_privacy_token_denom(denom) {
        return TokenPath::PrivacyToken;
    }
    if let ChainFamily::FixedFee(variant) = active.family {
        return TokenPath::FixedFee(variant);
    }
    TokenPath::Standard
}

/// Source and destination of a standard-path send
#[derive(Debug, Clone)]
pub struct Route<'r> {
    pub src: &'r ChainMetadata,
    pub dst: &'r ChainMetadata,
    /// Recipient in bech32 form
    pub recipient: String,
    pub inter_chain: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Invalid recipient address")]
    InvalidRecipient,

    #[error("Destination chain not supported")]
    DestinationUnsupported,
}

/// Recipient as the standard path sees it: a 0x address on a chain that
/// accepts them becomes that chain's bech32 form.
pub fn normalize_recipient(active: &ChainMetadata, to: &str) -> String {
    let to = to.trim();
    if is_evm_address(to) && active.supports_evm_address() {
        if let Ok(converted) = evm_to_bech32(&active.address_prefix, to) {
            return converted;
        }
    }
    to.to_string()
}

/// Resolve both ends of a send by bech32 prefix. Inter-chain means the
/// prefixes differ.
pub fn resolve_route<'r>(
    registry: &'r ChainRegistry,
    active: &ChainMetadata,
    from: &str,
    to: &str,
) -> Result<Route<'r>, RouteError> {
    let recipient = normalize_recipient(active, to);

    let src_prefix = decode_prefix(from).map_err(|_| RouteError::InvalidRecipient)?;
    let dst_prefix = decode_prefix(&recipient).map_err(|_| RouteError::InvalidRecipient)?;

    let src = registry
        .chain_for_prefix(&src_prefix)
        .ok_or(RouteError::InvalidRecipient)?;
    let dst = registry
        .chain_for_prefix(&dst_prefix)
        .ok_or(RouteError::InvalidRecipient)?;

    if dst.registry_path.trim().is_empty() {
        return Err(RouteError::DestinationUnsupported);
    }

    Ok(Route {
        src,
        dst,
        recipient,
        inter_chain: src_prefix != dst_prefix,
    })
}

/// Dry-run description of a send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendPlan {
    pub path: TokenPath,
    pub source_chain: String,
    pub destination_chain: Option<String>,
    pub recipient: String,
    pub inter_chain: bool,
    /// Channel from the built-in table, for inter-chain routes
    pub known_channel: Option<String>,
}

/// Plan a send of `denom` from `from` to `to` on the active chain
pub fn plan_send(
    registry: &ChainRegistry,
    active: &ChainMetadata,
    from: &str,
    to: &str,
    denom: &str,
) -> Result<SendPlan, RouteError> {
    let path = select_path(registry, active, denom);

    if path != TokenPath::Standard {
        return Ok(SendPlan {
            path,
            source_chain: active.key.clone(),
            destination_chain: None,
            recipient: to.trim().to_string(),
            inter_chain: false,
            known_channel: None,
        });
    }

    let route = resolve_route(registry, active, from, to)?;
    let known_channel = if route.inter_chain {
        ChannelRegistry::get_channel(&route.src.registry_path, &route.dst.registry_path)
            .map(|c| c.channel_id)
    } else {
        None
    };

    Ok(SendPlan {
        path,
        source_chain: route.src.key.clone(),
        destination_chain: Some(route.dst.key.clone()),
        recipient: route.recipient,
        inter_chain: route.inter_chain,
        known_channel,
    })
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
    fn test_path_selection_order() {
        let registry = builtin();
        let juno = registry.chain("juno").unwrap();
        let thor = registry.chain("thorchain").unwrap();
        let neta = "juno168ctmpyppk90d34p3jjy658zf5a5l3w8wk35wht6ccqj4mr0yv8s4j5awr";

        assert_eq!(select_path(registry, juno, neta), TokenPath::ContractToken);
        assert_eq!(
            select_path(registry, juno, &address("secret", 9)),
            TokenPath::PrivacyToken
        );
        assert_eq!(
            select_path(registry, thor, "rune"),
            TokenPath::FixedFee(FixedFeeVariant::Thorchain)
        );
        assert_eq!(select_path(registry, juno, "ujuno"), TokenPath::Standard);
    }

    #[test]
    fn test_same_chain_route() {
        let registry = builtin();
        let cosmos = registry.chain("cosmos").unwrap();
        let route = resolve_route(registry, cosmos, &address("cosmos", 1), &address("cosmos", 2)).unwrap();
        assert!(!route.inter_chain);
        assert_eq!(route.dst.key, route.src.key);
    }

    #[test]
    fn test_inter_chain_route() {
        let registry = builtin();
        let cosmos = registry.chain("cosmos").unwrap();
        let route = resolve_route(registry, cosmos, &address("cosmos", 1), &address("osmo", 2)).unwrap();
        assert!(route.inter_chain);
        assert_eq!(route.dst.key, "osmosis");
    }

    #[test]
    fn test_unmapped_prefix_is_invalid_recipient() {
        let registry = builtin();
        let cosmos = registry.chain("cosmos").unwrap();
        assert_eq!(
            resolve_route(registry, cosmos, &address("cosmos", 1), &address("nope", 2)).unwrap_err(),
            RouteError::InvalidRecipient
        );
        assert_eq!(
            resolve_route(registry, cosmos, "garbage", &address("cosmos", 2)).unwrap_err(),
            RouteError::InvalidRecipient
        );
    }

    #[test]
    fn test_evm_recipient_on_dual_address_chain() {
        let registry = builtin();
        let sei = registry.chain("sei").unwrap();
        let route = resolve_route(
            registry,
            sei,
            &address("sei", 1),
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
        )
        .unwrap();
        assert!(route.recipient.starts_with("sei1"));
        assert!(!route.inter_chain);
    }

    #[test]
    fn test_plan_fixed_fee_has_no_channel() {
        let registry = builtin();
        let thor = registry.chain("thorchain").unwrap();
        let plan = plan_send(registry, thor, &address("thor", 1), &address("osmo", 2), "rune").unwrap();
        assert_eq!(plan.path, TokenPath::FixedFee(FixedFeeVariant::Thorchain));
        assert!(plan.known_channel.is_none());
        assert!(!plan.inter_chain);
    }

    #[test]
    fn test_plan_inter_chain_reports_channel() {
        let registry = builtin();
        let cosmos = registry.chain("cosmos").unwrap();
        let plan = plan_send(registry, cosmos, &address("cosmos", 1), &address("osmo", 2), "uatom").unwrap();
        assert_eq!(plan.known_channel.as_deref(), Some("channel-141"));
        assert_eq!(plan.destination_chain.as_deref(), Some("osmosis"));
    }
}
