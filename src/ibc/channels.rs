//! Known IBC transfer channels
//!
//! Keyed by (source registry path, destination registry path). Each pair is
//! stored once with both channel ends and expanded in both directions.

use super::types::IBCChannel;
use std::collections::HashMap;
use std::sync::LazyLock;

/// (chain A, channel on A, chain B, channel on B)
const CHANNEL_PAIRS: &[(&str, &str, &str, &str)] = &[
    ("cosmoshub", "channel-141", "osmosis", "channel-0"),
    ("cosmoshub", "channel-207", "juno", "channel-1"),
    ("cosmoshub", "channel-391", "stride", "channel-0"),
    ("cosmoshub", "channel-569", "neutron", "channel-1"),
    ("cosmoshub", "channel-536", "noble", "channel-4"),
    ("osmosis", "channel-42", "juno", "channel-0"),
    ("osmosis", "channel-75", "stargaze", "channel-0"),
    ("osmosis", "channel-326", "stride", "channel-5"),
    ("osmosis", "channel-6994", "celestia", "channel-2"),
    ("osmosis", "channel-874", "neutron", "channel-10"),
    ("osmosis", "channel-750", "noble", "channel-1"),
    ("osmosis", "channel-122", "injective", "channel-8"),
    ("osmosis", "channel-204", "evmos", "channel-0"),
    ("osmosis", "channel-88", "secretnetwork", "channel-1"),
    ("osmosis", "channel-782", "sei", "channel-0"),
    ("osmosis", "channel-19774", "dymension", "channel-2"),
];

static KNOWN_CHANNELS: LazyLock<HashMap<(String, String), IBCChannel>> = LazyLock::new(|| {
    let mut channels = HashMap::new();
    for (a, on_a, b, on_b) in CHANNEL_PAIRS {
        channels.insert((a.to_string(), b.to_string()), IBCChannel::open(on_a, on_b));
        channels.insert((b.to_string(), a.to_string()), IBCChannel::open(on_b, on_a));
    }
    channels
});

/// Channel registry for path discovery
pub struct ChannelRegistry;

impl ChannelRegistry {
    /// Channel from `source` to `destination`, by registry path
    pub fn get_channel(source: &str, destination: &str) -> Option<IBCChannel> {
        KNOWN_CHANNELS
            .get(&(source.to_string(), destination.to_string()))
            .cloned()
    }

    pub fn route_exists(source: &str, destination: &str) -> bool {
        Self::get_channel(source, destination).is_some()
    }

    /// Registry paths reachable from `source`, sorted
    pub fn get_destinations(source: &str) -> Vec<String> {
        let mut destinations: Vec<String> = KNOWN_CHANNELS
            .keys()
            .filter(|(src, _)| src == source)
            .map(|(_, dst)| dst.clone())
            .collect();
        destinations.sort();
        destinations
    }

    pub fn channel_count() -> usize {
        KNOWN_CHANNELS.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_channel() {
        let channel = ChannelRegistry::get_channel("cosmoshub", "osmosis").unwrap();
        assert_eq!(channel.channel_id, "channel-141");
        assert_eq!(channel.counterparty_channel_id, "channel-0");
        assert!(channel.is_open());
    }

    #[test]
    fn test_bidirectional_channels() {
        let forward = ChannelRegistry::get_channel("osmosis", "juno").unwrap();
        let back = ChannelRegistry::get_channel("juno", "osmosis").unwrap();
        assert_eq!(forward.channel_id, back.counterparty_channel_id);
        assert_eq!(back.channel_id, forward.counterparty_channel_id);
    }

    #[test]
    fn test_get_destinations() {
        let destinations = ChannelRegistry::get_destinations("cosmoshub");
        assert!(destinations.contains(&"osmosis".to_string()));
        assert!(destinations.contains(&"noble".to_string()));
        assert!(!destinations.contains(&"cosmoshub".to_string()));
    }

    #[test]
    fn test_no_channel() {
        assert!(ChannelRegistry::get_channel("thorchain", "osmosis").is_none());
        assert!(!ChannelRegistry::route_exists("cosmoshub", "cosmoshub"));
    }

    #[test]
    fn test_channel_count() {
        assert_eq!(ChannelRegistry::channel_count(), CHANNEL_PAIRS.len() * 2);
    }
}
