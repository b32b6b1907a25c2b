//! Built-in chain table
//!
//! Used when no registry file is configured.

use super::chain::ChainApis;
use super::store::{ChainEntry, ChainRegistry, RegistryFile};
use crate::types::TokenDescriptor;
use std::sync::LazyLock;

const ICON_BASE: &str = "https://raw.githubusercontent.com/cosmos/chain-registry/master";

struct BuiltinChain {
    key: &'static str,
    name: &'static str,
    chain_id: &'static str,
    testnet_chain_id: Option<&'static str>,
    prefix: &'static str,
    coin_type: u32,
    registry_path: &'static str,
    denom: (&'static str, &'static str, u8),
    evm_chain_id: Option<(u64, u64)>,
    dual_address: bool,
    testnet_apis: bool,
}

const BUILTIN_CHAINS: &[BuiltinChain] = &[
    BuiltinChain {
        key: "cosmos",
        name: "Cosmos Hub",
        chain_id: "cosmoshub-4",
        testnet_chain_id: Some("theta-testnet-001"),
        prefix: "cosmos",
        coin_type: 118,
        registry_path: "cosmoshub",
        denom: ("uatom", "ATOM", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: true,
    },
    BuiltinChain {
        key: "osmosis",
        name: "Osmosis",
        chain_id: "osmosis-1",
        testnet_chain_id: Some("osmo-test-5"),
        prefix: "osmo",
        coin_type: 118,
        registry_path: "osmosis",
        denom: ("uosmo", "OSMO", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: true,
    },
    BuiltinChain {
        key: "juno",
        name: "Juno",
        chain_id: "juno-1",
        testnet_chain_id: Some("uni-6"),
        prefix: "juno",
        coin_type: 118,
        registry_path: "juno",
        denom: ("ujuno", "JUNO", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "stargaze",
        name: "Stargaze",
        chain_id: "stargaze-1",
        testnet_chain_id: Some("elgafar-1"),
        prefix: "stars",
        coin_type: 118,
        registry_path: "stargaze",
        denom: ("ustars", "STARS", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "stride",
        name: "Stride",
        chain_id: "stride-1",
        testnet_chain_id: None,
        prefix: "stride",
        coin_type: 118,
        registry_path: "stride",
        denom: ("ustrd", "STRD", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "celestia",
        name: "Celestia",
        chain_id: "celestia",
        testnet_chain_id: Some("mocha-4"),
        prefix: "celestia",
        coin_type: 118,
        registry_path: "celestia",
        denom: ("utia", "TIA", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "neutron",
        name: "Neutron",
        chain_id: "neutron-1",
        testnet_chain_id: Some("pion-1"),
        prefix: "neutron",
        coin_type: 118,
        registry_path: "neutron",
        denom: ("untrn", "NTRN", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "noble",
        name: "Noble",
        chain_id: "noble-1",
        testnet_chain_id: Some("grand-1"),
        prefix: "noble",
        coin_type: 118,
        registry_path: "noble",
        denom: ("uusdc", "USDC", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "injective",
        name: "Injective",
        chain_id: "injective-1",
        testnet_chain_id: Some("injective-888"),
        prefix: "inj",
        coin_type: 60,
        registry_path: "injective",
        denom: ("inj", "INJ", 18),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "evmos",
        name: "Evmos",
        chain_id: "evmos_9001-2",
        testnet_chain_id: Some("evmos_9000-4"),
        prefix: "evmos",
        coin_type: 60,
        registry_path: "evmos",
        denom: ("aevmos", "EVMOS", 18),
        evm_chain_id: Some((9001, 9000)),
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "dymension",
        name: "Dymension",
        chain_id: "dymension_1100-1",
        testnet_chain_id: None,
        prefix: "dym",
        coin_type: 60,
        registry_path: "dymension",
        denom: ("adym", "DYM", 18),
        evm_chain_id: Some((1100, 1100)),
        dual_address: true,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "secret",
        name: "Secret Network",
        chain_id: "secret-4",
        testnet_chain_id: Some("pulsar-3"),
        prefix: "secret",
        coin_type: 529,
        registry_path: "secretnetwork",
        denom: ("uscrt", "SCRT", 6),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "sei",
        name: "Sei",
        chain_id: "pacific-1",
        testnet_chain_id: Some("atlantic-2"),
        prefix: "sei",
        coin_type: 118,
        registry_path: "sei",
        denom: ("usei", "SEI", 6),
        evm_chain_id: Some((1329, 1328)),
        dual_address: true,
        testnet_apis: true,
    },
    BuiltinChain {
        key: "thorchain",
        name: "THORChain",
        chain_id: "thorchain-mainnet-v1",
        testnet_chain_id: None,
        prefix: "thor",
        coin_type: 931,
        registry_path: "thorchain",
        denom: ("rune", "RUNE", 8),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
    BuiltinChain {
        key: "mayachain",
        name: "Mayachain",
        chain_id: "mayachain-mainnet-v1",
        testnet_chain_id: None,
        prefix: "maya",
        coin_type: 931,
        registry_path: "mayachain",
        denom: ("cacao", "CACAO", 10),
        evm_chain_id: None,
        dual_address: false,
        testnet_apis: false,
    },
];

/// Contract tokens known per chain: (chain key, contract, symbol, decimals)
const BUILTIN_CONTRACT_TOKENS: &[(&str, &str, &str, u8)] = &[(
    "juno",
    "juno168ctmpyppk90d34p3jjy658zf5a5l3w8wk35wht6ccqj4mr0yv8s4j5awr",
    "NETA",
    6,
)];

fn polkachu(key: &str, kind: &str) -> String {
    format!("https://{}-{}.polkachu.com", key, kind)
}

fn polkachu_test(key: &str, kind: &str) -> String {
    format!("https://{}-testnet-{}.polkachu.com", key, kind)
}

impl BuiltinChain {
    fn to_entry(&self) -> ChainEntry {
        let (minimal, symbol, decimals) = self.denom;
        let icon = format!("{}/{}/images/{}.png", ICON_BASE, self.registry_path, self.key);

        let apis = ChainApis {
            rpc: Some(polkachu(self.key, "rpc")),
            rest: Some(polkachu(self.key, "api")),
            rpc_test: self.testnet_apis.then(|| polkachu_test(self.key, "rpc")),
            rest_test: self.testnet_apis.then(|| polkachu_test(self.key, "api")),
        };

        let cw20_tokens = BUILTIN_CONTRACT_TOKENS
            .iter()
            .filter(|(chain, ..)| *chain == self.key)
            .map(|(_, contract, symbol, decimals)| TokenDescriptor::new(*contract, *symbol, *decimals))
            .collect();

        ChainEntry {
            key: self.key.to_string(),
            chain_name: self.name.to_string(),
            chain_id: self.chain_id.to_string(),
            testnet_chain_id: self.testnet_chain_id.map(str::to_string),
            address_prefix: self.prefix.to_string(),
            coin_type: self.coin_type,
            chain_registry_path: self.registry_path.to_string(),
            native_denoms: vec![TokenDescriptor::new(minimal, symbol, decimals).with_name(self.name)],
            fee_denom: Some(minimal.to_string()),
            apis,
            evm_chain_id: self.evm_chain_id.map(|(main, _)| main),
            evm_chain_id_testnet: self.evm_chain_id.map(|(_, test)| test),
            api_available: true,
            chain_symbol_image_url: Some(icon),
            custom_client: None,
            registry_extension: false,
            dual_address: self.dual_address,
            cw20_tokens,
        }
    }
}

/// Registry file equivalent of the built-in table
pub fn builtin_registry_file() -> RegistryFile {
    RegistryFile {
        chains: BUILTIN_CHAINS.iter().map(BuiltinChain::to_entry).collect(),
        denoms: vec![TokenDescriptor::new("uusdc", "USDC", 6).with_name("Noble USDC")],
    }
}

static BUILTIN: LazyLock<ChainRegistry> = LazyLock::new(|| {
    ChainRegistry::from_file(builtin_registry_file()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "built-in chain table rejected");
        ChainRegistry::default()
    })
});

/// Shared built-in registry
pub fn builtin() -> &'static ChainRegistry {
    &BUILTIN
}
