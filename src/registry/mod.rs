//! Chain Registry
//!
//! Read-only per-chain metadata, the bech32 prefix table and the token
//! descriptor tables. Built once and passed by reference into everything
//! downstream.

pub mod builtin;
pub mod chain;
pub mod store;

pub use builtin::{builtin, builtin_registry_file};
pub use chain::{
    ChainApis, ChainFamily, ChainMetadata, FixedFeeVariant, EVM_COIN_TYPE, FIXED_FEE_CHAINS,
    PRIVACY_TOKEN_CHAIN_IDS,
};
pub use store::{ChainEntry, ChainRegistry, RegistryFile};
