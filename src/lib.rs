//! Hawala Send Core
//!
//! Routes "send value from A to B" across Cosmos SDK chains, EVM-compatible
//! chains, fixed-fee chains and chains with their own signing clients.
//!
//! # Architecture
//!
//! This crate provides:
//! - **registry**: Chain metadata, address prefixes and token descriptors
//! - **address**: Bech32 prefix decoding and EVM address handling
//! - **tx**: Client interfaces, the handler factory and completion handles
//! - **ibc**: Transfer channel resolution and validation
//! - **send**: The send orchestrator
//!
//! Signing, key storage and the chain RPC clients themselves are supplied by
//! the caller through [`wallet::WalletProvider`] and [`tx::TxClientProvider`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hawala_send::{registry, send::SendOrchestrator, ibc::ChannelResolver};
//!
//! let orchestrator = SendOrchestrator::new(
//!     Arc::new(registry::builtin().clone()),
//!     SendConfig::default(),
//!     wallets,
//!     clients,
//!     ChannelResolver::known_channels(),
//! )
//! .with_active_wallet(active);
//!
//! let result = orchestrator.send_tokens(request).await;
//! ```

pub mod address;
pub mod amount;
pub mod config;
pub mod error;
pub mod ibc;
pub mod registry;
pub mod send;
pub mod tx;
pub mod types;
pub mod utils;
pub mod wallet;

pub use amount::DecimalAmount;
pub use config::SendConfig;
pub use error::{ErrorCode, HawalaError, HawalaResult};
pub use registry::{ChainFamily, ChainMetadata, ChainRegistry};
pub use send::{SendOrchestrator, SendRequest, SendResult};
pub use types::*;
