//! Active wallet model and the signing-capability provider interface.
//!
//! Key storage and derivation live outside this crate. The send core only
//! sees an opaque signer handle, the active wallet's per-chain addresses
//! and how that wallet signs.

use crate::error::HawalaResult;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How the active wallet holds its keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    SeedPhrase,
    SeedPhraseImported,
    PrivateKey,
    Ledger,
}

impl WalletType {
    /// Signing happens on an external device that needs user confirmation
    pub fn is_hardware(&self) -> bool {
        matches!(self, WalletType::Ledger)
    }
}

/// The wallet currently selected by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWallet {
    pub name: String,
    pub wallet_type: WalletType,
    /// chain key -> address on that chain
    pub addresses: HashMap<String, String>,
}

impl ActiveWallet {
    pub fn new(name: impl Into<String>, wallet_type: WalletType) -> Self {
        Self {
            name: name.into(),
            wallet_type,
            addresses: HashMap::new(),
        }
    }

    pub fn with_address(mut self, chain_key: impl Into<String>, address: impl Into<String>) -> Self {
        self.addresses.insert(chain_key.into(), address.into());
        self
    }

    pub fn address_for(&self, chain_key: &str) -> Option<&str> {
        self.addresses.get(chain_key).map(String::as_str)
    }
}

/// An unlocked signer. Transaction clients receive it at construction and
/// call into it when they need a signature.
pub trait OfflineSigner: Send + Sync {
    /// Addresses this signer can sign for
    fn accounts(&self) -> Vec<String>;
}

pub type WalletHandle = Arc<dyn OfflineSigner>;

impl fmt::Debug for dyn OfflineSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineSigner")
            .field("accounts", &self.accounts().len())
            .finish()
    }
}

/// Signing capability provider. Acquisition may prompt the user, including
/// a confirmation on a hardware device.
pub trait WalletProvider: Send + Sync {
    fn get_wallet(&self) -> BoxFuture<'_, HawalaResult<WalletHandle>>;
}
