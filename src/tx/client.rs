//! Per-chain transaction client interfaces
//!
//! Wire encoding, signing and broadcast happen behind these traits. The send
//! core only drives them.

use super::completion::TxOutcome;
use crate::amount::DecimalAmount;
use crate::error::HawalaResult;
use crate::ibc::MsgTransfer;
use crate::registry::FixedFeeVariant;
use crate::types::{Coin, FeeSpec};
use crate::wallet::WalletHandle;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Confirmation polling options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_000),
            timeout: Duration::from_millis(60_000),
        }
    }
}

/// Bank and IBC sends on Cosmos SDK chains
pub trait TxClient: Send + Sync {
    /// Connect the signing client. Called once, before first use.
    fn init_client(&mut self) -> BoxFuture<'_, HawalaResult<()>>;

    fn set_rest_endpoint(&mut self, rest: &str);

    /// Register chain-specific message types on top of the standard set
    fn register_message_types(&mut self) {}

    fn send_tokens<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
        amount: Vec<Coin>,
        fee: &'a FeeSpec,
        memo: &'a str,
    ) -> BoxFuture<'a, HawalaResult<String>>;

    fn send_ibc_tokens<'a>(
        &'a self,
        msg: &'a MsgTransfer,
        fee: &'a FeeSpec,
    ) -> BoxFuture<'a, HawalaResult<String>>;

    fn poll_for_tx(&self, tx_hash: String) -> BoxFuture<'_, HawalaResult<TxOutcome>>;
}

/// CosmWasm contract execution
pub trait ContractTxClient: Send + Sync {
    fn init_client(&mut self) -> BoxFuture<'_, HawalaResult<()>>;

    fn execute<'a>(
        &'a self,
        sender: &'a str,
        contract: &'a str,
        msg: serde_json::Value,
        fee: &'a FeeSpec,
        memo: &'a str,
    ) -> BoxFuture<'a, HawalaResult<String>>;

    fn poll_for_tx(
        &self,
        tx_hash: String,
        options: PollOptions,
    ) -> BoxFuture<'_, HawalaResult<TxOutcome>>;
}

/// Confidential-balance token transfers. Resolves once the transfer is
/// final, so there is no separate poll.
pub trait PrivacyTxClient: Send + Sync {
    fn transfer<'a>(
        &'a self,
        sender: &'a str,
        contract: &'a str,
        msg: serde_json::Value,
    ) -> BoxFuture<'a, HawalaResult<TxOutcome>>;
}

/// Amount handed to a fixed-fee chain client in display units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedFeeAmount {
    pub amount: DecimalAmount,
    pub decimals: u8,
    pub denom: String,
}

/// What a fixed-fee chain client reports after broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedFeeReceipt {
    pub tx_hash: String,
    /// Amount actually sent, in base units
    pub amount: String,
}

/// Native send on a chain whose fees the protocol fixes
pub trait FixedFeeTxClient: Send + Sync {
    fn send_tokens<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
        amount: FixedFeeAmount,
        memo: &'a str,
    ) -> BoxFuture<'a, HawalaResult<FixedFeeReceipt>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTxReceipt {
    pub hash: String,
}

/// EVM-native value transfer
pub trait EvmTxClient: Send + Sync {
    fn send_transaction<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
        value: &'a str,
        gas: u64,
        gas_price: Option<u64>,
    ) -> BoxFuture<'a, HawalaResult<EvmTxReceipt>>;
}

/// How to construct the raw client for a chain. Initialisation is the
/// factory's job, not the provider's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientSpec {
    /// Chain ships its own client
    Custom {
        handler_id: String,
        testnet: bool,
        rest: String,
    },
    /// Ethermint signing: Cosmos chain id and EVM chain id are distinct
    Ethermint {
        rest: String,
        chain_id: String,
        evm_chain_id: u64,
    },
    PrivacyTestnet {
        rest: String,
        rpc: String,
    },
    Standard {
        rpc: String,
    },
}

impl ClientSpec {
    pub fn label(&self) -> &'static str {
        match self {
            ClientSpec::Custom { .. } => "custom",
            ClientSpec::Ethermint { .. } => "ethermint",
            ClientSpec::PrivacyTestnet { .. } => "privacy-testnet",
            ClientSpec::Standard { .. } => "standard",
        }
    }
}

/// Constructs raw clients for every family
pub trait TxClientProvider: Send + Sync {
    fn tx_client(&self, spec: ClientSpec, wallet: WalletHandle) -> HawalaResult<Box<dyn TxClient>>;

    fn contract_client(
        &self,
        rpc: &str,
        rest: &str,
        wallet: WalletHandle,
    ) -> HawalaResult<Box<dyn ContractTxClient>>;

    fn privacy_client(
        &self,
        rest: &str,
        chain_id: &str,
        wallet: WalletHandle,
    ) -> HawalaResult<Arc<dyn PrivacyTxClient>>;

    fn fixed_fee_client(
        &self,
        variant: FixedFeeVariant,
        wallet: WalletHandle,
    ) -> HawalaResult<Arc<dyn FixedFeeTxClient>>;

    fn evm_client(&self, wallet: WalletHandle) -> HawalaResult<Arc<dyn EvmTxClient>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_options() {
        let options = PollOptions::default();
        assert_eq!(options.interval, Duration::from_secs(2));
        assert_eq!(options.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_spec_labels() {
        let spec = ClientSpec::Ethermint {
            rest: "https://evmos-api.polkachu.com".to_string(),
            chain_id: "evmos_9001-2".to_string(),
            evm_chain_id: 9001,
        };
        assert_eq!(spec.label(), "ethermint");
    }
}
