//! Send requests

use crate::amount::DecimalAmount;
use crate::tx::{PrivacyTxClient, TxClient};
use crate::types::{FeeSpec, TokenDescriptor};
use std::fmt;
use std::sync::Arc;

/// Handler the caller already built and wants reused
#[derive(Clone)]
pub enum PrebuiltHandler {
    Tx(Arc<dyn TxClient>),
    Privacy(Arc<dyn PrivacyTxClient>),
}

impl fmt::Debug for PrebuiltHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrebuiltHandler::Tx(_) => f.write_str("PrebuiltHandler::Tx"),
            PrebuiltHandler::Privacy(_) => f.write_str("PrebuiltHandler::Privacy"),
        }
    }
}

/// One send attempt. Built fresh per attempt and not modified afterwards.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub to_address: String,
    /// Token picked by the user. Its symbol and name override the
    /// registry's display fields.
    pub token: Option<TokenDescriptor>,
    pub amount: DecimalAmount,
    pub memo: String,
    pub fee: FeeSpec,
    pub ibc_channel_id: Option<String>,
    pub handler: Option<PrebuiltHandler>,
}

impl SendRequest {
    pub fn new(to_address: impl Into<String>, token: TokenDescriptor, amount: DecimalAmount) -> Self {
        Self {
            to_address: to_address.into(),
            token: Some(token),
            amount,
            memo: String::new(),
            fee: FeeSpec::default(),
            ibc_channel_id: None,
            handler: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    pub fn with_fee(mut self, fee: FeeSpec) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.ibc_channel_id = Some(channel_id.into());
        self
    }

    pub fn with_handler(mut self, handler: PrebuiltHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }
}
