//! Send results
//!
//! Every outcome of a send attempt is a `SendResult`. Errors never cross
//! this boundary; they are turned into display strings here.

use crate::error::{HawalaError, MAX_ERROR_MESSAGE_LEN, TX_DECLINED_USER_MESSAGE};
use crate::tx::{CompletionHandle, CompletionStatus};
use crate::types::{TokenDescriptor, TxData, TxType};
use serde::Serialize;

/// Second message on a failed fixed-fee send
pub const FIXED_FEE_SEND_FAILED: &str = "Failed to send tokens";

/// Activity card for a broadcast transaction. Handed to the caller's
/// activity store once returned.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransactionRecord {
    pub tx_hash: Option<String>,
    /// Chain icon
    pub img: Option<String>,
    pub sent_amount: String,
    pub sent_token_info: TokenDescriptor,
    pub sent_usd_value: String,
    pub title: String,
    pub subtitle: String,
    pub tx_type: TxType,
    #[serde(skip)]
    pub completion: CompletionHandle,
    pub fee_denomination: Option<String>,
    pub fee_quantity: Option<String>,
}

impl PendingTransactionRecord {
    pub fn tx_status(&self) -> CompletionStatus {
        self.completion.status()
    }
}

#[derive(Debug, Clone)]
pub enum SendResult {
    /// At least one message, most specific first
    Failure { errors: Vec<String> },
    Success {
        pending: Box<PendingTransactionRecord>,
        data: Option<TxData>,
    },
}

impl SendResult {
    pub fn failure(message: impl Into<String>) -> Self {
        SendResult::Failure {
            errors: vec![message.into()],
        }
    }

    pub fn success(pending: PendingTransactionRecord, data: Option<TxData>) -> Self {
        SendResult::Success {
            pending: Box::new(pending),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success { .. })
    }

    pub fn errors(&self) -> &[String] {
        match self {
            SendResult::Failure { errors } => errors,
            SendResult::Success { .. } => &[],
        }
    }

    pub fn pending(&self) -> Option<&PendingTransactionRecord> {
        match self {
            SendResult::Success { pending, .. } => Some(pending.as_ref()),
            SendResult::Failure { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&TxData> {
        match self {
            SendResult::Success { data, .. } => data.as_ref(),
            SendResult::Failure { .. } => None,
        }
    }
}

/// Cap `message` at `max` characters
pub fn truncate_message(message: &str, max: usize) -> String {
    match message.char_indices().nth(max) {
        Some((idx, _)) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

/// Display text for an error: the fixed decline message, or the raw
/// message capped at [`MAX_ERROR_MESSAGE_LEN`].
pub fn user_message(error: &HawalaError) -> String {
    if error.is_signer_declined() {
        TX_DECLINED_USER_MESSAGE.to_string()
    } else {
        truncate_message(&error.message, MAX_ERROR_MESSAGE_LEN)
    }
}

pub fn failure_from_error(error: &HawalaError) -> SendResult {
    SendResult::failure(user_message(error))
}

/// Fixed-fee failures carry the underlying cause first, then the generic message
pub fn fixed_fee_failure(error: &HawalaError) -> SendResult {
    if error.is_signer_declined() {
        return failure_from_error(error);
    }
    let mut errors = Vec::with_capacity(2);
    let cause = user_message(error);
    if !cause.trim().is_empty() {
        errors.push(cause);
    }
    errors.push(FIXED_FEE_SEND_FAILED.to_string());
    SendResult::Failure { errors }
}
