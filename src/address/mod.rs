//! Address Classifier
//!
//! Bech32 prefix decoding, prefix to chain mapping and EVM address handling.

pub mod classifier;
pub mod evm;

pub use classifier::{chains_accepting, classify, decode_prefix, is_valid_address, slice_address, AddressKind};
pub use evm::{evm_to_bech32, is_evm_address, to_checksum_address};

use crate::error::{ErrorCode, HawalaError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Address decode failed: {0}")]
    Decode(String),

    #[error("Invalid EVM address: {0}")]
    InvalidEvmAddress(String),

    #[error("No chain registered for prefix '{0}'")]
    UnsupportedChain(String),
}

impl From<AddressError> for HawalaError {
    fn from(e: AddressError) -> Self {
        let code = match e {
            AddressError::UnsupportedChain(_) => ErrorCode::UnsupportedChain,
            _ => ErrorCode::InvalidAddress,
        };
        HawalaError::new(code, e.to_string())
    }
}
