//! IBC (Inter-Blockchain Communication) Transfer Module
//!
//! Transfer channel discovery and validation, MsgTransfer building and IBC
//! voucher denoms.

pub mod channels;
pub mod resolver;
pub mod rest;
pub mod types;

pub use channels::ChannelRegistry;
pub use resolver::{
    no_active_channel_message, ChannelLookup, ChannelResolver, ChannelValidator,
    StaticChannelLookup, StaticChannelValidator,
};
pub use rest::RestChannelValidator;
pub use types::*;
