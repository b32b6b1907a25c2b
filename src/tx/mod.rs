//! Transaction Module
//!
//! Client interfaces per chain family, the handler factory that builds and
//! initialises them, and completion handles for broadcast transactions.

pub mod client;
pub mod completion;
pub mod factory;

pub use client::*;
pub use completion::{CompletionHandle, CompletionStatus, TxOutcome};
pub use factory::TxHandlerFactory;
