//! Utilities Module

pub mod logging;

pub use logging::{init_tracing, redact_address, redact_hash};
