//! Structured Logging with Sensitive Data Redaction
//!
//! All logging goes through `tracing`. Addresses and hashes are passed
//! through the redaction helpers before they become event fields.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Fully redact a sensitive value
fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }
    let len = value.chars().count();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Partially redact an address (prefix plus the last 4 characters)
pub fn redact_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    // Keep the bech32 prefix and separator visible.
    let prefix_len = match trimmed.find('1') {
        _ if trimmed.starts_with("0x") => 8,
        Some(sep) if sep < 12 => sep + 2,
        _ => 6,
    };
    let suffix_len = 4;

    if !trimmed.is_ascii() || trimmed.len() <= prefix_len + suffix_len + 3 {
        return redact_value(trimmed);
    }

    format!("{}...{}", &trimmed[..prefix_len], &trimmed[trimmed.len() - suffix_len..])
}

/// Partially redact a hash (first 10 and last 6 characters)
pub fn redact_hash(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }
    if trimmed.len() <= 20 || !trimmed.is_ascii() {
        return trimmed.to_string();
    }
    format!("{}...{}", &trimmed[..10], &trimmed[trimmed.len() - 6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_bech32_address() {
        let redacted = redact_address("cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu");
        assert_eq!(redacted, "cosmos1q...v7xu");
    }

    #[test]
    fn test_redact_evm_address() {
        let redacted = redact_address("0xd8da6bf26964af9d7eed9e03e53415d37aa96045");
        assert_eq!(redacted, "0xd8da6b...6045");
    }

    #[test]
    fn test_redact_short_values() {
        assert_eq!(redact_address(""), "[EMPTY]");
        assert_eq!(redact_address("abc"), "[REDACTED]");
        assert_eq!(redact_address("cosmos1abcdef"), "[REDACTED:13chars]");
    }

    #[test]
    fn test_redact_hash() {
        let hash = "A1B2C3D4E5F60718293A4B5C6D7E8F90A1B2C3D4E5F60718293A4B5C6D7E8F90";
        assert_eq!(redact_hash(hash), "A1B2C3D4E5...7E8F90");
        assert_eq!(redact_hash("SHORT"), "SHORT");
    }

    #[test]
    fn test_init_tracing_twice() {
        init_tracing("warn");
        init_tracing("debug");
    }
}
