//! EVM-style (0x) addresses: detection, EIP-55 checksums and conversion to
//! the bech32 form used by EVM-compatible Cosmos chains.

use super::AddressError;
use bech32::{ToBase32, Variant};
use tiny_keccak::{Hasher, Keccak};

/// Whether `address` looks like a 0x address. No checksum validation.
pub fn is_evm_address(address: &str) -> bool {
    let trimmed = address.trim();
    match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex_part) => hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn evm_bytes(address: &str) -> Result<Vec<u8>, AddressError> {
    if !is_evm_address(address) {
        return Err(AddressError::InvalidEvmAddress(address.to_string()));
    }
    let hex_part = &address.trim()[2..];
    hex::decode(hex_part.to_lowercase())
        .map_err(|_| AddressError::InvalidEvmAddress(address.to_string()))
}

/// EIP-55 mixed-case checksum form of a 0x address
pub fn to_checksum_address(address: &str) -> Result<String, AddressError> {
    let bytes = evm_bytes(address)?;
    let lower = hex::encode(&bytes);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }
    Ok(result)
}

/// Re-encode the 20 account bytes of a 0x address under `prefix`
pub fn evm_to_bech32(prefix: &str, address: &str) -> Result<String, AddressError> {
    let bytes = evm_bytes(address)?;
    bech32::encode(prefix, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| AddressError::Decode(e.to_string()))
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

    #[test]
    fn test_detects_evm_addresses() {
        assert!(is_evm_address(VITALIK));
        assert!(is_evm_address("0xD8DA6BF26964AF9D7EED9E03E53415D37AA96045"));
        assert!(!is_evm_address("0xd8da6bf26964af9d7eed9e03e53415d37aa9604"));
        assert!(!is_evm_address("cosmos1xyz"));
        assert!(!is_evm_address("0xzz8da6bf26964af9d7eed9e03e53415d37aa9604"));
    }

    #[test]
    fn test_checksum_address() {
        assert_eq!(
            to_checksum_address(VITALIK).unwrap(),
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn test_evm_to_bech32_round_trips_bytes() {
        let converted = evm_to_bech32("evmos", VITALIK).unwrap();
        assert!(converted.starts_with("evmos1"));

        let (hrp, data, _) = bech32::decode(&converted).unwrap();
        let bytes = <Vec<u8> as bech32::FromBase32>::from_base32(&data).unwrap();
        assert_eq!(hrp, "evmos");
        assert_eq!(hex::encode(bytes), &VITALIK[2..]);
    }

    #[test]
    fn test_evm_to_bech32_rejects_non_evm() {
        assert!(matches!(
            evm_to_bech32("evmos", "cosmos1abc"),
            Err(AddressError::InvalidEvmAddress(_))
        ));
    }
}
