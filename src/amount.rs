//! Decimal Amounts
//!
//! Human-readable token amounts are kept as exact decimal digit strings and
//! only converted to integer base units at the last moment. Two conversions
//! exist and must not be mixed up:
//! - `to_base_units_floor`: multiply by 10^decimals and drop the remainder
//!   (contract tokens and standard chain messages)
//! - `round_to_decimals`: round half-up to `decimals` places, staying in
//!   display units (privacy tokens)

use crate::error::{ErrorCode, HawalaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimals assumed when a token descriptor does not carry any.
pub const DEFAULT_DECIMALS: u8 = 6;

/// Decimals assumed by fixed-fee chains when a token descriptor does not carry any.
pub const FIXED_FEE_DEFAULT_DECIMALS: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Negative amounts are not allowed")]
    Negative,

    #[error("Amount overflow")]
    Overflow,
}

impl From<AmountError> for HawalaError {
    fn from(e: AmountError) -> Self {
        HawalaError::new(ErrorCode::InvalidAmount, e.to_string())
    }
}

/// A non-negative decimal number with exact digits.
///
/// `integer` never has leading zeros (zero is the empty string) and
/// `fraction` never has trailing zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DecimalAmount {
    integer: String,
    fraction: String,
}

impl DecimalAmount {
    pub fn zero() -> Self {
        Self::default()
    }

    fn from_parts(integer: &str, fraction: &str) -> Self {
        Self {
            integer: integer.trim_start_matches('0').to_string(),
            fraction: fraction.trim_end_matches('0').to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    /// Number of significant fractional digits.
    pub fn scale(&self) -> usize {
        self.fraction.len()
    }

    /// `floor(self * 10^decimals)` as an integer.
    pub fn to_base_units_floor(&self, decimals: u8) -> Result<u128, AmountError> {
        let width = decimals as usize;
        let mut digits = self.integer.clone();
        if self.fraction.len() >= width {
            digits.push_str(&self.fraction[..width]);
        } else {
            digits.push_str(&format!("{:0<width$}", self.fraction, width = width));
        }

        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(0);
        }
        digits.parse::<u128>().map_err(|_| AmountError::Overflow)
    }

    /// Round half-up to at most `decimals` fractional digits.
    pub fn round_to_decimals(&self, decimals: u8) -> DecimalAmount {
        let width = decimals as usize;
        if self.fraction.len() <= width {
            return self.clone();
        }

        let kept = &self.fraction[..width];
        let round_up = self.fraction.as_bytes()[width] >= b'5';
        if !round_up {
            return Self::from_parts(&self.integer, kept);
        }

        // Increment the digit string integer||kept by one unit in the last place.
        let mut digits: Vec<u8> = format!("{}{}", self.integer, kept).into_bytes();
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if !carry {
                break;
            }
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }

        let digits = String::from_utf8(digits).unwrap_or_default();
        let split = digits.len() - width;
        Self::from_parts(&digits[..split], &digits[split..])
    }
}

impl FromStr for DecimalAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative);
        }
        let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);

        // Scientific notation (e.g. "1.5e-7") shows up when amounts pass through floats.
        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(idx) => {
                let exp = trimmed[idx + 1..]
                    .parse::<i32>()
                    .map_err(|_| AmountError::Invalid(s.to_string()))?;
                (&trimmed[..idx], exp)
            }
            None => (trimmed, 0),
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let digits = format!("{}{}", int_part, frac_part);
        let point = int_part.len() as i64 + exponent as i64;
        if point > 1_000 || point < -1_000 {
            return Err(AmountError::Overflow);
        }

        let amount = if point <= 0 {
            let zeros = "0".repeat((-point) as usize);
            Self::from_parts("", &format!("{}{}", zeros, digits))
        } else if point as usize >= digits.len() {
            let zeros = "0".repeat(point as usize - digits.len());
            Self::from_parts(&format!("{}{}", digits, zeros), "")
        } else {
            let (i, f) = digits.split_at(point as usize);
            Self::from_parts(i, f)
        };

        Ok(amount)
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = if self.integer.is_empty() { "0" } else { &self.integer };
        if self.fraction.is_empty() {
            write!(f, "{}", integer)
        } else {
            write!(f, "{}.{}", integer, self.fraction)
        }
    }
}

impl Serialize for DecimalAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DecimalAmount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> DecimalAmount {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(amt("1.5").to_string(), "1.5");
        assert_eq!(amt("001.500").to_string(), "1.5");
        assert_eq!(amt("0").to_string(), "0");
        assert_eq!(amt(".25").to_string(), "0.25");
        assert_eq!(amt("10").to_string(), "10");
        assert!(amt("0.000").is_zero());
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(amt("1.5e3").to_string(), "1500");
        assert_eq!(amt("1e-7").to_string(), "0.0000001");
        assert_eq!(amt("2.5E-1").to_string(), "0.25");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<DecimalAmount>(), Err(AmountError::Empty));
        assert_eq!("-1".parse::<DecimalAmount>(), Err(AmountError::Negative));
        assert!("1.2.3".parse::<DecimalAmount>().is_err());
        assert!("abc".parse::<DecimalAmount>().is_err());
        assert!(".".parse::<DecimalAmount>().is_err());
    }

    #[test]
    fn test_floor_to_base_units() {
        assert_eq!(amt("1.5").to_base_units_floor(6).unwrap(), 1_500_000);
        assert_eq!(amt("0.1234567").to_base_units_floor(6).unwrap(), 123_456);
        assert_eq!(amt("0.0000009").to_base_units_floor(6).unwrap(), 0);
        assert_eq!(amt("12").to_base_units_floor(0).unwrap(), 12);
        assert_eq!(amt("1").to_base_units_floor(18).unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_floor_overflow() {
        let huge = "9".repeat(40);
        assert_eq!(amt(&huge).to_base_units_floor(6), Err(AmountError::Overflow));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(amt("0.1234565").round_to_decimals(6).to_string(), "0.123457");
        assert_eq!(amt("0.1234564").round_to_decimals(6).to_string(), "0.123456");
        assert_eq!(amt("9.9999995").round_to_decimals(6).to_string(), "10");
        assert_eq!(amt("1.5").round_to_decimals(0).to_string(), "2");
        assert_eq!(amt("1.25").round_to_decimals(6).to_string(), "1.25");
    }

    #[test]
    fn test_floor_and_round_differ() {
        let a = amt("0.0000019");
        assert_eq!(a.to_base_units_floor(6).unwrap(), 1);
        assert_eq!(a.round_to_decimals(6).to_string(), "0.000002");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&amt("1.50")).unwrap();
        assert_eq!(json, "\"1.5\"");
        let back: DecimalAmount = serde_json::from_str("\"2.25\"").unwrap();
        assert_eq!(back, amt("2.25"));
    }
}
