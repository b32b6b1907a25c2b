use bech32::{ToBase32, Variant};
use hawala_send::address::{classify, decode_prefix};
use hawala_send::registry::builtin;
use hawala_send::DecimalAmount;
use proptest::prelude::*;

fn any_amount() -> impl Strategy<Value = (u64, String)> {
    (0u64..1_000_000_000, "[0-9]{0,12}")
}

fn prefixes() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["cosmos", "osmo", "juno", "thor", "secret", "unknownchain"])
}

proptest! {
    #[test]
    fn floor_never_exceeds_exact_value((int, frac) in any_amount(), decimals in 0u8..=18) {
        let text = if frac.is_empty() { int.to_string() } else { format!("{}.{}", int, frac) };
        let amount: DecimalAmount = text.parse().unwrap();

        let floored = amount.to_base_units_floor(decimals).unwrap();
        let kept: String = frac.chars().take(decimals as usize).collect();
        let expected = format!("{}{:0<width$}", int, kept, width = decimals as usize);
        prop_assert_eq!(floored, expected.parse::<u128>().unwrap());
    }

    #[test]
    fn rounding_and_flooring_differ_only_by_one_unit((int, frac) in any_amount(), decimals in 0u8..=12) {
        let text = if frac.is_empty() { int.to_string() } else { format!("{}.{}", int, frac) };
        let amount: DecimalAmount = text.parse().unwrap();

        let floored = amount.to_base_units_floor(decimals).unwrap();
        let rounded = amount.round_to_decimals(decimals).to_base_units_floor(decimals).unwrap();
        prop_assert!(rounded == floored || rounded == floored + 1);

        let next_digit = frac.chars().nth(decimals as usize);
        let rounds_up = next_digit.is_some_and(|d| d >= '5');
        prop_assert_eq!(rounded == floored + 1, rounds_up);
    }

    #[test]
    fn classification_is_idempotent(prefix in prefixes(), bytes in prop::array::uniform20(any::<u8>())) {
        let registry = builtin();
        let address = bech32::encode(prefix, bytes.to_base32(), Variant::Bech32).unwrap();

        let first = classify(registry, &address);
        let second = classify(registry, &address);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(decode_prefix(&address).unwrap(), prefix);
    }

    #[test]
    fn garbage_never_classifies(input in "[a-z]{1,8}") {
        let registry = builtin();
        let first = classify(registry, &input);
        prop_assert!(first.is_err());
        prop_assert_eq!(first, classify(registry, &input));
    }

    #[test]
    fn evm_addresses_skip_prefix_mapping(bytes in prop::array::uniform20(any::<u8>())) {
        let registry = builtin();
        let address = format!("0x{}", hex::encode(bytes));
        let kind = classify(registry, &address).unwrap();
        prop_assert!(kind.is_evm());
        prop_assert_eq!(kind.chain_key(), None);
    }
}
