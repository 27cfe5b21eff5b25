use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Round half toward positive infinity: `2.5 -> 3`, `-2.5 -> -2`.
///
/// This is the rule every whole-number report field uses, so values
/// agree with the figures the presentation layer has always shown.
pub fn round_half_up(value: Decimal) -> Decimal {
    (value + dec!(0.5)).floor()
}

/// Round half away from zero: `2.5 -> 3`, `-2.5 -> -3`.
pub fn round_half_away(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round with [`round_half_up`] and narrow to an integer.
///
/// Inputs are bounded by validated investment ranges, so saturation only
/// matters for hand-built catalogs with absurd multipliers.
pub fn whole(value: Decimal) -> i64 {
    let rounded = round_half_up(value);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_up_positive() {
        assert_eq!(round_half_up(dec!(2.5)), dec!(3));
        assert_eq!(round_half_up(dec!(2.49)), dec!(2));
    }

    #[test]
    fn test_half_up_negative_goes_toward_zero() {
        assert_eq!(round_half_up(dec!(-2.5)), dec!(-2));
        assert_eq!(round_half_up(dec!(-2.51)), dec!(-3));
    }

    #[test]
    fn test_half_away() {
        assert_eq!(round_half_away(dec!(2.5)), dec!(3));
        assert_eq!(round_half_away(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn test_whole() {
        assert_eq!(whole(dec!(511.111)), 511);
        assert_eq!(whole(dec!(-0.4)), 0);
    }
}
