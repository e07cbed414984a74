//! Monetary rounding helpers.
//!
//! Amounts are exact decimals ([`rust_decimal::Decimal`]); intermediate
//! arithmetic keeps full precision and values are rounded to the monetary
//! scale only where they are persisted or returned.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits carried by persisted monetary values.
pub const MONEY_SCALE: u32 = 2;

/// Rounds to the monetary scale, half-up.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// One minor currency unit (0.01).
pub fn minor_unit() -> Decimal {
    Decimal::new(1, MONEY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round(dec!(33.335)), dec!(33.34));
        assert_eq!(round(dec!(33.334)), dec!(33.33));
        assert_eq!(round(dec!(33.3333333)), dec!(33.33));
    }

    #[test]
    fn minor_unit_is_one_cent() {
        assert_eq!(minor_unit(), dec!(0.01));
    }
}
