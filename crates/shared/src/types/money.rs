//! Conversion between major units (dollars) and minor units (cents).
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Stored amounts are whole cents (`i64`); caller-facing amounts are `Decimal` dollars.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Totals below this value are read as dollars, everything else as cents.
///
/// The heuristic is ambiguous for amounts between $100.00 and $9,999.99
/// supplied in cents (e.g. `5000` is read as $5,000, not $50).
pub const CENTS_THRESHOLD: i64 = 10_000;

/// Half-up for positive amounts.
const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Converts dollars to cents, rounding to the nearest cent.
///
/// Returns `None` if the result does not fit in an `i64`.
#[must_use]
pub fn to_cents(dollars: Decimal) -> Option<i64> {
    dollars
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, ROUNDING)
        .to_i64()
}

/// Converts cents to dollars with exactly two decimal places.
#[must_use]
pub fn to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Normalizes a caller-supplied invoice total to cents.
///
/// Values below [`CENTS_THRESHOLD`] are converted with [`to_cents`]; larger
/// values are assumed to be cents already and only rounded to a whole number.
#[must_use]
pub fn normalize_total(raw: Decimal) -> Option<i64> {
    if raw < Decimal::from(CENTS_THRESHOLD) {
        to_cents(raw)
    } else {
        raw.round_dp_with_strategy(0, ROUNDING).to_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(200.00), 20_000)]
    #[case(dec!(100), 10_000)]
    #[case(dec!(0.01), 1)]
    #[case(dec!(19.99), 1_999)]
    #[case(dec!(0.005), 1)]
    #[case(dec!(1.015), 102)]
    #[case(dec!(1.014), 101)]
    #[case(dec!(-2.50), -250)]
    fn test_to_cents(#[case] dollars: Decimal, #[case] expected: i64) {
        assert_eq!(to_cents(dollars), Some(expected));
    }

    #[test]
    fn test_to_cents_overflow() {
        assert_eq!(to_cents(Decimal::MAX), None);
    }

    #[rstest]
    #[case(20_000, dec!(200.00))]
    #[case(1, dec!(0.01))]
    #[case(0, dec!(0))]
    #[case(-5_000, dec!(-50.00))]
    fn test_to_dollars(#[case] cents: i64, #[case] expected: Decimal) {
        assert_eq!(to_dollars(cents), expected);
        assert_eq!(to_dollars(cents).scale(), 2);
    }

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(12.34))]
    #[case(dec!(9999.99))]
    #[case(dec!(123456.7))]
    fn test_round_trip(#[case] dollars: Decimal) {
        let cents = to_cents(dollars).unwrap();
        assert_eq!(to_dollars(cents), dollars);
    }

    #[rstest]
    #[case(dec!(100), 10_000)]
    #[case(dec!(200.00), 20_000)]
    #[case(dec!(9999.99), 999_999)]
    #[case(dec!(10000), 10_000)]
    #[case(dec!(50000), 50_000)]
    #[case(dec!(12345.5), 12_346)]
    fn test_normalize_total_threshold(#[case] raw: Decimal, #[case] expected: i64) {
        assert_eq!(normalize_total(raw), Some(expected));
    }
}
