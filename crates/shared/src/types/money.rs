//! Minor-unit precision for monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every posted amount is a `rust_decimal::Decimal` rounded to the
//! currency's minor unit before it is compared or stored.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places in a currency's minor unit (2 for cents, 0 for yen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyScale(u32);

impl CurrencyScale {
    /// Two decimal places.
    pub const CENTS: Self = Self(2);

    /// Largest scale the ledger stores; amount columns are `NUMERIC(19,4)`.
    pub const MAX: u32 = 4;

    /// Creates a scale, capped at [`Self::MAX`].
    #[must_use]
    pub const fn new(places: u32) -> Self {
        if places > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(places)
        }
    }

    /// Returns the number of decimal places.
    #[must_use]
    pub const fn places(self) -> u32 {
        self.0
    }

    /// Rounds an amount to the minor unit, midpoint away from zero.
    #[must_use]
    pub fn round(self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.0, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Default for CurrencyScale {
    fn default() -> Self {
        Self::CENTS
    }
}

impl std::fmt::Display for CurrencyScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} dp", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(-10.005), dec!(-10.01))]
    #[case(dec!(0.125), dec!(0.13))]
    #[case(dec!(100), dec!(100))]
    fn test_round_cents(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(CurrencyScale::CENTS.round(input), expected);
    }

    #[test]
    fn test_round_zero_places() {
        let yen = CurrencyScale::new(0);
        assert_eq!(yen.round(dec!(1500.5)), dec!(1501));
        assert_eq!(yen.round(dec!(1500.49)), dec!(1500));
    }

    #[test]
    fn test_scale_is_capped_at_stored_precision() {
        assert_eq!(CurrencyScale::new(40).places(), 4);
        assert_eq!(CurrencyScale::new(6).round(dec!(1.23456789)), dec!(1.2346));
    }

    #[test]
    fn test_default_is_cents() {
        assert_eq!(CurrencyScale::default(), CurrencyScale::CENTS);
        assert_eq!(CurrencyScale::default().to_string(), "2 dp");
    }
}
