//! Monetary amounts.
//!
//! Amounts are non-negative and held as an integer count of ten-thousandths of
//! the currency unit, so sums and products stay exact. Rounding to cents only
//! happens when an amount is displayed.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Minor units per currency unit.
const SCALE: u64 = 10_000;
/// Minor units per cent.
const CENT: u64 = SCALE / 100;
const MAX_FRACTION_DIGITS: usize = 4;

/// A non-negative amount of money (currency-agnostic).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Build from raw ten-thousandths.
    pub const fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    /// Build from whole cents (saturating on absurd inputs).
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents.saturating_mul(CENT))
    }

    pub const fn minor_units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert a floating point amount (e.g. a JSON number typed into a form).
    ///
    /// The value is rounded to the nearest ten-thousandth.
    pub fn from_f64(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        let scaled = (value * SCALE as f64).round();
        if scaled >= u64::MAX as f64 {
            return Err(DomainError::validation("amount is too large"));
        }
        Ok(Self(scaled as u64))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Round to whole cents, half away from zero.
    pub fn round_to_cents(self) -> Money {
        let whole_cents = self.0 / CENT * CENT;
        if self.0 % CENT >= CENT / 2 {
            Money(whole_cents.saturating_add(CENT))
        } else {
            Money(whole_cents)
        }
    }

    /// Exact decimal rendering: two decimals when the amount is a whole number
    /// of cents, four otherwise.
    pub fn to_decimal_string(self) -> String {
        let whole = self.0 / SCALE;
        let fraction = self.0 % SCALE;
        if fraction % CENT == 0 {
            format!("{whole}.{:02}", fraction / CENT)
        } else {
            format!("{whole}.{fraction:04}")
        }
    }
}

/// Displays the amount rounded to two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.round_to_cents().0 / CENT;
        write!(f, "{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::validation("amount cannot be empty"));
        }
        if s.starts_with('-') {
            return Err(DomainError::validation("amount cannot be negative"));
        }

        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(DomainError::validation(format!("not a decimal amount: {s}")));
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(DomainError::validation(format!(
                "amount has more than {MAX_FRACTION_DIGITS} decimal places: {s}"
            )));
        }

        let too_large = || DomainError::validation(format!("amount is too large: {s}"));
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        let fraction: u64 = if fraction.is_empty() {
            0
        } else {
            let digits: u64 = fraction.parse().map_err(|_| too_large())?;
            digits * 10u64.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32)
        };

        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction))
            .map(Money)
            .ok_or_else(too_large)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match MoneyRepr::deserialize(deserializer)? {
            MoneyRepr::Text(s) => s.parse::<Money>(),
            MoneyRepr::Number(n) => Money::from_f64(n),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_and_fractional_amounts() {
        assert_eq!(money("5"), Money::from_cents(500));
        assert_eq!(money("4.5"), Money::from_cents(450));
        assert_eq!(money("1.50"), Money::from_cents(150));
        assert_eq!(money(".25"), Money::from_cents(25));
        assert_eq!(money("0.1250"), Money::from_minor_units(1250));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for input in ["", "-1.00", "abc", "1.2.3", "1.23456", ".", "+2"] {
            match input.parse::<Money>() {
                Err(DomainError::Validation(_)) => {}
                other => panic!("Expected Validation error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_amounts_beyond_range() {
        assert!("99999999999999999999".parse::<Money>().is_err());
        assert!("18446744073709552".parse::<Money>().is_err());
    }

    #[test]
    fn display_rounds_half_away_from_zero() {
        assert_eq!(Money::from_minor_units(3750).to_string(), "0.38");
        assert_eq!(Money::from_minor_units(3749).to_string(), "0.37");
        assert_eq!(money("400").to_string(), "400.00");
        assert_eq!(money("32.5").to_string(), "32.50");
    }

    #[test]
    fn decimal_string_is_exact() {
        assert_eq!(money("1.5").to_decimal_string(), "1.50");
        assert_eq!(money("0.125").to_decimal_string(), "0.1250");
    }

    #[test]
    fn from_f64_rejects_negative_and_non_finite() {
        assert!(Money::from_f64(-0.01).is_err());
        assert!(Money::from_f64(f64::NAN).is_err());
        assert!(Money::from_f64(f64::INFINITY).is_err());
        assert_eq!(Money::from_f64(1.5).unwrap(), Money::from_cents(150));
        assert_eq!(Money::from_f64(-0.0).unwrap(), Money::ZERO);
    }

    #[test]
    fn checked_arithmetic_detects_overflow() {
        assert_eq!(Money::from_minor_units(u64::MAX).checked_add(Money::from_minor_units(1)), None);
        assert_eq!(Money::from_minor_units(u64::MAX).checked_mul(2), None);
        assert_eq!(money("6.50").checked_mul(5), Some(money("32.50")));
    }

    #[test]
    fn deserializes_from_strings_and_numbers() {
        let from_text: Money = serde_json::from_str("\"4.00\"").unwrap();
        let from_float: Money = serde_json::from_str("4.0").unwrap();
        let from_int: Money = serde_json::from_str("4").unwrap();
        assert_eq!(from_text, Money::from_cents(400));
        assert_eq!(from_float, from_text);
        assert_eq!(from_int, from_text);
        assert!(serde_json::from_str::<Money>("-1").is_err());
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"4.00\"");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Rounding to cents moves an amount by at most half a cent.
            #[test]
            fn rounding_stays_within_half_a_cent(units in 0u64..1_000_000_000_000) {
                let rounded = Money::from_minor_units(units).round_to_cents();
                prop_assert_eq!(rounded.minor_units() % CENT, 0);
                prop_assert!(rounded.minor_units().abs_diff(units) <= CENT / 2);
                prop_assert_eq!(rounded.round_to_cents(), rounded);
            }
        }
    }
}
