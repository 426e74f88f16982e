use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer minor units**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// split shares, balances, transfers) to avoid floating-point drift across
/// repeated aggregation.
///
/// The value is signed:
/// - positive = the member is owed money
/// - negative = the member owes money
///
/// All supported settlement currencies use two minor-unit digits (see
/// `Currency::minor_units`), so `Display` and parsing work on two fraction
/// digits. No currency symbol is printed; symbol and locale rendering belong
/// to the caller's formatting layer.
///
/// # Examples
///
/// ```rust
/// use ledger::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.amount_minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use ledger::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().amount_minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().amount_minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn amount_minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Money {
        Money(self.0.abs())
    }

    /// Sign of the amount: -1, 0 or 1.
    #[must_use]
    pub const fn signum(self) -> i64 {
        self.0.signum()
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Converts a major-unit value that was computed in binary floating
    /// point.
    ///
    /// Upstream stores record amounts produced by float arithmetic; this is
    /// the single sanctioned entry point for such values. The value is
    /// rounded **half-away-from-zero** to the minor unit. Non-finite or
    /// out-of-range input fails with [`LedgerError::InvalidAmount`].
    pub fn from_major_f64(value: f64) -> Result<Money, LedgerError> {
        if !value.is_finite() {
            return Err(LedgerError::InvalidAmount(
                "amount must be finite".to_string(),
            ));
        }
        // f64::round rounds half away from zero, matching the ledger's
        // rounding contract.
        let minor = (value * 100.0).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return Err(LedgerError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Money(minor as i64))
    }

    /// Splits the amount into `count` shares that sum back exactly.
    ///
    /// The division remainder is distributed one minor unit at a time
    /// starting from the first share, so no share differs from another by
    /// more than one minor unit.
    #[must_use]
    pub fn split_even(self, count: usize) -> Vec<Money> {
        if count == 0 {
            return Vec::new();
        }

        let shares = count as i64;
        let base = self.0 / shares;
        let remainder = (self.0 % shares).unsigned_abs() as usize;
        let step = self.0.signum();

        (0..count)
            .map(|idx| {
                let mut share = base;
                if idx < remainder {
                    share += step;
                }
                Money(share)
            })
            .collect()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let fraction = abs % 100;
        write!(f, "{sign}{units}.{fraction:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::InvalidAmount("empty amount".to_string());
        let invalid = || LedgerError::InvalidAmount("invalid amount".to_string());
        let overflow = || LedgerError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts
            .next()
            .ok_or_else(invalid)?;
        let fraction_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str
            .parse()
            .map_err(|_| invalid())?;

        let fraction: i64 = match fraction_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => {
                        frac.parse::<i64>()
                            .map_err(|_| invalid())?
                            * 10
                    }
                    2 => frac
                        .parse::<i64>()
                        .map_err(|_| invalid())?,
                    _ => return Err(LedgerError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(fraction))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().amount_minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().amount_minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().amount_minor(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().amount_minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().amount_minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().amount_minor(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn from_major_f64_rounds_half_away_from_zero() {
        assert_eq!(Money::from_major_f64(12.34).unwrap(), Money::new(1234));
        // 0.125 is exactly representable, so the midpoint is a real midpoint.
        assert_eq!(Money::from_major_f64(0.125).unwrap(), Money::new(13));
        assert_eq!(Money::from_major_f64(-0.125).unwrap(), Money::new(-13));
    }

    #[test]
    fn from_major_f64_rejects_non_finite() {
        assert!(Money::from_major_f64(f64::NAN).is_err());
        assert!(Money::from_major_f64(f64::INFINITY).is_err());
        assert!(Money::from_major_f64(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn split_even_distributes_remainder_first() {
        assert_eq!(
            Money::new(100_00).split_even(3),
            vec![Money::new(33_34), Money::new(33_33), Money::new(33_33)]
        );
        assert_eq!(
            Money::new(80_00).split_even(3),
            vec![Money::new(26_67), Money::new(26_67), Money::new(26_66)]
        );
        assert_eq!(
            Money::new(-100_00).split_even(3),
            vec![Money::new(-33_34), Money::new(-33_33), Money::new(-33_33)]
        );
    }

    #[test]
    fn split_even_shares_sum_back_exactly() {
        for count in 1..=7 {
            let shares = Money::new(100_01).split_even(count);
            assert_eq!(shares.len(), count);
            let total: Money = shares.into_iter().sum();
            assert_eq!(total, Money::new(100_01));
        }
    }
}
