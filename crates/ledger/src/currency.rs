use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// ISO-like currency code fixed for a group's lifetime.
///
/// Every expense and settlement in a group is denominated in the group's
/// single currency and the engine never converts. Groups are effectively
/// mono-currency (default `EUR`), but the engine models currency explicitly
/// to keep the data model future-proof.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 EUR`)
/// - minor units (stored integers, e.g. `1050`)
///
/// All supported settlement currencies use 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    ///
    /// Example: EUR uses 2 fraction digits (cents).
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Eur | Currency::Usd => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            other => Err(LedgerError::InvalidAmount(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_display() {
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Eur.code(), "EUR");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Currency::try_from("eur").unwrap(), Currency::Eur);
        assert_eq!(Currency::try_from(" USD ").unwrap(), Currency::Usd);
        assert!(Currency::try_from("XXX").is_err());
        assert!(Currency::try_from("").is_err());
    }
}
