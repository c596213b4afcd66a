use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Money is represented as an exact base-10 decimal to avoid floating-point drift.
/// Shares of an equal split keep every digit the division produces; rounding only
/// happens when an amount is rendered for display.
pub type Amount = Decimal;

/// Participants are identified by their group handle (e.g. a chat username).
pub type UserId = String;

/// Balances whose magnitude is below this amount count as settled.
/// One minor unit for two-decimal currencies.
pub const DEFAULT_TOLERANCE: Amount = Decimal::from_parts(1, 0, 0, false, 2);

/// ISO-like currency code, normalised to upper case (e.g. "usd" -> "USD").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format an amount with exactly two decimal places.
/// Midpoints round to even, so 0.125 -> "0.12" and 0.135 -> "0.14".
/// Example: 66.6666 -> "66.67", -33.3333 -> "-33.33", 5 -> "5.00"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        // Avoid rendering "-0.00" for tiny negative residues.
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(50)), "50.00");
        assert_eq!(format_amount(dec!(12.34)), "12.34");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(format_amount(dec!(0.01)), "0.01");
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(-50.00)), "-50.00");
    }

    #[test]
    fn test_format_amount_rounds_thirds() {
        let third = dec!(100) / dec!(3);
        assert_eq!(format_amount(third), "33.33");
        assert_eq!(format_amount(dec!(100) - third), "66.67");
        assert_eq!(format_amount(-third), "-33.33");
    }

    #[test]
    fn test_format_amount_half_even() {
        assert_eq!(format_amount(dec!(0.125)), "0.12");
        assert_eq!(format_amount(dec!(0.135)), "0.14");
    }

    #[test]
    fn test_format_amount_negative_residue() {
        assert_eq!(format_amount(dec!(-0.000000001)), "0.00");
    }

    #[test]
    fn test_format_amount_zero_decimal_currency_still_two_places() {
        // Yen has no minor unit, but rendering is currency-agnostic.
        assert_eq!(format_amount(dec!(1500)), "1500.00");
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(DEFAULT_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_currency_normalised() {
        assert_eq!(Currency::new(" usd "), Currency::new("USD"));
        assert_eq!(Currency::from("sgd").as_str(), "SGD");
        assert_eq!(Currency::from("eur").to_string(), "EUR");
    }

    #[test]
    fn test_currency_deserialize_normalises() {
        let currency: Currency = serde_json::from_str("\"myr\"").unwrap();
        assert_eq!(currency.as_str(), "MYR");
        assert_eq!(serde_json::to_string(&currency).unwrap(), "\"MYR\"");
    }
}
