//! Display currencies and amount formatting.
//!
//! Switching currency only swaps the symbol used when formatting amounts, the
//! stored amounts are never converted.

use std::{fmt::Display, str::FromStr};

use num_format::{Locale, ToFormattedString};

use crate::Error;

/// The currencies amounts can be displayed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CurrencyCode {
    /// Indian rupee.
    #[default]
    INR,
    /// US dollar.
    USD,
    /// Euro.
    EUR,
    /// British pound.
    GBP,
    /// Japanese yen.
    JPY,
}

impl CurrencyCode {
    /// All supported currencies.
    pub const ALL: [CurrencyCode; 5] = [
        CurrencyCode::INR,
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::GBP,
        CurrencyCode::JPY,
    ];

    /// The ISO 4217 code, e.g. "USD".
    pub fn code(self) -> &'static str {
        match self {
            CurrencyCode::INR => "INR",
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::JPY => "JPY",
        }
    }

    /// The symbol placed in front of formatted amounts, e.g. "$".
    pub fn symbol(self) -> &'static str {
        match self {
            CurrencyCode::INR => "₹",
            CurrencyCode::USD => "$",
            CurrencyCode::EUR => "€",
            CurrencyCode::GBP => "£",
            CurrencyCode::JPY => "¥",
        }
    }

    fn locale(self) -> Locale {
        match self {
            CurrencyCode::INR => Locale::en_IN,
            _ => Locale::en,
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();

        CurrencyCode::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::UnknownCurrency(code.to_owned()))
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Format `number` with the symbol of `currency` and two decimal places.
///
/// Negative numbers put the sign before the symbol, e.g. "-$3.50". Rupees use
/// Indian digit grouping ("₹1,00,000.00"), other currencies group by thousands.
pub fn format_currency(number: f64, currency: CurrencyCode) -> String {
    let cents = (number.abs() * 100.0).round() as u64;
    let sign = if number < 0.0 && cents > 0 { "-" } else { "" };
    let whole = (cents / 100).to_formatted_string(&currency.locale());
    let fraction = cents % 100;

    format!("{sign}{}{whole}.{fraction:02}", currency.symbol())
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        currency::{CurrencyCode, format_currency},
    };

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("usd".parse::<CurrencyCode>(), Ok(CurrencyCode::USD));
        assert_eq!(" EUR ".parse::<CurrencyCode>(), Ok(CurrencyCode::EUR));
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert_eq!(
            "AUD".parse::<CurrencyCode>(),
            Err(Error::UnknownCurrency("AUD".to_owned()))
        );
    }

    #[test]
    fn default_is_rupee() {
        assert_eq!(CurrencyCode::default().symbol(), "₹");
    }

    #[test]
    fn formats_with_symbol_and_two_decimals() {
        assert_eq!(format_currency(3.5, CurrencyCode::USD), "$3.50");
        assert_eq!(format_currency(12.34, CurrencyCode::GBP), "£12.34");
        assert_eq!(format_currency(5.0, CurrencyCode::JPY), "¥5.00");
    }

    #[test]
    fn formats_negative_numbers() {
        assert_eq!(format_currency(-3.5, CurrencyCode::EUR), "-€3.50");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0, CurrencyCode::USD), "$0.00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_currency(1005.0, CurrencyCode::USD), "$1,005.00");
        assert_eq!(format_currency(1234567.891, CurrencyCode::EUR), "€1,234,567.89");
    }

    #[test]
    fn rupees_use_indian_grouping() {
        assert_eq!(format_currency(100000.0, CurrencyCode::INR), "₹1,00,000.00");
    }
}
