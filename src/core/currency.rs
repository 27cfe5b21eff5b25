use crate::core::rounding::{round_half_away, round_half_up};
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Codes are not validated on construction: the rate table decides what
/// a code is worth, and unknown codes are priced like the base currency.
///
/// # Examples
///
/// ```
/// use roi_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// assert_eq!(usd, CurrencyCode::usd());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The pivot currency all calculations run in.
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from FX rate operations.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("FX rate must be positive, got {rate} for {currency}")]
    InvalidRate { currency: CurrencyCode, rate: Decimal },
}

/// A supported display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    pub symbol: String,
    /// Units of this currency per one unit of the base currency.
    pub rate: Decimal,
}

/// Static FX table pivoting through a single base currency.
///
/// Every rate is quoted against the base, so `convert` divides by the
/// source rate and multiplies by the target rate. Lookups never fail:
/// an unsupported code is treated as rate 1 with the `$` symbol.
///
/// # Examples
///
/// ```
/// use roi_engine::core::currency::{CurrencyCode, FxRateTable};
/// use rust_decimal_macros::dec;
///
/// let rates = FxRateTable::standard();
/// let eur = rates.convert(dec!(1000), &CurrencyCode::usd(), &CurrencyCode::new("EUR"));
/// assert_eq!(eur, dec!(850));
/// assert_eq!(rates.format(dec!(1234.5), &CurrencyCode::new("JPY")), "¥1,235");
/// ```
#[derive(Debug, Clone)]
pub struct FxRateTable {
    /// The pivot currency, always rate 1.
    pub base_currency: CurrencyCode,
    currencies: IndexMap<CurrencyCode, CurrencyInfo>,
}

/// Symbol used for codes the table does not know.
const FALLBACK_SYMBOL: &str = "$";

impl FxRateTable {
    /// Create a table holding only the base currency.
    pub fn new(base_currency: CurrencyCode, symbol: impl Into<String>) -> Self {
        let mut currencies = IndexMap::new();
        currencies.insert(
            base_currency.clone(),
            CurrencyInfo {
                code: base_currency.clone(),
                symbol: symbol.into(),
                rate: Decimal::ONE,
            },
        );
        Self {
            base_currency,
            currencies,
        }
    }

    /// The six reporting currencies with their fixed USD rates.
    pub fn standard() -> Self {
        let mut table = Self::new(CurrencyCode::usd(), "$");
        let fixed = [
            ("EUR", "€", dec!(0.85)),
            ("GBP", "£", dec!(0.73)),
            ("CAD", "C$", dec!(1.25)),
            ("AUD", "A$", dec!(1.35)),
            ("JPY", "¥", dec!(110.0)),
        ];
        for (code, symbol, rate) in fixed {
            table.currencies.insert(
                CurrencyCode::new(code),
                CurrencyInfo {
                    code: CurrencyCode::new(code),
                    symbol: symbol.to_string(),
                    rate,
                },
            );
        }
        table
    }

    /// Add or replace a currency: 1 unit of base = `rate` units of `code`.
    pub fn set_rate(
        &mut self,
        code: CurrencyCode,
        symbol: impl Into<String>,
        rate: Decimal,
    ) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency: code,
                rate,
            });
        }
        self.currencies.insert(
            code.clone(),
            CurrencyInfo {
                code,
                symbol: symbol.into(),
                rate,
            },
        );
        Ok(())
    }

    pub fn is_supported(&self, code: &CurrencyCode) -> bool {
        self.currencies.contains_key(code)
    }

    /// Supported currencies in declaration order.
    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyInfo> {
        self.currencies.values()
    }

    /// Rate against the base currency, falling back to 1.
    pub fn rate(&self, code: &CurrencyCode) -> Decimal {
        match self.currencies.get(code) {
            Some(info) => info.rate,
            None => {
                log::debug!("no FX rate for {code}; pricing it like {}", self.base_currency);
                Decimal::ONE
            }
        }
    }

    pub fn symbol(&self, code: &CurrencyCode) -> &str {
        self.currencies
            .get(code)
            .map(|info| info.symbol.as_str())
            .unwrap_or(FALLBACK_SYMBOL)
    }

    /// Convert an amount between two currencies through the base.
    pub fn convert(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> Decimal {
        if from == to {
            return amount;
        }
        amount / self.rate(from) * self.rate(to)
    }

    /// Render a whole-unit amount with symbol and thousands separators.
    ///
    /// JPY rounds half toward positive infinity; every other currency
    /// rounds half away from zero. No fractional digits are shown.
    pub fn format(&self, amount: Decimal, currency: &CurrencyCode) -> String {
        let rounded = if currency.as_str() == "JPY" {
            round_half_up(amount)
        } else {
            round_half_away(amount)
        };
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{}{}{}",
            self.symbol(currency),
            sign,
            group_thousands(rounded.abs())
        )
    }
}

impl Default for FxRateTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn group_thousands(whole: Decimal) -> String {
    let digits = whole.to_u128().unwrap_or_default().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
