//! Cross-rate conversions and display strings computed from a [`PriceStore`].
//!
//! Every function here is pure. A missing price is reported as `None` (or as a
//! zero/unavailable display string) and never as an error.

use crate::core::store::PriceStore;

/// Decimal places used for converted amounts and rates.
pub const DECIMAL_PLACES: usize = 6;
/// Decimal places used for USD values.
pub const USD_DECIMALS: usize = 2;

pub const PRICE_UNAVAILABLE: &str = "Price information unavailable";

const USD_MARKER: &str = "≈ $";

/// An amount of `from_currency` to express in `to_currency`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from_currency: &str, to_currency: &str) -> Self {
        Self {
            amount,
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
        }
    }

    pub fn convert(&self, store: &PriceStore) -> Option<f64> {
        convert(store, self.amount, &self.from_currency, &self.to_currency)
    }
}

/// Amount of `to` worth `amount` of `from`, at full `f64` precision.
///
/// A result that overflows `f64` is treated like a missing price.
pub fn convert(store: &PriceStore, amount: f64, from: &str, to: &str) -> Option<f64> {
    let from_price = store.latest_price(from)?;
    let to_price = store.latest_price(to)?;
    Some(amount * from_price / to_price).filter(|value| value.is_finite())
}

/// Number of `to` units one unit of `from` buys.
pub fn rate(store: &PriceStore, from: &str, to: &str) -> Option<f64> {
    let from_price = store.latest_price(from)?;
    let to_price = store.latest_price(to)?;
    Some(from_price / to_price).filter(|value| value.is_finite())
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.DECIMAL_PLACES$}")
}

/// Formats `amount` of `currency` as an approximate USD value, e.g. `≈ $2200.00`.
///
/// Empty or unparsable amounts, unknown currencies and values too large for
/// `f64` all produce `≈ $0.00`.
pub fn usd_display(store: &PriceStore, amount: &str, currency: &str) -> String {
    let value = parse_amount(amount)
        .zip(store.latest_price(currency))
        .map(|(amount, price)| amount * price)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0);
    format!("{USD_MARKER}{value:.USD_DECIMALS$}")
}

/// Human readable rate such as `1 ETH = 2200.000000 USD`.
pub fn rate_statement(store: &PriceStore, from: &str, to: &str) -> String {
    match rate(store, from, to) {
        Some(r) => format!("1 {from} = {} {to}", format_amount(r)),
        None => PRICE_UNAVAILABLE.to_string(),
    }
}

/// Parses a user supplied amount, rejecting empty, non-numeric and non-finite
/// input.
pub fn parse_amount(amount: &str) -> Option<f64> {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
