//! Price observations and the source abstraction that produces them

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ObservationError {
    #[error("Missing currency symbol")]
    MissingCurrency,
    #[error("Invalid price {price} for {currency}")]
    InvalidPrice { currency: String, price: f64 },
    #[error("Invalid date '{date}' for {currency}")]
    InvalidDate { currency: String, date: String },
}

/// A single USD price of a currency at a point in time.
///
/// Only constructed through [`PriceObservation::new`] or
/// [`PriceObservation::parse`], so every observation held by the store has a
/// finite, strictly positive price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    currency: String,
    date: DateTime<Utc>,
    price: f64,
}

impl PriceObservation {
    pub fn new(
        currency: &str,
        date: DateTime<Utc>,
        price: f64,
    ) -> Result<Self, ObservationError> {
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(ObservationError::MissingCurrency);
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(ObservationError::InvalidPrice {
                currency: currency.to_string(),
                price,
            });
        }

        Ok(Self {
            currency: currency.to_string(),
            date,
            price,
        })
    }

    /// Builds an observation from its wire form, parsing `date` as RFC 3339,
    /// a naive date-time or a plain date. Naive values are read as UTC.
    pub fn parse(currency: &str, date: &str, price: f64) -> Result<Self, ObservationError> {
        let parsed = parse_date(date).ok_or_else(|| ObservationError::InvalidDate {
            currency: currency.trim().to_string(),
            date: date.to_string(),
        })?;
        Self::new(currency, parsed, price)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self) -> Result<Vec<PriceObservation>>;
}
