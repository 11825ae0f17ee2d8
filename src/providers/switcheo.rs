use super::util::with_retry;
use crate::core::price::{PriceObservation, PriceSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

const PRICES_PATH: &str = "prices.json";

#[derive(Debug, Deserialize)]
struct PriceRecord {
    currency: String,
    date: String,
    price: f64,
}

/// Fetches the latest token prices published as a flat JSON array.
pub struct SwitcheoPriceSource {
    base_url: String,
    retries: usize,
    retry_delay_ms: u64,
}

impl SwitcheoPriceSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            retries: 3,
            retry_delay_ms: 500,
        }
    }

    pub fn with_retries(self, retries: usize, retry_delay_ms: u64) -> Self {
        Self {
            retries,
            retry_delay_ms,
            ..self
        }
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, PRICES_PATH)
    }
}

/// Turns the raw feed entries into observations. Entries that do not have the
/// record shape, or whose values fail validation, are skipped.
fn into_observations(entries: Vec<serde_json::Value>) -> Vec<PriceObservation> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let record = match serde_json::from_value::<PriceRecord>(entry) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed price record");
                    return None;
                }
            };
            match PriceObservation::parse(&record.currency, &record.date, record.price) {
                Ok(obs) => Some(obs),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid price record");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl PriceSource for SwitcheoPriceSource {
    #[instrument(name = "SwitcheoPriceFetch", skip(self), fields(url = %self.url()))]
    async fn fetch_prices(&self) -> Result<Vec<PriceObservation>> {
        let url = self.url();
        let client = reqwest::Client::builder()
            .user_agent("tokenswap/0.1")
            .build()?;

        let response = with_retry(
            || async { client.get(&url).send().await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .context("Price request failed")?;

        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse price response"
                );
                return Err(e).context("Failed to parse price response");
            }
        };

        let total = entries.len();
        let observations = into_observations(entries);
        debug!(
            received = total,
            accepted = observations.len(),
            "Fetched price observations"
        );
        Ok(observations)
    }
}
