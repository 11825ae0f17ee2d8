//! In-memory table of price observations, built once per run.

use crate::core::price::PriceObservation;
use std::collections::HashMap;
use tracing::debug;

/// Read-only snapshot of every observation fetched from the price source.
///
/// A store is never mutated after [`PriceStore::load`]; refreshing prices means
/// building a new store and replacing the old value.
#[derive(Debug, Default, Clone)]
pub struct PriceStore {
    observations: Vec<PriceObservation>,
    // currency -> index of its latest observation
    latest: HashMap<String, usize>,
}

impl PriceStore {
    /// Builds a store from `observations`, keeping their order.
    ///
    /// When several observations of a currency share the latest date, the one
    /// appearing last in the sequence wins.
    pub fn load(observations: Vec<PriceObservation>) -> Self {
        let mut latest: HashMap<String, usize> = HashMap::new();
        for (index, obs) in observations.iter().enumerate() {
            match latest.get_mut(obs.currency()) {
                Some(current) => {
                    if observations[*current].date() <= obs.date() {
                        *current = index;
                    }
                }
                None => {
                    latest.insert(obs.currency().to_string(), index);
                }
            }
        }
        debug!(
            observations = observations.len(),
            currencies = latest.len(),
            "Loaded price store"
        );

        Self {
            observations,
            latest,
        }
    }

    pub fn latest(&self, currency: &str) -> Option<&PriceObservation> {
        self.latest
            .get(currency)
            .and_then(|index| self.observations.get(*index))
    }

    /// Price of the most recent observation for `currency`, or `None` when the
    /// store has never seen it.
    pub fn latest_price(&self, currency: &str) -> Option<f64> {
        self.latest(currency).map(PriceObservation::price)
    }

    /// Symbols that have at least one observation, sorted ascending.
    pub fn currencies(&self) -> Vec<&str> {
        let mut currencies: Vec<&str> = self.latest.keys().map(String::as_str).collect();
        currencies.sort_unstable();
        currencies
    }

    /// Maps a user supplied symbol to the spelling the store uses. An exact
    /// match wins; otherwise the first currency equal ignoring ASCII case.
    pub fn resolve(&self, symbol: &str) -> Option<&str> {
        let symbol = symbol.trim();
        if let Some((currency, _)) = self.latest.get_key_value(symbol) {
            return Some(currency.as_str());
        }
        self.currencies()
            .into_iter()
            .find(|currency| currency.eq_ignore_ascii_case(symbol))
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.latest.contains_key(currency)
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
