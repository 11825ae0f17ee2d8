pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::swap::{SimulatedExecutor, SwapForm};
use crate::core::{PriceSource, PriceStore};
use anyhow::Result;
use tracing::{debug, error, info};

pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch prices. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Prices,
    Quote {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Rate {
        from: Option<String>,
        to: Option<String>,
    },
    Swap {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive,
}

/// Fetches prices once and builds the store for this run.
///
/// A failed fetch is reported to the user and leaves the store empty, so
/// every later lookup simply finds no price.
pub async fn load_prices(source: &(dyn PriceSource + Send + Sync)) -> PriceStore {
    match source.fetch_prices().await {
        Ok(observations) => PriceStore::load(observations),
        Err(e) => {
            error!(error = ?e, "Price fetch failed");
            eprintln!(
                "{}",
                cli::ui::style_text(FETCH_FAILURE_MESSAGE, cli::ui::StyleType::Error)
            );
            PriceStore::default()
        }
    }
}

/// Picks the pair for a one-shot command, falling back to the configured
/// defaults. Symbols the store knows are spelled the way the store spells them.
fn resolve_pair(
    config: &AppConfig,
    store: &PriceStore,
    from: Option<String>,
    to: Option<String>,
) -> (String, String) {
    let resolve = |symbol: Option<String>, default: &str| {
        let symbol = symbol.unwrap_or_else(|| default.to_string());
        store
            .resolve(&symbol)
            .map(str::to_string)
            .unwrap_or(symbol)
    };
    (
        resolve(from, &config.defaults.from_currency),
        resolve(to, &config.defaults.to_currency),
    )
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("tokenswap starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let source = providers::SwitcheoPriceSource::new(&config.providers.prices.base_url);
    let store = load_prices(&source).await;
    let executor = SimulatedExecutor::new(config.swap.delay());

    match command {
        AppCommand::Prices => {
            cli::prices::run(&store);
            Ok(())
        }
        AppCommand::Quote { amount, from, to } => {
            let (from, to) = resolve_pair(&config, &store, from, to);
            cli::quote::run_quote(&store, &amount, &from, &to);
            Ok(())
        }
        AppCommand::Rate { from, to } => {
            let (from, to) = resolve_pair(&config, &store, from, to);
            cli::quote::run_rate(&store, &from, &to);
            Ok(())
        }
        AppCommand::Swap { amount, from, to } => {
            let (from, to) = resolve_pair(&config, &store, from, to);
            cli::swap::run(&store, &executor, &amount, &from, &to).await
        }
        AppCommand::Interactive => {
            let form = SwapForm::new(
                &config.defaults.from_currency,
                &config.defaults.to_currency,
            );
            cli::interactive::run(&store, &executor, form, config.swap.status_timeout()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriceObservation;
    use anyhow::anyhow;
    use async_trait::async_trait;

    struct StaticSource(Option<Vec<PriceObservation>>);

    #[async_trait]
    impl PriceSource for StaticSource {
        async fn fetch_prices(&self) -> Result<Vec<PriceObservation>> {
            self.0.clone().ok_or_else(|| anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_load_prices() {
        let source = StaticSource(Some(vec![
            PriceObservation::parse("ETH", "2024-01-01", 2000.0).unwrap(),
        ]));
        let store = load_prices(&source).await;
        assert_eq!(store.latest_price("ETH"), Some(2000.0));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_empty() {
        let store = load_prices(&StaticSource(None)).await;
        assert!(store.is_empty());
        assert_eq!(store.latest_price("ETH"), None);
    }

    #[test]
    fn test_resolve_pair() {
        let config = AppConfig::default();
        let store = PriceStore::load(vec![
            PriceObservation::parse("bNEO", "2023-08-29T07:10:50.000Z", 7.5).unwrap(),
            PriceObservation::parse("ATOM", "2023-08-29T07:10:50.000Z", 8.0).unwrap(),
        ]);
        assert_eq!(
            resolve_pair(&config, &store, None, None),
            ("ETH".to_string(), "USD".to_string())
        );
        assert_eq!(
            resolve_pair(&config, &store, Some("atom".to_string()), None),
            ("ATOM".to_string(), "USD".to_string())
        );
        assert_eq!(
            resolve_pair(&config, &store, Some("bNEO".to_string()), Some("btc".to_string())),
            ("bNEO".to_string(), "btc".to_string())
        );
    }
}
