use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_PRICES_URL: &str = "https://interview.switcheo.com";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PriceApiConfig {
    pub base_url: String,
}

impl Default for PriceApiConfig {
    fn default() -> Self {
        PriceApiConfig {
            base_url: DEFAULT_PRICES_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub prices: PriceApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    pub from_currency: String,
    pub to_currency: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from_currency: "ETH".to_string(),
            to_currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SwapConfig {
    /// Time the simulated swap takes to "execute".
    pub delay_ms: u64,
    /// How long a success or error message stays visible.
    pub status_timeout_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        SwapConfig {
            delay_ms: 1500,
            status_timeout_ms: 3000,
        }
    }
}

impl SwapConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub swap: SwapConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "tokenswap", "tokenswap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
