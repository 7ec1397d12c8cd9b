//! Monitor configuration model and validation.

use std::path::PathBuf;

use crate::domain::error::GoldwatchError;
use crate::domain::feed::{self, PriceFeedSimulator};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_REFRESH_SECS: u64 = 5;
pub const DEFAULT_DATA_DIR: &str = "goldwatch-data";

/// Validated settings for the watch loop and the simulated feed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub base_price: f64,
    pub volatility: f64,
    pub currency: String,
    pub refresh_secs: u64,
    pub data_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_price: feed::DEFAULT_BASE_PRICE,
            volatility: feed::DEFAULT_VOLATILITY,
            currency: feed::DEFAULT_CURRENCY.to_string(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl MonitorConfig {
    /// Read and validate settings from a config source. Missing keys fall
    /// back to defaults; present-but-invalid values are rejected.
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, GoldwatchError> {
        let defaults = Self::default();

        let base_price = config.get_f64("feed", "base_price", defaults.base_price);
        if !base_price.is_finite() || base_price <= 0.0 {
            return Err(GoldwatchError::ConfigInvalid {
                section: "feed".into(),
                key: "base_price".into(),
                reason: "must be a positive number".into(),
            });
        }

        let volatility = config.get_f64("feed", "volatility", defaults.volatility);
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(GoldwatchError::ConfigInvalid {
                section: "feed".into(),
                key: "volatility".into(),
                reason: "must be a non-negative number".into(),
            });
        }

        let currency = config
            .get_string("feed", "currency")
            .unwrap_or(defaults.currency);
        if currency.is_empty() {
            return Err(GoldwatchError::ConfigInvalid {
                section: "feed".into(),
                key: "currency".into(),
                reason: "must not be empty".into(),
            });
        }

        let refresh_secs = config.get_u64("monitor", "refresh_secs", defaults.refresh_secs);
        if refresh_secs == 0 {
            return Err(GoldwatchError::ConfigInvalid {
                section: "monitor".into(),
                key: "refresh_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        let data_dir = config
            .get_string("store", "data_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Ok(Self {
            base_price,
            volatility,
            currency: currency.to_uppercase(),
            refresh_secs,
            data_dir,
        })
    }

    pub fn simulator(&self) -> PriceFeedSimulator {
        PriceFeedSimulator::new(self.base_price, self.volatility, &self.currency)
    }
}
