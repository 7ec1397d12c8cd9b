//! Synthetic price feed.
//!
//! Each snapshot is drawn independently around a fixed base price; there is
//! no persisted walk state between calls. `high_24h` and `low_24h` are drawn
//! independently of the price offsets, so `low <= price <= high` is not
//! guaranteed — the quirk of the application this feed emulates is kept
//! as-is rather than papered over.

use chrono::Utc;
use rand::Rng;

use crate::domain::calc::round2;
use crate::domain::snapshot::PriceSnapshot;

pub const DEFAULT_BASE_PRICE: f64 = 2050.0;
pub const DEFAULT_VOLATILITY: f64 = 15.0;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone)]
pub struct PriceFeedSimulator {
    base_price: f64,
    volatility: f64,
    currency: String,
}

impl PriceFeedSimulator {
    pub fn new(base_price: f64, volatility: f64, currency: &str) -> Self {
        Self {
            base_price,
            volatility,
            currency: currency.to_string(),
        }
    }

    /// Draw a snapshot using the thread-local RNG.
    pub fn next_snapshot(&self) -> PriceSnapshot {
        self.next_snapshot_with(&mut rand::thread_rng())
    }

    /// Draw a snapshot from the supplied RNG. Seedable entry point for tests.
    pub fn next_snapshot_with<R: Rng>(&self, rng: &mut R) -> PriceSnapshot {
        let price = self.base_price + (rng.gen_range(0.0..1.0) - 0.5) * self.volatility;
        let change_24h = (rng.gen_range(0.0..1.0) - 0.5) * 30.0;
        let change_percent_24h = change_24h / price * 100.0;
        let high_24h = price + rng.gen_range(0.0..1.0) * 10.0;
        let low_24h = price - rng.gen_range(0.0..1.0) * 10.0;

        PriceSnapshot {
            price: round2(price),
            change_24h: round2(change_24h),
            change_percent_24h: round2(change_percent_24h),
            high_24h: round2(high_24h),
            low_24h: round2(low_24h),
            timestamp: Utc::now(),
            currency: self.currency.clone(),
        }
    }
}

impl Default for PriceFeedSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PRICE, DEFAULT_VOLATILITY, DEFAULT_CURRENCY)
    }
}
