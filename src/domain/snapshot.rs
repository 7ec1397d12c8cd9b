//! Price snapshot type.

use chrono::{DateTime, Utc};

/// One immutable observation of the simulated spot price. Superseded
/// wholesale by the next snapshot, never mutated in place.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    pub change_24h: f64,
    pub change_percent_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub timestamp: DateTime<Utc>,
    pub currency: String,
}
