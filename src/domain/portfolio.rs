//! Portfolio holdings and valuation.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::calc::{self, round2, QuantityUnit, ValuationResult};
use crate::domain::snapshot::PriceSnapshot;
use crate::ports::store_port::StorePort;

pub const POSITIONS_NAMESPACE: &str = "positions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Physical,
    Etf,
    Future,
}

/// A recorded holding. Immutable once added; the only mutation is removal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub id: String,
    pub instrument_type: InstrumentType,
    pub quantity: f64,
    pub unit: QuantityUnit,
    pub avg_cost_basis: f64,
    pub purchase_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Position {
    /// Build a new holding with a generated id and the current time as
    /// purchase date.
    pub fn new(
        instrument_type: InstrumentType,
        quantity: f64,
        unit: QuantityUnit,
        avg_cost_basis: f64,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: crate::domain::ident::generate_id(),
            instrument_type,
            quantity,
            unit,
            avg_cost_basis,
            purchase_date: Utc::now(),
            notes,
        }
    }
}

/// Valuation of one position against a snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PositionValuation {
    pub position_id: String,
    pub valuation: ValuationResult,
}

/// Element-wise sum across all positions. The percentage is recomputed
/// from the summed figures, not averaged per position.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PortfolioTotals {
    pub total_value: f64,
    pub cost_basis: f64,
    pub unrealized_pl: f64,
    pub unrealized_pl_percent: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PortfolioValuation {
    pub positions: Vec<PositionValuation>,
    pub totals: PortfolioTotals,
}

/// Owns the position collection and its durable mirror.
#[derive(Debug, Default)]
pub struct PortfolioLedger {
    positions: Vec<Position>,
}

impl PortfolioLedger {
    /// Restore from the durable store; fail-soft to an empty ledger.
    pub fn load(store: &dyn StorePort) -> Self {
        let positions = match store.load(POSITIONS_NAMESPACE) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(positions) => positions,
                Err(e) => {
                    warn!(namespace = POSITIONS_NAMESPACE, error = %e, "undecodable position payload, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(namespace = POSITIONS_NAMESPACE, error = %e, "failed to load positions, starting empty");
                Vec::new()
            }
        };
        Self { positions }
    }

    /// Positions in insertion order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn add(&mut self, position: Position, store: &dyn StorePort) {
        self.positions.push(position);
        self.persist(store);
    }

    /// Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &str, store: &dyn StorePort) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.id != id);
        if self.positions.len() == before {
            return false;
        }
        self.persist(store);
        true
    }

    /// Value every position against the snapshot price. Computed fresh on
    /// every call; pure in (positions, snapshot.price). Positions that fail
    /// input validation are skipped rather than poisoning the totals.
    pub fn valuate(&self, snapshot: &PriceSnapshot) -> PortfolioValuation {
        let mut positions = Vec::with_capacity(self.positions.len());
        let mut total_value = 0.0;
        let mut cost_basis = 0.0;
        let mut unrealized_pl = 0.0;

        for position in &self.positions {
            match calc::position_pl(
                position.quantity,
                position.avg_cost_basis,
                snapshot.price,
                position.unit,
            ) {
                Ok(valuation) => {
                    total_value += valuation.total_value;
                    cost_basis += valuation.cost_basis;
                    unrealized_pl += valuation.unrealized_pl;
                    positions.push(PositionValuation {
                        position_id: position.id.clone(),
                        valuation,
                    });
                }
                Err(e) => {
                    warn!(position_id = %position.id, error = %e, "skipping unvaluable position");
                }
            }
        }

        let unrealized_pl_percent = if cost_basis == 0.0 {
            0.0
        } else {
            round2(unrealized_pl / cost_basis * 100.0)
        };

        PortfolioValuation {
            positions,
            totals: PortfolioTotals {
                total_value: round2(total_value),
                cost_basis: round2(cost_basis),
                unrealized_pl: round2(unrealized_pl),
                unrealized_pl_percent,
            },
        }
    }

    fn persist(&self, store: &dyn StorePort) {
        let value = match serde_json::to_value(&self.positions) {
            Ok(value) => value,
            Err(e) => {
                warn!(namespace = POSITIONS_NAMESPACE, error = %e, "failed to serialize positions");
                return;
            }
        };
        if let Err(e) = store.save(POSITIONS_NAMESPACE, &value) {
            warn!(namespace = POSITIONS_NAMESPACE, error = %e, "failed to persist positions, keeping in-memory state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::GoldwatchError;
    use approx::assert_abs_diff_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        data: RefCell<HashMap<String, serde_json::Value>>,
        fail: bool,
    }

    impl StorePort for MemStore {
        fn save(&self, namespace: &str, value: &serde_json::Value) -> Result<(), GoldwatchError> {
            if self.fail {
                return Err(GoldwatchError::Persistence {
                    namespace: namespace.into(),
                    reason: "injected failure".into(),
                });
            }
            self.data
                .borrow_mut()
                .insert(namespace.to_string(), value.clone());
            Ok(())
        }

        fn load(&self, namespace: &str) -> Result<Option<serde_json::Value>, GoldwatchError> {
            if self.fail {
                return Err(GoldwatchError::Persistence {
                    namespace: namespace.into(),
                    reason: "injected failure".into(),
                });
            }
            Ok(self.data.borrow().get(namespace).cloned())
        }
    }

    fn sample_position(id: &str, quantity: f64, unit: QuantityUnit, avg_cost: f64) -> Position {
        Position {
            id: id.to_string(),
            instrument_type: InstrumentType::Physical,
            quantity,
            unit,
            avg_cost_basis: avg_cost,
            purchase_date: Utc::now(),
            notes: None,
        }
    }

    fn snapshot_at(price: f64) -> PriceSnapshot {
        PriceSnapshot {
            price,
            change_24h: 0.0,
            change_percent_24h: 0.0,
            high_24h: price + 5.0,
            low_24h: price - 5.0,
            timestamp: Utc::now(),
            currency: "USD".into(),
        }
    }

    #[test]
    fn add_and_remove_persist() {
        let store = MemStore::default();
        let mut ledger = PortfolioLedger::default();
        ledger.add(sample_position("p1", 2.0, QuantityUnit::TroyOunce, 1900.0), &store);
        ledger.add(sample_position("p2", 10.0, QuantityUnit::Share, 50.0), &store);

        let restored = PortfolioLedger::load(&store);
        assert_eq!(restored.positions().len(), 2);
        assert_eq!(restored.positions()[0].id, "p1");

        assert!(ledger.remove("p1", &store));
        assert!(!ledger.remove("p1", &store));
        let restored = PortfolioLedger::load(&store);
        assert_eq!(restored.positions().len(), 1);
        assert_eq!(restored.positions()[0].id, "p2");
    }

    #[test]
    fn unit_wire_format_matches_original() {
        let position = sample_position("p1", 2.0, QuantityUnit::Gram, 60.0);
        let json = serde_json::to_value(&position).unwrap();
        assert_eq!(json["unit"], "gram");
        assert_eq!(json["instrument_type"], "physical");
    }

    #[test]
    fn valuate_single_position() {
        let store = MemStore::default();
        let mut ledger = PortfolioLedger::default();
        ledger.add(sample_position("p1", 2.0, QuantityUnit::TroyOunce, 1900.0), &store);

        let valuation = ledger.valuate(&snapshot_at(2050.0));
        assert_eq!(valuation.positions.len(), 1);
        assert_abs_diff_eq!(valuation.totals.total_value, 4100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.cost_basis, 3800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.unrealized_pl, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.unrealized_pl_percent, 7.89, epsilon = 1e-9);
    }

    #[test]
    fn totals_sum_element_wise_and_recompute_percent() {
        let store = MemStore::default();
        let mut ledger = PortfolioLedger::default();
        // +7.89% on the ounces, -50% on the shares; the blended percent
        // must come from the summed figures.
        ledger.add(sample_position("oz", 2.0, QuantityUnit::TroyOunce, 1900.0), &store);
        ledger.add(sample_position("sh", 10.0, QuantityUnit::Share, 4100.0), &store);

        let valuation = ledger.valuate(&snapshot_at(2050.0));
        assert_abs_diff_eq!(valuation.totals.total_value, 4100.0 + 20500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.cost_basis, 3800.0 + 41000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.unrealized_pl, 300.0 - 20500.0, epsilon = 1e-9);
        let expected_percent: f64 = (300.0 - 20500.0) / (3800.0 + 41000.0) * 100.0;
        assert_abs_diff_eq!(
            valuation.totals.unrealized_pl_percent,
            (expected_percent * 100.0).round() / 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn empty_ledger_valuates_to_zero() {
        let ledger = PortfolioLedger::default();
        let valuation = ledger.valuate(&snapshot_at(2050.0));
        assert!(valuation.positions.is_empty());
        assert_abs_diff_eq!(valuation.totals.total_value, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(valuation.totals.unrealized_pl_percent, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn load_fails_soft_to_empty() {
        let store = MemStore {
            fail: true,
            ..Default::default()
        };
        let ledger = PortfolioLedger::load(&store);
        assert!(ledger.positions().is_empty());
    }

    #[test]
    fn mutations_survive_store_failure() {
        let store = MemStore {
            fail: true,
            ..Default::default()
        };
        let mut ledger = PortfolioLedger::default();
        ledger.add(sample_position("p1", 1.0, QuantityUnit::TroyOunce, 2000.0), &store);
        assert_eq!(ledger.positions().len(), 1);
    }
}
