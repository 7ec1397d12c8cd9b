//! Price alerts: lifecycle and evaluation.
//!
//! An alert is created active and untriggered. The first snapshot that
//! satisfies its condition while it is active moves it to the triggered
//! state, which is terminal: toggling a triggered alert is a no-op, and
//! only deletion removes it. Every mutating operation persists the full
//! collection before returning.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::calc::should_trigger_alert;
use crate::domain::error::GoldwatchError;
use crate::domain::format::format_currency;
use crate::domain::ident::generate_id;
use crate::domain::snapshot::PriceSnapshot;
use crate::ports::notify_port::NotifyPort;
use crate::ports::store_port::StorePort;

pub const ALERTS_NAMESPACE: &str = "alerts";

/// Comparison direction of an alert, serialized in the original wire
/// format (`">"` / `"<"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AlertCondition {
    #[serde(rename = ">")]
    Above,
    #[serde(rename = "<")]
    Below,
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertCondition::Above => write!(f, ">"),
            AlertCondition::Below => write!(f, "<"),
        }
    }
}

impl std::str::FromStr for AlertCondition {
    type Err = GoldwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" | "above" | "gt" => Ok(AlertCondition::Above),
            "<" | "below" | "lt" => Ok(AlertCondition::Below),
            other => Err(GoldwatchError::invalid_input(
                "condition",
                &format!("unknown condition {other:?}, expected \">\" or \"<\""),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Alert {
    pub id: String,
    pub condition: AlertCondition,
    pub target_value: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn is_triggered(&self) -> bool {
        self.triggered_at.is_some()
    }
}

/// Owns the alert collection and its durable mirror.
#[derive(Debug, Default)]
pub struct AlertEngine {
    alerts: Vec<Alert>,
}

impl AlertEngine {
    /// Restore the collection from the durable store. A missing namespace,
    /// read error, or undecodable payload all fall back to an empty
    /// collection.
    pub fn load(store: &dyn StorePort) -> Self {
        let alerts = match store.load(ALERTS_NAMESPACE) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(alerts) => alerts,
                Err(e) => {
                    warn!(namespace = ALERTS_NAMESPACE, error = %e, "undecodable alert payload, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(namespace = ALERTS_NAMESPACE, error = %e, "failed to load alerts, starting empty");
                Vec::new()
            }
        };
        Self { alerts }
    }

    /// Alerts in insertion order.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Create a new active alert and persist the collection.
    pub fn create(
        &mut self,
        condition: AlertCondition,
        target_value: f64,
        store: &dyn StorePort,
    ) -> Alert {
        let alert = Alert {
            id: generate_id(),
            condition,
            target_value,
            active: true,
            created_at: Utc::now(),
            triggered_at: None,
        };
        self.alerts.push(alert.clone());
        self.persist(store);
        alert
    }

    /// Flip `active` on an untriggered alert. Returns `false` without
    /// touching anything when the alert is unknown or already triggered —
    /// a triggered alert is terminal and cannot re-enter eligibility.
    pub fn toggle(&mut self, id: &str, store: &dyn StorePort) -> bool {
        let Some(alert) = self.alerts.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if alert.is_triggered() {
            return false;
        }
        alert.active = !alert.active;
        self.persist(store);
        true
    }

    /// Delete an alert in any state. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &str, store: &dyn StorePort) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        if self.alerts.len() == before {
            return false;
        }
        self.persist(store);
        true
    }

    /// Sweep all alerts against a fresh snapshot, in insertion order.
    /// Each active, untriggered alert whose condition holds transitions to
    /// triggered and produces exactly one notification. Returns the number
    /// of alerts that fired.
    pub fn evaluate(
        &mut self,
        snapshot: &PriceSnapshot,
        store: &dyn StorePort,
        notifier: &dyn NotifyPort,
    ) -> usize {
        let mut fired = 0;
        for alert in &mut self.alerts {
            if !alert.active || alert.is_triggered() {
                continue;
            }
            if should_trigger_alert(snapshot.price, alert.target_value, alert.condition) {
                alert.triggered_at = Some(Utc::now());
                fired += 1;
                info!(
                    alert_id = %alert.id,
                    price = snapshot.price,
                    target = alert.target_value,
                    "alert triggered"
                );
                notifier.notify(
                    "Price Alert Triggered!",
                    &format!(
                        "Gold price {} {}",
                        alert.condition,
                        format_currency(alert.target_value, &snapshot.currency)
                    ),
                );
            }
        }
        if fired > 0 {
            self.persist(store);
        }
        fired
    }

    fn persist(&self, store: &dyn StorePort) {
        let value = match serde_json::to_value(&self.alerts) {
            Ok(value) => value,
            Err(e) => {
                warn!(namespace = ALERTS_NAMESPACE, error = %e, "failed to serialize alerts");
                return;
            }
        };
        if let Err(e) = store.save(ALERTS_NAMESPACE, &value) {
            warn!(namespace = ALERTS_NAMESPACE, error = %e, "failed to persist alerts, keeping in-memory state");
        }
    }
}
