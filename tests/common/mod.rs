#![allow(dead_code)]

use chrono::Utc;
use goldwatch::domain::error::GoldwatchError;
use goldwatch::domain::feed::PriceFeedSimulator;
use goldwatch::domain::snapshot::PriceSnapshot;
use goldwatch::ports::notify_port::NotifyPort;
use goldwatch::ports::store_port::StorePort;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory store with a shared backing map, so a test can hold a handle
/// while the store itself is boxed into an `AppStore`, and with injectable
/// failure for fail-soft coverage.
#[derive(Default, Clone)]
pub struct MemoryStore {
    pub data: Rc<RefCell<HashMap<String, serde_json::Value>>>,
    pub fail: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn namespace(&self, namespace: &str) -> Option<serde_json::Value> {
        self.data.borrow().get(namespace).cloned()
    }
}

impl StorePort for MemoryStore {
    fn save(&self, namespace: &str, value: &serde_json::Value) -> Result<(), GoldwatchError> {
        if self.fail.get() {
            return Err(GoldwatchError::Persistence {
                namespace: namespace.to_string(),
                reason: "injected failure".into(),
            });
        }
        self.data
            .borrow_mut()
            .insert(namespace.to_string(), value.clone());
        Ok(())
    }

    fn load(&self, namespace: &str) -> Result<Option<serde_json::Value>, GoldwatchError> {
        if self.fail.get() {
            return Err(GoldwatchError::Persistence {
                namespace: namespace.to_string(),
                reason: "injected failure".into(),
            });
        }
        Ok(self.data.borrow().get(namespace).cloned())
    }
}

/// Notifier that records every delivery through a shared handle.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Rc<RefCell<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.messages.borrow().len()
    }
}

impl NotifyPort for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.messages
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
    }
}

/// Feed pinned to an exact price (zero volatility).
pub fn pinned_feed(price: f64) -> PriceFeedSimulator {
    PriceFeedSimulator::new(price, 0.0, "USD")
}

pub fn snapshot_at(price: f64) -> PriceSnapshot {
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
