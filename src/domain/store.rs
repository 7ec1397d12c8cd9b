//! Application state facade.
//!
//! `AppStore` composes the feed simulator, alert engine, and portfolio
//! ledger behind a subscribe/notify contract. It is constructed explicitly
//! with its collaborators injected; there is no global instance. Every
//! mutation synchronously builds a fresh immutable [`AppState`] and hands
//! it to each subscriber.

use crate::domain::alert::{Alert, AlertCondition, AlertEngine};
use crate::domain::feed::PriceFeedSimulator;
use crate::domain::portfolio::{PortfolioLedger, PortfolioValuation, Position};
use crate::domain::snapshot::PriceSnapshot;
use crate::ports::notify_port::NotifyPort;
use crate::ports::store_port::StorePort;

/// Immutable view of the whole application state, rebuilt on every change.
#[derive(Debug, Clone)]
pub struct AppState {
    pub snapshot: PriceSnapshot,
    pub alerts: Vec<Alert>,
    pub positions: Vec<Position>,
    pub valuation: PortfolioValuation,
}

type Subscriber = Box<dyn FnMut(&AppState)>;

pub struct AppStore {
    feed: PriceFeedSimulator,
    store: Box<dyn StorePort>,
    notifier: Box<dyn NotifyPort>,
    snapshot: PriceSnapshot,
    alerts: AlertEngine,
    ledger: PortfolioLedger,
    subscribers: Vec<Subscriber>,
}

impl AppStore {
    /// Build the store: restore collections from the durable store and
    /// draw an initial snapshot. Alerts are not evaluated against the
    /// initial snapshot; evaluation only ever happens in
    /// [`AppStore::refresh_price`].
    pub fn new(
        feed: PriceFeedSimulator,
        store: Box<dyn StorePort>,
        notifier: Box<dyn NotifyPort>,
    ) -> Self {
        let alerts = AlertEngine::load(store.as_ref());
        let ledger = PortfolioLedger::load(store.as_ref());
        let snapshot = feed.next_snapshot();
        Self {
            feed,
            store,
            notifier,
            snapshot,
            alerts,
            ledger,
            subscribers: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &PriceSnapshot {
        &self.snapshot
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.alerts()
    }

    pub fn positions(&self) -> &[Position] {
        self.ledger.positions()
    }

    /// Valuation of the portfolio against the held snapshot, computed
    /// fresh on every call.
    pub fn valuation(&self) -> PortfolioValuation {
        self.ledger.valuate(&self.snapshot)
    }

    pub fn state(&self) -> AppState {
        AppState {
            snapshot: self.snapshot.clone(),
            alerts: self.alerts.alerts().to_vec(),
            positions: self.ledger.positions().to_vec(),
            valuation: self.valuation(),
        }
    }

    /// Register a subscriber. It is called after every subsequent mutation
    /// with the freshly built state.
    pub fn subscribe<F: FnMut(&AppState) + 'static>(&mut self, subscriber: F) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Draw the next snapshot, evaluate alerts against it, and publish.
    /// This is the only path that evaluates alerts. Returns the number of
    /// alerts that fired.
    pub fn refresh_price(&mut self) -> usize {
        self.snapshot = self.feed.next_snapshot();
        let fired = self
            .alerts
            .evaluate(&self.snapshot, self.store.as_ref(), self.notifier.as_ref());
        self.publish();
        fired
    }

    pub fn create_alert(&mut self, condition: AlertCondition, target_value: f64) -> Alert {
        let alert = self.alerts.create(condition, target_value, self.store.as_ref());
        self.publish();
        alert
    }

    pub fn toggle_alert(&mut self, id: &str) -> bool {
        let toggled = self.alerts.toggle(id, self.store.as_ref());
        if toggled {
            self.publish();
        }
        toggled
    }

    pub fn remove_alert(&mut self, id: &str) -> bool {
        let removed = self.alerts.remove(id, self.store.as_ref());
        if removed {
            self.publish();
        }
        removed
    }

    pub fn add_position(&mut self, position: Position) {
        self.ledger.add(position, self.store.as_ref());
        self.publish();
    }

    pub fn remove_position(&mut self, id: &str) -> bool {
        let removed = self.ledger.remove(id, self.store.as_ref());
        if removed {
            self.publish();
        }
        removed
    }

    fn publish(&mut self) {
        let state = self.state();
        for subscriber in &mut self.subscribers {
            subscriber(&state);
        }
    }
}
