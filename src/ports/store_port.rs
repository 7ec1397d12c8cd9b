//! Durable key/value store port trait.

use crate::domain::error::GoldwatchError;

/// Namespaced key/value store with JSON-serializable values. The engines
/// write whole collections atomically per namespace and treat failures as
/// soft: a failed read falls back to the supplied default, a failed write
/// is logged and the in-memory state stands.
pub trait StorePort {
    fn save(&self, namespace: &str, value: &serde_json::Value) -> Result<(), GoldwatchError>;

    /// Returns `Ok(None)` when the namespace has never been written.
    fn load(&self, namespace: &str) -> Result<Option<serde_json::Value>, GoldwatchError>;
}
