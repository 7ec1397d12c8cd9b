//! JSON file key/value store adapter.
//!
//! One pretty-printed JSON file per namespace under a base directory.
//! Writes go through a temp file and rename so readers never observe a
//! partially written namespace.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::GoldwatchError;
use crate::ports::store_port::StorePort;

pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.base_dir.join(format!("{namespace}.json"))
    }
}

impl StorePort for JsonFileStore {
    fn save(&self, namespace: &str, value: &serde_json::Value) -> Result<(), GoldwatchError> {
        fs::create_dir_all(&self.base_dir).map_err(|e| GoldwatchError::Persistence {
            namespace: namespace.to_string(),
            reason: format!("failed to create {}: {}", self.base_dir.display(), e),
        })?;

        let content =
            serde_json::to_string_pretty(value).map_err(|e| GoldwatchError::Persistence {
                namespace: namespace.to_string(),
                reason: format!("serialization failed: {e}"),
            })?;

        let path = self.namespace_path(namespace);
        let tmp_path = self.base_dir.join(format!("{namespace}.json.tmp"));
        fs::write(&tmp_path, content).map_err(|e| GoldwatchError::Persistence {
            namespace: namespace.to_string(),
            reason: format!("failed to write {}: {}", tmp_path.display(), e),
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| GoldwatchError::Persistence {
            namespace: namespace.to_string(),
            reason: format!("failed to rename into {}: {}", path.display(), e),
        })
    }

    fn load(&self, namespace: &str) -> Result<Option<serde_json::Value>, GoldwatchError> {
        let path = self.namespace_path(namespace);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(GoldwatchError::Persistence {
                    namespace: namespace.to_string(),
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| GoldwatchError::Persistence {
                namespace: namespace.to_string(),
                reason: format!("invalid JSON in {}: {}", path.display(), e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_namespace_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("alerts").unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let value = json!([{"id": "1", "target_value": 2500.0}]);

        store.save("alerts", &value).unwrap();
        assert_eq!(store.load("alerts").unwrap(), Some(value));
    }

    #[test]
    fn namespaces_are_independent_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save("alerts", &json!([1])).unwrap();
        store.save("positions", &json!([2])).unwrap();

        assert!(dir.path().join("alerts.json").exists());
        assert!(dir.path().join("positions.json").exists());
        assert_eq!(store.load("alerts").unwrap(), Some(json!([1])));
        assert_eq!(store.load("positions").unwrap(), Some(json!([2])));
    }

    #[test]
    fn save_creates_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/nested");
        let store = JsonFileStore::new(&nested);
        store.save("alerts", &json!([])).unwrap();
        assert!(nested.join("alerts.json").exists());
    }

    #[test]
    fn corrupt_file_is_a_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alerts.json"), "not json").unwrap();
        let store = JsonFileStore::new(dir.path());
        let err = store.load("alerts").unwrap_err();
        assert!(matches!(err, GoldwatchError::Persistence { .. }));
    }

    #[test]
    fn overwrite_replaces_whole_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save("positions", &json!([1, 2, 3])).unwrap();
        store.save("positions", &json!([])).unwrap();
        assert_eq!(store.load("positions").unwrap(), Some(json!([])));
    }
}
