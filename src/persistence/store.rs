//! Namespaced JSON store with read-repair
//!
//! Every key lives under a fixed prefix. Corrupted documents are deleted on
//! read and replaced by the caller's fallback, so a bad write from an older
//! build never wedges the app.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::StorageError;
use super::medium::StorageMedium;

/// JSON store over an optional storage medium
pub struct VersionedStore {
    medium: Option<Box<dyn StorageMedium>>,
    prefix: String,
}

impl VersionedStore {
    /// Store backed by `medium`, keys namespaced under `prefix`
    pub fn new(medium: impl StorageMedium + 'static, prefix: impl Into<String>) -> Self {
        Self {
            medium: Some(Box::new(medium)),
            prefix: prefix.into(),
        }
    }

    /// Store with no medium at all (non-browser context). Reads return the
    /// fallback and writes are dropped.
    pub fn unavailable(prefix: impl Into<String>) -> Self {
        Self {
            medium: None,
            prefix: prefix.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.medium.is_some()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Read a JSON document, falling back on absence, unavailability or
    /// corruption. Corrupted values are removed.
    pub fn read_json(&self, key: &str, fallback: Value) -> Value {
        let Some(medium) = &self.medium else {
            return fallback;
        };
        let full_key = self.full_key(key);
        let Some(raw) = medium.get_item(&full_key) else {
            return fallback;
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding corrupted value at {full_key}: {e}");
                medium.remove_item(&full_key);
                fallback
            }
        }
    }

    /// Typed read. Well-formed JSON of the wrong shape yields `None` and is
    /// left in place.
    pub fn read_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.read_json(key, Value::Null);
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Ignoring {} with unexpected shape: {e}", self.full_key(key));
                None
            }
        }
    }

    /// Serialize and store. Silently does nothing without a medium; medium
    /// write failures propagate.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let Some(medium) = &self.medium else {
            return Ok(());
        };
        let full_key = self.full_key(key);
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: full_key.clone(),
            source,
        })?;
        medium.set_item(&full_key, &json)?;
        log::debug!("Wrote {full_key} ({} bytes)", json.len());
        Ok(())
    }

    pub fn remove_key(&self, key: &str) {
        if let Some(medium) = &self.medium {
            medium.remove_item(&self.full_key(key));
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.medium
            .as_ref()
            .is_some_and(|m| m.get_item(&self.full_key(key)).is_some())
    }

    /// Delete every key under the namespace prefix. Returns how many went.
    pub fn clear_versioned(&self) -> usize {
        let Some(medium) = &self.medium else {
            return 0;
        };
        let doomed: Vec<String> = medium
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&self.prefix))
            .collect();
        for key in &doomed {
            medium.remove_item(key);
        }
        log::info!("Cleared {} stored keys under {}", doomed.len(), self.prefix);
        doomed.len()
    }
}
