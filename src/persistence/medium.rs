//! Key-value storage media
//!
//! A medium is anything shaped like the browser's `Storage`: string keys,
//! string values, enumerable keys. `MemoryStorage` backs native builds and
//! tests; the wasm build uses `platform::LocalStorage`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::StorageError;

/// Minimal string key-value medium
pub trait StorageMedium {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value. Fails when the medium refuses the write (quota etc).
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str);

    /// All keys currently present, in no particular order
    fn keys(&self) -> Vec<String>;
}

/// In-memory medium
///
/// Clones share the same underlying map, so a test can keep a handle and
/// inspect what a `VersionedStore` wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
    /// Max total bytes (keys + values); `None` = unlimited
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Medium that rejects writes pushing total size past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: Rc::default(),
            quota: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StorageMedium for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::Write {
                    key: key.to_string(),
                    reason: format!("quota exceeded ({needed} > {quota} bytes)"),
                });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.items.borrow().keys().cloned().collect()
    }
}
