//! Synchronous key/value backends under the credential store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gloo_storage::{LocalStorage, Storage};

use crate::console_warn;
use crate::services::errors::{StorageError, StorageResult};

/// Persistent browser-style key/value storage holding string values
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Deleting a missing key is a no-op
    fn delete(&self, key: &str);
}

/// `window.localStorage`, survives page reloads.
///
/// Values are written verbatim through the raw `Storage` handle: tokens are
/// stored as plain strings and the session snapshot as its JSON object text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        LocalStorage::raw().set_item(key, value).map_err(|js| {
            let reason = format!("{:?}", js);
            if reason.contains("QuotaExceeded") {
                StorageError::QuotaExceeded {
                    key: key.to_string(),
                }
            } else {
                StorageError::operation_failed("localStorage.setItem", reason)
            }
        })
    }

    fn delete(&self, key: &str) {
        if let Err(js) = LocalStorage::raw().remove_item(key) {
            console_warn!("localStorage.removeItem({}) failed: {:?}", key, js);
        }
    }
}

/// In-process storage for native targets and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// Browser storage in the browser, memory everywhere else
pub fn default_storage() -> Arc<dyn KeyValueStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(BrowserStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(MemoryStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip_and_delete() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").is_none());

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("v"));

        storage.delete("k");
        storage.delete("k");
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set("shared", "1").unwrap();
        assert_eq!(other.get("shared").as_deref(), Some("1"));
        assert_eq!(other.len(), 1);
    }
}
