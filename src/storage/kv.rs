use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, warn};

/// Device-local key-value persistence
///
/// Values are JSON documents stored as text, one per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deleting a missing key is not an error
    fn delete(&self, key: &str) -> Result<()>;
}

/// Read and decode one key; unreadable or malformed values count as absent
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            error!("Failed to read persisted '{}': {:#}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed persisted '{}': {}", key, e);
            None
        }
    }
}

/// Encode and write one key; returns whether the write landed
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|json| store.set(key, &json));

    match result {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to persist '{}': {:#}", key, e);
            false
        }
    }
}

/// Delete one key, logging failures
pub fn remove_key(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.delete(key) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to delete persisted '{}': {:#}", key, e);
            false
        }
    }
}
