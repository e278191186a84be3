//! Store module - key-value persistence boundary
//!
//! The engine never touches real storage. Hosts implement [`ProgressStore`] over
//! whatever they have (browser storage, a file, a database) and the engine reads
//! and writes JSON values under the keys produced by [`StorageKeys`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed value under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage
pub trait ProgressStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory store (tests, headless hosts)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Read and decode a JSON value; `Ok(None)` if the key is absent
pub fn load_json<T: DeserializeOwned>(
    store: &dyn ProgressStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key) {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize + ?Sized>(
    store: &mut dyn ProgressStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw);
    Ok(())
}

/// Key layout under a common prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Current progressive level
    pub fn level(&self) -> String {
        format!("{}_level", self.prefix)
    }

    pub fn daily_pieces(&self, date_key: &str) -> String {
        format!("{}_daily_pieces_{}", self.prefix, date_key)
    }

    pub fn daily_time(&self, date_key: &str) -> String {
        format!("{}_daily_time_{}", self.prefix, date_key)
    }

    pub fn daily_mistakes(&self, date_key: &str) -> String {
        format!("{}_daily_mistakes_{}", self.prefix, date_key)
    }

    pub fn daily_completed(&self, date_key: &str) -> String {
        format!("{}_daily_completed_{}", self.prefix, date_key)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("boxgame")
    }
}
