//! Key/value persistence for settings and the high score
//!
//! The simulation never touches storage. The session controller reads and
//! writes through the [`Storage`] trait so the browser's LocalStorage and an
//! in-memory map are interchangeable.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// A string key/value store
pub trait Storage {
    /// Read a value; `Ok(None)` when the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Write a value, replacing any previous one
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Load and parse a JSON value
pub fn load_json<T: DeserializeOwned>(store: &impl Storage, key: &str) -> Result<Option<T>> {
    match store.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value
pub fn save_json<T: Serialize>(store: &mut impl Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

/// In-memory storage (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_memory_roundtrip_and_overwrite() {
        let mut store = MemoryStorage::new();
        assert!(store.get_item("k").unwrap().is_none());
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.set_item("k", "w").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_load_json_reports_corruption() {
        let mut store = MemoryStorage::new();
        store.set_item("broken", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>> = load_json(&store, "broken");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_load_json_missing_key() {
        let store = MemoryStorage::new();
        let result: Option<Vec<u32>> = load_json(&store, "absent").unwrap();
        assert!(result.is_none());
    }
}
