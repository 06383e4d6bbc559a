//! Browser LocalStorage backend

use crate::error::{Error, Result};
use crate::persistence::Storage;

/// `window.localStorage`
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    /// Connect to LocalStorage; a missing backend surfaces on first use
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable - settings and scores won't persist");
        }
        Self { inner }
    }

    fn backend(&self) -> Result<&web_sys::Storage> {
        self.inner.as_ref().ok_or(Error::StorageUnavailable)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.backend()?
            .get_item(key)
            .map_err(|e| Error::Storage(format!("{e:?}")))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.backend()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{e:?}")))
    }
}
