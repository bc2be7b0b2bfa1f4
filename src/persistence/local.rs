//! Browser LocalStorage backend

use wasm_bindgen::JsValue;

use super::{Storage, StorageError};

/// `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// LocalStorage of the current window. `None` outside a window context
    /// (workers) or when the browser refuses access.
    pub fn from_window() -> Option<Self> {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { inner })
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Backend(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Fails with QuotaExceededError when the origin is out of space
        self.inner.set_item(key, value).map_err(js_error)
    }
}
