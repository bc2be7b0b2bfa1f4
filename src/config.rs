//! Store configuration

use serde::{Deserialize, Serialize};

/// Storage key the notes board has always used
pub const DEFAULT_STORAGE_KEY: &str = "notesData";

/// How a [`NoteStore`](crate::NoteStore) talks to its storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Slot holding the JSON snapshot
    pub storage_key: String,
    /// Restore from and mirror to storage. When off the store is memory-only
    /// even if the backend could persist.
    pub persist: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist: true,
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }
}
