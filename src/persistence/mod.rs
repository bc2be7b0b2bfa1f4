//! Key-value persistence for the note snapshot
//!
//! The store only needs two capabilities: read a named blob and overwrite it.
//! Which backend is used is decided by whoever constructs the store:
//! - [`LocalStorage`]: browser LocalStorage (wasm32 only)
//! - [`FileStorage`]: one file per key in a directory (native only)
//! - [`MemoryStorage`]: shared in-process map
//! - [`NoStorage`]: nothing is read or written

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Failure reading or writing a storage slot
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A named-blob store
pub trait Storage {
    /// Read the value under `key`, `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Whether this backend actually keeps anything
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Backend for contexts without persistent storage
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl Storage for NoStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }
}
