//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup (console on web, env_logger on native)
//! - Picking the storage backend (LocalStorage on web, files on native)

#[cfg(not(target_arch = "wasm32"))]
use crate::persistence::MemoryStorage;
#[cfg(target_arch = "wasm32")]
use crate::persistence::NoStorage;
use crate::persistence::Storage;

/// Directory used by native builds when `NOTES_DIR` is unset
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_NOTES_DIR: &str = ".notes";

/// Install the logger for this target. Later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the logger for this target. Later calls are ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Browser LocalStorage, or [`NoStorage`] outside a window context
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn Storage> {
    match crate::persistence::LocalStorage::from_window() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("LocalStorage unavailable, notes will not be saved");
            Box::new(NoStorage)
        }
    }
}

/// File storage under `NOTES_DIR` (default `.notes`), or [`MemoryStorage`]
/// for this run if the directory cannot be created
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn Storage> {
    let dir = std::env::var("NOTES_DIR").unwrap_or_else(|_| DEFAULT_NOTES_DIR.to_string());
    match crate::persistence::FileStorage::open(&dir) {
        Ok(storage) => {
            log::info!("Storing notes in {}", storage.dir().display());
            Box::new(storage)
        }
        Err(e) => {
            log::warn!("Cannot use {} for notes ({}), keeping them in memory", dir, e);
            Box::new(MemoryStorage::new())
        }
    }
}
