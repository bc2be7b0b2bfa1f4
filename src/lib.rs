//! Notes Store - observable note list for a notes board UI
//!
//! Core modules:
//! - `note`: Note model, default notes, snapshot encoding
//! - `store`: Shared observable list with change mirroring
//! - `persistence`: Key-value storage backends
//! - `bridge`: JSON-text front end used by the JS bindings
//! - `platform`: Browser/native logger and storage selection
//! - `config`: Store configuration

pub mod bridge;
pub mod config;
pub mod error;
pub mod note;
pub mod persistence;
pub mod platform;
pub mod store;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use bridge::JsonBridge;
pub use config::StoreConfig;
pub use error::StoreError;
pub use note::{Note, Shape};
pub use persistence::{MemoryStorage, NoStorage, Storage, StorageError};
pub use store::{NoteStore, Subscription};
