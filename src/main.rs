//! Notes Store entry point
//!
//! Native builds open the file-backed store and print the current notes.
//! The web build is driven from JS through the `NotesStore` binding.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use notes_store::{NoteStore, StoreConfig, platform};

    platform::init_logging();
    log::info!("Notes Store (native) starting...");

    let store = match NoteStore::open(StoreConfig::default(), platform::default_storage()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open notes store: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&store.get()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to print notes: {}", e);
            return std::process::ExitCode::FAILURE;
        }
    }
    let pinned = store.with_notes(|notes| notes.iter().filter(|n| n.pinned).count());
    log::info!("{} notes ({} pinned)", store.len(), pinned);
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the NotesStore constructor, this is just to satisfy the compiler
}
