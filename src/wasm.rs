//! JavaScript bindings
//!
//! Notes cross the boundary as plain JS arrays of note objects, built by
//! round-tripping through JSON. Every method takes `&self` so callbacks may
//! call back into the store while they are being notified.

use js_sys::{Function, JSON};
use wasm_bindgen::prelude::*;

use crate::bridge::JsonBridge;
use crate::platform;
use crate::{NoteStore, StoreConfig};

fn parse(json: &str) -> Result<JsValue, JsError> {
    JSON::parse(json).map_err(|_| JsError::new("failed to convert notes to JS"))
}

fn stringify(value: &JsValue) -> Result<String, JsError> {
    Ok(JSON::stringify(value)
        .map_err(|_| JsError::new("notes are not JSON-serializable"))?
        .into())
}

/// Note store handle for browser UI code
#[wasm_bindgen(js_name = NotesStore)]
pub struct JsNotesStore {
    bridge: JsonBridge,
}

#[wasm_bindgen(js_class = NotesStore)]
impl JsNotesStore {
    /// Open the store backed by LocalStorage under `storageKey`
    /// (default `"notesData"`)
    #[wasm_bindgen(constructor)]
    pub fn new(storage_key: Option<String>) -> Result<JsNotesStore, JsError> {
        platform::init_logging();

        let mut config = StoreConfig::default();
        if let Some(key) = storage_key {
            config = config.with_storage_key(key);
        }
        let store = NoteStore::open(config, platform::default_storage())?;
        log::info!("Notes store ready ({} notes)", store.len());

        Ok(Self {
            bridge: JsonBridge::new(store),
        })
    }

    /// Current notes as a JS array
    pub fn notes(&self) -> Result<JsValue, JsError> {
        parse(&self.bridge.notes_json()?)
    }

    /// Call `callback(notes)` now and after every change. Returns an id for
    /// `unsubscribe`.
    pub fn subscribe(&self, callback: Function) -> f64 {
        let id = self.bridge.subscribe(move |json| {
            let value = match parse(json) {
                Ok(value) => value,
                Err(_) => {
                    log::error!("Failed to convert notes for subscriber");
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::error!("Notes subscriber threw: {:?}", e);
            }
        });
        id as f64
    }

    /// Stop a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: f64) {
        self.bridge.unsubscribe(id as u64);
    }

    /// Replace all notes. Throws if the value is not a note array or if
    /// saving fails.
    pub fn set(&self, notes: JsValue) -> Result<(), JsError> {
        self.bridge.set_json(&stringify(&notes)?)?;
        Ok(())
    }

    /// Replace notes with `f(currentNotes)`
    pub fn update(&self, f: Function) -> Result<(), JsError> {
        let current = self.notes()?;
        let next = f
            .call1(&JsValue::NULL, &current)
            .map_err(|e| JsError::new(&format!("update callback threw: {:?}", e)))?;
        self.set(next)
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.bridge.store().len()
    }
}
