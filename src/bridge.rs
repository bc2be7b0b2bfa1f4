//! JSON-text front end to a [`NoteStore`]
//!
//! The JS bindings only convert between JS values and JSON text; everything
//! else (subscription ids, decoding, saving) happens here. All methods take
//! `&self`, so a subscriber may call back into the bridge while it is being
//! notified.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::StoreError;
use crate::note::{decode_snapshot, encode_snapshot};
use crate::store::{NoteStore, Subscription};

pub struct JsonBridge {
    store: NoteStore,
    subscriptions: RefCell<HashMap<u64, Subscription>>,
}

impl JsonBridge {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            subscriptions: RefCell::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    /// Current notes as a JSON array
    pub fn notes_json(&self) -> Result<String, StoreError> {
        Ok(self.store.with_notes(encode_snapshot)?)
    }

    /// Call `callback` with the notes as JSON now and after every change.
    /// Returns the id to pass to [`JsonBridge::unsubscribe`].
    pub fn subscribe<F>(&self, mut callback: F) -> u64
    where
        F: FnMut(&str) + 'static,
    {
        let subscription = self.store.subscribe(move |notes| match encode_snapshot(notes) {
            Ok(json) => callback(&json),
            Err(e) => log::error!("Failed to encode notes for subscriber: {}", e),
        });
        let id = subscription.id();
        self.subscriptions.borrow_mut().insert(id, subscription);
        id
    }

    /// Cancel a subscription. Returns `false` for unknown ids.
    pub fn unsubscribe(&self, id: u64) -> bool {
        let subscription = self.subscriptions.borrow_mut().remove(&id);
        match subscription {
            Some(subscription) => {
                subscription.unsubscribe();
                true
            }
            None => false,
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Replace all notes with the JSON array `json`
    pub fn set_json(&self, json: &str) -> Result<(), StoreError> {
        let notes = decode_snapshot(json)?;
        self.store.set(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{Note, default_notes};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_notes_json_matches_store() {
        let bridge = JsonBridge::new(NoteStore::in_memory());
        let json = bridge.notes_json().unwrap();
        assert_eq!(decode_snapshot(&json).unwrap(), default_notes());
    }

    #[test]
    fn test_set_json_backfills_and_notifies() {
        let bridge = JsonBridge::new(NoteStore::in_memory());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bridge.subscribe(move |json| sink.borrow_mut().push(json.to_string()));

        bridge
            .set_json(r#"[{"id":9,"title":"t","content":"c","color":"red","shape":"circle","x":1,"y":1}]"#)
            .unwrap();

        assert_eq!(seen.borrow().len(), 2);
        let latest = decode_snapshot(&seen.borrow()[1]).unwrap();
        assert_eq!(latest.len(), 1);
        assert!(!latest[0].pinned);
        assert_eq!(bridge.store().len(), 1);
    }

    #[test]
    fn test_set_json_rejects_non_array() {
        let bridge = JsonBridge::new(NoteStore::in_memory());
        assert!(matches!(
            bridge.set_json(r#"{"id":1}"#),
            Err(StoreError::Json(_))
        ));
        assert_eq!(bridge.store().get(), default_notes());
    }

    #[test]
    fn test_unsubscribe_unknown_id() {
        let bridge = JsonBridge::new(NoteStore::in_memory());
        let id = bridge.subscribe(|_| {});
        assert!(bridge.unsubscribe(id));
        assert!(!bridge.unsubscribe(id));
        assert!(!bridge.unsubscribe(999));
        assert_eq!(bridge.subscription_count(), 0);
    }

    #[test]
    fn test_one_shot_subscriber_unsubscribes_itself() {
        let bridge = Rc::new(JsonBridge::new(NoteStore::in_memory()));
        let own_id = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let inner = Rc::clone(&bridge);
        let id_slot = Rc::clone(&own_id);
        let counter = Rc::clone(&calls);
        let id = bridge.subscribe(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = id_slot.get() {
                inner.unsubscribe(id);
            }
        });
        own_id.set(Some(id));

        bridge.set_json("[]").unwrap();
        bridge.set_json("[]").unwrap();
        // Initial delivery plus the first change only
        assert_eq!(calls.get(), 2);
        assert_eq!(bridge.subscription_count(), 0);
    }

    #[test]
    fn test_subscriber_reads_and_writes_during_delivery() {
        let bridge = Rc::new(JsonBridge::new(NoteStore::in_memory()));
        let inner = Rc::clone(&bridge);
        let reads = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reads);

        bridge.subscribe(move |json| {
            sink.borrow_mut().push(inner.notes_json().unwrap());
            let notes = decode_snapshot(json).unwrap();
            if notes.len() == 2 {
                inner
                    .set_json(&encode_snapshot(&[Note::new(1, "only", "")]).unwrap())
                    .unwrap();
            }
        });

        assert_eq!(bridge.store().len(), 1);
        assert_eq!(reads.borrow().len(), 2);
    }
}
