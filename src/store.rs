//! The shared, observable note list
//!
//! A [`NoteStore`] owns the authoritative `Vec<Note>`, starts from the
//! default notes or a restored snapshot, and mirrors every change back to its
//! [`Storage`] slot.
//!
//! Delivery rules:
//! - `subscribe` hands the current notes to the observer immediately.
//! - After every `set`/`update` each active observer gets the new list,
//!   synchronously, in registration order.
//! - A change made from inside an observer, including during its first
//!   delivery from `subscribe`, is queued and delivered once the current
//!   round finishes, so observers always see changes in the order they were
//!   applied.
//! - The snapshot is written after observers have been notified. A failed
//!   write is returned to the caller; memory state is not rolled back.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::note::{Note, decode_snapshot, default_notes, encode_snapshot};
use crate::persistence::{NoStorage, Storage};

type Callback = Box<dyn FnMut(&[Note])>;

struct Observer {
    id: u64,
    active: Cell<bool>,
    callback: RefCell<Callback>,
}

struct Shared {
    config: StoreConfig,
    storage: Box<dyn Storage>,
    /// Whether reads/writes actually reach `storage`
    mirrored: bool,
    notes: RefCell<Vec<Note>>,
    observers: RefCell<Vec<Rc<Observer>>>,
    next_observer_id: Cell<u64>,
    /// Lists waiting to be broadcast
    queue: RefCell<VecDeque<Vec<Note>>>,
    notifying: Cell<bool>,
}

/// Shared handle to the note list. Clones refer to the same store.
#[derive(Clone)]
pub struct NoteStore {
    shared: Rc<Shared>,
}

impl fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteStore")
            .field("storage_key", &self.shared.config.storage_key)
            .field("mirrored", &self.shared.mirrored)
            .field("notes", &self.shared.notes.borrow().len())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl NoteStore {
    /// Build the store and install the persistence mirror.
    ///
    /// The initial list is the default notes, replaced wholesale by the
    /// stored snapshot when one exists and parses. A snapshot that cannot be
    /// read or parsed is logged and ignored, and left in place until the
    /// first change. Otherwise the mirror writes the initial list once; only
    /// that write can fail.
    pub fn open<S>(config: StoreConfig, storage: S) -> Result<Self, StoreError>
    where
        S: Storage + 'static,
    {
        let mirrored = config.persist && storage.is_persistent();
        let (notes, write_back) = if mirrored {
            restore(&storage, &config.storage_key)
        } else {
            log::info!("Persistence disabled, starting with default notes");
            (default_notes(), false)
        };

        let store = Self {
            shared: Rc::new(Shared {
                config,
                storage: Box::new(storage),
                mirrored,
                notes: RefCell::new(notes),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        };
        if write_back {
            store.persist()?;
        }
        Ok(store)
    }

    /// Memory-only store holding the default notes
    pub fn in_memory() -> Self {
        Self {
            shared: Rc::new(Shared {
                config: StoreConfig::default().without_persistence(),
                storage: Box::new(NoStorage),
                mirrored: false,
                notes: RefCell::new(default_notes()),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// Register `observer`. It is called right away with the current notes
    /// and again after every change until the subscription is cancelled.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(&[Note]) + 'static,
    {
        let id = self.shared.next_observer_id.get();
        self.shared.next_observer_id.set(id + 1);

        let observer = Rc::new(Observer {
            id,
            active: Cell::new(true),
            callback: RefCell::new(Box::new(observer)),
        });
        self.shared.observers.borrow_mut().push(Rc::clone(&observer));

        let current = self.get();
        if self.shared.notifying.replace(true) {
            // Inside a round: changes made now join its queue
            (observer.callback.borrow_mut())(&current);
        } else {
            let _round = RoundGuard(&self.shared.notifying);
            (observer.callback.borrow_mut())(&current);
            self.drain();
        }

        Subscription {
            store: Rc::downgrade(&self.shared),
            observer,
        }
    }

    /// Replace the whole list
    pub fn set(&self, notes: Vec<Note>) -> Result<(), StoreError> {
        let snapshot = notes.clone();
        self.shared.notes.replace(notes);
        self.broadcast(snapshot);
        self.persist()
    }

    /// Replace the list with `f(current)`
    pub fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&[Note]) -> Vec<Note>,
    {
        let current = self.get();
        self.set(f(&current))
    }

    /// Copy of the current list
    pub fn get(&self) -> Vec<Note> {
        self.shared.notes.borrow().clone()
    }

    /// Borrow the current list without cloning. `f` must not mutate the store.
    pub fn with_notes<R>(&self, f: impl FnOnce(&[Note]) -> R) -> R {
        f(&self.shared.notes.borrow())
    }

    pub fn len(&self) -> usize {
        self.shared.notes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.notes.borrow().is_empty()
    }

    /// Active observers, not counting the persistence mirror
    pub fn observer_count(&self) -> usize {
        self.shared.observers.borrow().len()
    }

    pub fn storage_key(&self) -> &str {
        &self.shared.config.storage_key
    }

    pub fn is_persistent(&self) -> bool {
        self.shared.mirrored
    }

    fn broadcast(&self, notes: Vec<Note>) {
        self.shared.queue.borrow_mut().push_back(notes);
        if self.shared.notifying.replace(true) {
            // An outer round is running and will pick this up
            return;
        }
        let _round = RoundGuard(&self.shared.notifying);
        self.drain();
    }

    /// Deliver queued lists until the queue is empty. Caller holds the round.
    fn drain(&self) {
        loop {
            let next = self.shared.queue.borrow_mut().pop_front();
            let Some(notes) = next else { break };

            let observers = self.shared.observers.borrow().clone();
            for observer in observers {
                if observer.active.get() {
                    (observer.callback.borrow_mut())(&notes);
                }
            }
        }
    }

    /// Write the current list to the storage slot
    fn persist(&self) -> Result<(), StoreError> {
        if !self.shared.mirrored {
            return Ok(());
        }
        let json = {
            let notes = self.shared.notes.borrow();
            encode_snapshot(&notes)?
        };
        self.shared
            .storage
            .set(&self.shared.config.storage_key, &json)?;
        log::debug!(
            "Saved {} notes to '{}'",
            self.len(),
            self.shared.config.storage_key
        );
        Ok(())
    }
}

/// Clears the notifying flag even if an observer panics
struct RoundGuard<'a>(&'a Cell<bool>);

impl Drop for RoundGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Initial list from the slot, and whether the mirror may write it back.
/// A slot that could not be read or parsed is not written over.
fn restore(storage: &dyn Storage, key: &str) -> (Vec<Note>, bool) {
    let json = match storage.get(key) {
        Ok(Some(json)) if !json.is_empty() => json,
        Ok(_) => {
            log::info!("No saved notes, starting with defaults");
            return (default_notes(), true);
        }
        Err(e) => {
            log::error!("Failed to read saved notes: {}", e);
            return (default_notes(), false);
        }
    };

    match decode_snapshot(&json) {
        Ok(notes) => {
            log::info!("Restored {} notes from '{}'", notes.len(), key);
            (notes, true)
        }
        Err(e) => {
            log::error!("Failed to parse saved notes: {}", e);
            (default_notes(), false)
        }
    }
}

/// Handle returned by [`NoteStore::subscribe`].
///
/// Dropping it does not cancel delivery; call [`Subscription::unsubscribe`].
pub struct Subscription {
    store: Weak<Shared>,
    observer: Rc<Observer>,
}

impl Subscription {
    /// Stop delivering to this observer. Safe to call more than once and
    /// after the store is gone.
    pub fn unsubscribe(&self) {
        if !self.observer.active.replace(false) {
            return;
        }
        if let Some(shared) = self.store.upgrade() {
            shared
                .observers
                .borrow_mut()
                .retain(|o| o.id != self.observer.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.observer.active.get()
    }

    pub fn id(&self) -> u64 {
        self.observer.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.observer.id)
            .field("active", &self.observer.active.get())
            .finish()
    }
}
