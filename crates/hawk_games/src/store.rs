//! Keyed session registry.
//!
//! The store is the only owner of session state. Callers never hold a
//! session between operations: they fetch a snapshot with [`SessionStore::get`]
//! or mutate in place with [`SessionStore::update`].
//!
//! Each key has its own slot lock, so events against one key run one at a
//! time while other keys proceed independently. The map lock is held only
//! to find, insert or unlink a slot handle; no code waits on a slot lock
//! while holding it. A slot unlinked from the map is marked dead so a
//! writer still holding its handle retries against the map.

use derive_more::{Display, Error};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Error returned by store lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum StoreError {
    /// No live session under the key.
    #[display("Session not found")]
    NotFound,
}

/// What [`SessionStore::update`] does with the value after the mutator ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retain {
    /// Keep the mutated value.
    Keep,
    /// Tear the entry down.
    Remove,
}

#[derive(Debug)]
struct Slot<V> {
    value: Option<V>,
    touched: Instant,
    dead: bool,
}

type SlotRef<V> = Arc<Mutex<Slot<V>>>;

fn vacant<V>() -> SlotRef<V> {
    Arc::new(Mutex::new(Slot {
        value: None,
        touched: Instant::now(),
        dead: false,
    }))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_live<V>(slot: &Mutex<Slot<V>>) -> bool {
    match slot.try_lock() {
        Ok(slot) => slot.value.is_some(),
        Err(TryLockError::WouldBlock) => true,
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().value.is_some(),
    }
}

/// A thread-safe map from session key to session value.
#[derive(Debug)]
pub struct SessionStore<K, V> {
    name: &'static str,
    slots: Arc<Mutex<HashMap<K, SlotRef<V>>>>,
}

impl<K, V> Clone for SessionStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Creates an empty store. `name` only labels log lines.
    #[instrument]
    pub fn new(name: &'static str) -> Self {
        info!(store = name, "Creating session store");
        Self {
            name,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Inserts a value, overwriting any existing value under the key.
    #[instrument(skip(self, value), fields(store = self.name))]
    pub fn create(&self, key: K, value: V) {
        let mut value = Some(value);
        while value.is_some() {
            let slot_ref = {
                let mut slots = lock(&self.slots);
                Arc::clone(slots.entry(key.clone()).or_insert_with(vacant))
            };
            let mut slot = lock(&slot_ref);
            if slot.dead {
                debug!(?key, "Slot unlinked while waiting, retrying");
                continue;
            }
            if slot.value.is_some() {
                debug!(?key, "Overwriting existing session");
            }
            slot.value = value.take();
            slot.touched = Instant::now();
        }
        debug!(?key, "Session stored");
    }

    /// Returns a snapshot of the value under the key.
    #[instrument(skip(self), fields(store = self.name))]
    pub fn get(&self, key: &K) -> Result<V, StoreError> {
        let slot = self.slot(key)?;
        let slot = lock(&slot);
        slot.value.clone().ok_or_else(|| {
            debug!(?key, "Session not found");
            StoreError::NotFound
        })
    }

    /// Returns true if a live value exists under the key.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_ok()
    }

    /// Mutates the value under the key while holding its slot lock.
    ///
    /// The mutator decides whether the value survives. Concurrent calls on
    /// the same key observe each other's effects in order; a call that was
    /// waiting on a removed key gets [`StoreError::NotFound`].
    #[instrument(skip(self, mutator), fields(store = self.name))]
    pub fn update<R>(
        &self,
        key: &K,
        mutator: impl FnOnce(&mut V) -> (R, Retain),
    ) -> Result<R, StoreError> {
        let slot_ref = self.slot(key)?;
        let (result, retain) = {
            let mut slot = lock(&slot_ref);
            let value = slot.value.as_mut().ok_or(StoreError::NotFound)?;
            let (result, retain) = mutator(value);
            match retain {
                Retain::Keep => slot.touched = Instant::now(),
                Retain::Remove => slot.value = None,
            }
            (result, retain)
        };

        if retain == Retain::Remove {
            self.prune(key, &slot_ref);
            debug!(?key, "Session removed after update");
        }
        Ok(result)
    }

    /// Removes and returns the value under the key.
    #[instrument(skip(self), fields(store = self.name))]
    pub fn remove(&self, key: &K) -> Option<V> {
        let slot_ref = lock(&self.slots).remove(key)?;
        let mut slot = lock(&slot_ref);
        slot.dead = true;
        let value = slot.value.take();
        if value.is_some() {
            debug!(?key, "Session removed");
        }
        value
    }

    /// Number of live sessions.
    ///
    /// Never waits on a busy slot; a session in the middle of an update
    /// counts as live.
    pub fn len(&self) -> usize {
        self.snapshot()
            .into_iter()
            .filter(|(_, slot)| is_live(slot))
            .count()
    }

    /// True if the store holds no live session.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of all live sessions, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.snapshot()
            .into_iter()
            .filter(|(_, slot)| is_live(slot))
            .map(|(key, _)| key)
            .collect()
    }

    /// Copies the slot handles out so no slot is locked under the map lock.
    fn snapshot(&self) -> Vec<(K, SlotRef<V>)> {
        lock(&self.slots)
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect()
    }

    /// Drops every session untouched for at least `max_idle`.
    ///
    /// Slots busy in another operation are skipped; they are not idle.
    /// Returns the number of sessions dropped.
    #[instrument(skip(self), fields(store = self.name))]
    pub fn sweep(&self, max_idle: Duration) -> usize {
        let mut slots = lock(&self.slots);
        let before = slots.len();
        let mut expired = 0;

        slots.retain(|key, slot| {
            let Ok(mut slot) = slot.try_lock() else {
                return true;
            };
            if slot.value.is_none() {
                slot.dead = true;
                return false;
            }
            if slot.touched.elapsed() >= max_idle {
                debug!(?key, "Session expired");
                slot.value = None;
                slot.dead = true;
                expired += 1;
                return false;
            }
            true
        });

        if expired > 0 {
            info!(expired, remaining = before - expired, "Swept idle sessions");
        }
        expired
    }

    fn slot(&self, key: &K) -> Result<SlotRef<V>, StoreError> {
        lock(&self.slots)
            .get(key)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Drops the map entry for a slot emptied by `update`, unless a
    /// concurrent `create` refilled it. A busy slot is left for `sweep`.
    fn prune(&self, key: &K, emptied: &SlotRef<V>) {
        let mut slots = lock(&self.slots);
        let vacated = match slots.get(key) {
            Some(current) if Arc::ptr_eq(current, emptied) => match current.try_lock() {
                Ok(mut slot) if slot.value.is_none() => {
                    slot.dead = true;
                    true
                }
                _ => false,
            },
            _ => false,
        };
        if vacated {
            slots.remove(key);
        }
    }
}
