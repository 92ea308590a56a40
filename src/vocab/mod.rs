/*!
# Vocabulary Manager

Three deduplicated id tables back the triple encoding: token text, node
type names, and ordered type-id sequences (paths). Each table is a
[`Vocabulary`] — a mutex-guarded map from a normalized key to a dense
positive id — bundled into a [`VocabularySet`].

A set is constructed in exactly one [`VocabMode`] for its whole lifetime:

- `Growable` (build runs): unknown keys are assigned the next id, starting
  at 1 and monotonically increasing. Id 0 is never assigned.
- `Frozen` (lookup runs): the tables are immutable; a missing key resolves
  to the reserved "unknown" id 0.

Presence is decided with map lookups, never by comparing a stored value
against zero, so a legitimately small id can never be mistaken for
"unknown".

Lock discipline: one private lock per table, held only for the duration of
a single lookup/assignment and never while acquiring any other lock.
*/

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

pub mod persist;

/// The reserved id meaning "not in the vocabulary".
pub const UNKNOWN_ID: u32 = 0;

/// Operating mode fixed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabMode {
    /// New keys are assigned fresh ids.
    Growable,
    /// The table never mutates; misses resolve to [`UNKNOWN_ID`].
    Frozen,
}

struct VocabInner<K> {
    map: HashMap<K, u32>,
    next_id: u32,
}

/// A single thread-safe dedup table.
pub struct Vocabulary<K> {
    mode: VocabMode,
    inner: Mutex<VocabInner<K>>,
}

impl<K: Eq + Hash> Vocabulary<K> {
    /// Empty growable table; the first assigned id is 1.
    pub fn growable() -> Self {
        Self {
            mode: VocabMode::Growable,
            inner: Mutex::new(VocabInner {
                map: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Frozen table over preloaded entries.
    pub fn frozen(entries: HashMap<K, u32>) -> Self {
        Self {
            mode: VocabMode::Frozen,
            inner: Mutex::new(VocabInner {
                map: entries,
                next_id: 0,
            }),
        }
    }

    pub fn mode(&self) -> VocabMode {
        self.mode
    }

    /// Returns the id for `key`, assigning the next free id when absent.
    ///
    /// On a frozen table this never inserts and behaves as [`lookup`].
    ///
    /// [`lookup`]: Vocabulary::lookup
    pub fn get_or_assign(&self, key: K) -> u32 {
        if self.mode == VocabMode::Frozen {
            return self.lookup(&key);
        }
        let mut guard = self.inner.lock().expect("vocabulary lock poisoned");
        let VocabInner { map, next_id } = &mut *guard;
        match map.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = *next_id;
                *next_id += 1;
                entry.insert(id);
                id
            }
        }
    }

    /// Returns the stored id for `key`, or [`UNKNOWN_ID`] when absent.
    /// Never inserts.
    pub fn lookup<Q>(&self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let guard = self.inner.lock().expect("vocabulary lock poisoned");
        guard.map.get(key).copied().unwrap_or(UNKNOWN_ID)
    }

    /// Mode-dispatched resolution used by the sampler: assignment in
    /// growable tables, pure lookup in frozen ones.
    pub fn id_for(&self, key: K) -> u32 {
        match self.mode {
            VocabMode::Growable => self.get_or_assign(key),
            VocabMode::Frozen => self.lookup(&key),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("vocabulary lock poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash + Clone> Vocabulary<K> {
    /// All entries in ascending id order, for persistence.
    pub fn entries_by_id(&self) -> Vec<(K, u32)> {
        let guard = self.inner.lock().expect("vocabulary lock poisoned");
        let mut entries: Vec<(K, u32)> = guard
            .map
            .iter()
            .map(|(key, id)| (key.clone(), *id))
            .collect();
        entries.sort_by_key(|(_, id)| *id);
        entries
    }
}

/// The token, type, and path tables of one run, all in the same mode.
pub struct VocabularySet {
    mode: VocabMode,
    pub tokens: Vocabulary<String>,
    pub types: Vocabulary<String>,
    pub paths: Vocabulary<Vec<u32>>,
}

impl VocabularySet {
    /// Three empty growable tables (build mode).
    pub fn growable() -> Self {
        Self {
            mode: VocabMode::Growable,
            tokens: Vocabulary::growable(),
            types: Vocabulary::growable(),
            paths: Vocabulary::growable(),
        }
    }

    /// Three frozen tables over preloaded entries (lookup mode).
    pub fn frozen(
        tokens: HashMap<String, u32>,
        types: HashMap<String, u32>,
        paths: HashMap<Vec<u32>, u32>,
    ) -> Self {
        Self {
            mode: VocabMode::Frozen,
            tokens: Vocabulary::frozen(tokens),
            types: Vocabulary::frozen(types),
            paths: Vocabulary::frozen(paths),
        }
    }

    pub fn mode(&self) -> VocabMode {
        self.mode
    }
}
