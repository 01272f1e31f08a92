//! # Record Store
//!
//! The store is the sole owner of persisted state. Handlers reach it through
//! the [`Collection`] trait, one trait object per collection, injected via
//! the application state.
//!
//! [`MemoryCollection`] is the in-process backend used for development and
//! tests. All operations are synchronous under a `parking_lot::RwLock` that
//! is never held across an `.await`; a panicking writer does not poison it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// A record that lives in one collection, keyed by its identity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Partial update accepted by [`Collection::update`].
    type Patch: Send + 'static;

    /// Collection name, used in logs and error messages.
    const COLLECTION: &'static str;

    /// The record's identity.
    fn id(&self) -> Uuid;

    /// Overwrite the fields present in `patch`.
    fn apply(&mut self, patch: Self::Patch);
}

/// A collection of records keyed by identity.
///
/// Each method is a single store call: there is no multi-call transaction
/// and concurrent writers to the same identity race, last write wins.
#[async_trait]
pub trait Collection<T: Record>: Send + Sync {
    /// Every record, in insertion order.
    async fn list(&self) -> Result<Vec<T>, StoreError>;

    /// Persist a new record and return it as stored.
    async fn insert(&self, record: T) -> Result<T, StoreError>;

    /// Apply `patch` to the record with `id`. `Ok(None)` if absent.
    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<Option<T>, StoreError>;

    /// Remove the record with `id`, returning it. `Ok(None)` if absent.
    async fn remove(&self, id: Uuid) -> Result<Option<T>, StoreError>;
}

// -- In-Memory Backend --------------------------------------------------------

#[derive(Debug)]
struct Entries<T> {
    next_seq: u64,
    records: HashMap<Uuid, (u64, T)>,
}

/// Thread-safe, cloneable in-memory collection.
///
/// Clones share the same underlying data.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    entries: Arc<RwLock<Entries<T>>>,
}

impl<T> Clone for MemoryCollection<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T: Record> MemoryCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries {
                next_seq: 0,
                records: HashMap::new(),
            })),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.entries.read().records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Collection<T> for MemoryCollection<T> {
    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let guard = self.entries.read();
        let mut ordered: Vec<&(u64, T)> = guard.records.values().collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        Ok(ordered.into_iter().map(|(_, r)| r.clone()).collect())
    }

    async fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut guard = self.entries.write();
        let existing = guard.records.get(&record.id()).map(|(seq, _)| *seq);
        let seq = match existing {
            // Re-inserting an identity keeps its original position.
            Some(seq) => seq,
            None => {
                let seq = guard.next_seq;
                guard.next_seq += 1;
                seq
            }
        };
        guard.records.insert(record.id(), (seq, record.clone()));
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<Option<T>, StoreError> {
        let mut guard = self.entries.write();
        Ok(guard.records.get_mut(&id).map(|(_, record)| {
            record.apply(patch);
            record.clone()
        }))
    }

    async fn remove(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        Ok(self
            .entries
            .write()
            .records
            .remove(&id)
            .map(|(_, record)| record))
    }
}
