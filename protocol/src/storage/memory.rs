//! In-memory world state.
//!
//! A `BTreeMap` behind a `parking_lot::RwLock`. Reads share the lock, while
//! `apply` takes it exclusively for the whole validate-then-write step, which
//! is what makes the batch atomic with respect to other commits.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::world_state::{
    RangeIter, ReadSet, StoreError, StoreResult, Version, Versioned, WorldState, WriteBatch,
    WriteOp,
};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, Versioned>,
    /// Last version handed out. Every committed batch bumps it once, so all
    /// keys written by one batch share a version.
    clock: Version,
}

/// Volatile world state for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryState {
    inner: RwLock<Inner>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl WorldState for MemoryState {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn range<'a>(&'a self, start: &str, end: &str) -> StoreResult<RangeIter<'a>> {
        // BTreeMap::range panics on inverted bounds; sled yields nothing.
        if !end.is_empty() && start > end {
            return Ok(Box::new(std::iter::empty()));
        }
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        // The lock cannot outlive this call, so the matching entries are
        // copied out before the iterator is handed back.
        let snapshot: Vec<StoreResult<(String, Versioned)>> = self
            .inner
            .read()
            .entries
            .range::<str, _>((Bound::Included(start), upper))
            .map(|(key, value)| Ok((key.clone(), value.clone())))
            .collect();
        Ok(Box::new(snapshot.into_iter()))
    }

    fn apply(&self, reads: &ReadSet, writes: &WriteBatch) -> StoreResult<()> {
        let mut inner = self.inner.write();

        for (key, expected) in reads.iter() {
            let current = inner.entries.get(key).map(|v| v.version);
            if current != *expected {
                return Err(StoreError::Conflict { key: key.clone() });
            }
        }

        if writes.is_empty() {
            return Ok(());
        }

        inner.clock += 1;
        let version = inner.clock;
        for (key, op) in writes.iter() {
            match op {
                WriteOp::Put(value) => {
                    inner.entries.insert(
                        key.clone(),
                        Versioned {
                            value: value.clone(),
                            version,
                        },
                    );
                }
                WriteOp::Delete => {
                    inner.entries.remove(key);
                }
            }
        }

        Ok(())
    }
}
