//! # World State Interface
//!
//! The contract never talks to a database directly. It sees a versioned
//! key-value map with three capabilities:
//!
//! 1. Point reads that also report the version of the value.
//! 2. Ordered range scans over `[start, end)`.
//! 3. Atomic application of a write batch, guarded by the versions the
//!    transaction observed while it was executing.
//!
//! Point 3 is where optimistic concurrency lives. A transaction records the
//! version of every key it read; `apply` refuses the batch if any of those
//! versions moved in the meantime. Two spends racing for the same balance
//! therefore cannot both commit.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors raised by world-state backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// The backend cannot be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A guarded read no longer matches the stored version.
    #[error("version conflict on key {key:?}")]
    Conflict { key: String },

    /// A stored record could not be decoded by the backend itself.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Versioned Values
// ---------------------------------------------------------------------------

/// Monotonic version assigned to a key on every committed write.
pub type Version = u64;

/// A stored value together with the version that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned {
    pub value: Vec<u8>,
    pub version: Version,
}

/// Lazy sequence of `(key, value)` pairs produced by a range scan.
pub type RangeIter<'a> = Box<dyn Iterator<Item = StoreResult<(String, Versioned)>> + 'a>;

// ---------------------------------------------------------------------------
// Read / Write Sets
// ---------------------------------------------------------------------------

/// Versions observed by a transaction, keyed by world-state key.
///
/// `None` records that the key was absent when read; a concurrent insert of
/// that key is a conflict just like a concurrent update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSet {
    versions: BTreeMap<String, Option<Version>>,
}

impl ReadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version seen for `key`. Only the first observation counts;
    /// later reads of the same key inside one transaction see the same
    /// snapshot or the transaction's own writes.
    pub fn record(&mut self, key: &str, version: Option<Version>) {
        self.versions.entry(key.to_string()).or_insert(version);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<Version>)> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// A single pending mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>),
    Delete,
}

/// Ordered set of pending mutations. The last write to a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: BTreeMap<String, WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.ops.insert(key.into(), WriteOp::Put(value.into()));
    }

    pub fn delete(&mut self, key: impl Into<String>) {
        self.ops.insert(key.into(), WriteOp::Delete);
    }

    pub fn get(&self, key: &str) -> Option<&WriteOp> {
        self.ops.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, WriteOp> {
        self.ops.iter()
    }

    /// Pending mutations whose keys fall in `[start, end)`. An empty `end`
    /// means no upper bound.
    pub fn range<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a WriteOp)> + 'a {
        self.ops
            .range::<str, _>((Bound::Included(start), Bound::Unbounded))
            .take_while(move |(key, _)| end.is_empty() || key.as_str() < end)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WorldState
// ---------------------------------------------------------------------------

/// A versioned key-value store that chaincode executes against.
///
/// Implementations must make [`apply`](WorldState::apply) atomic: either the
/// read versions all match and every write lands, or nothing changes.
pub trait WorldState: Send + Sync {
    /// Point read. `None` if the key has never been written or was deleted.
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>>;

    /// Ordered scan over `[start, end)`. An empty `end` scans to the end of
    /// the keyspace.
    fn range<'a>(&'a self, start: &str, end: &str) -> StoreResult<RangeIter<'a>>;

    /// Validate `reads` against current versions and apply `writes`
    /// atomically. Fails with [`StoreError::Conflict`] on the first stale
    /// read.
    fn apply(&self, reads: &ReadSet, writes: &WriteBatch) -> StoreResult<()>;

    /// Unguarded single write. Handy for seeding fixtures and migrations.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.put(key, value);
        self.apply(&ReadSet::new(), &batch)
    }

    /// Unguarded single delete.
    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut batch = WriteBatch::new();
        batch.delete(key);
        self.apply(&ReadSet::new(), &batch)
    }
}
