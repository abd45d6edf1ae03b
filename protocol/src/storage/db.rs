//! # SledState: Persistent World State
//!
//! World state persisted in sled's embedded key-value store. Each chaincode
//! namespace gets its own sled tree inside one database, so the token ledger
//! and the asset registry can share a data directory without their keys
//! ever meeting.
//!
//! ## Record Layout
//!
//! | Tree          | Key            | Value                               |
//! |---------------|----------------|-------------------------------------|
//! | `<namespace>` | key (UTF-8)    | `version` (8B BE) `++` value bytes  |
//!
//! Versions come from sled's `generate_id`, which is monotonic across
//! restarts. Prefixing them to the value means a single tree read returns
//! both, and the commit-time version check happens in the same sled
//! transaction as the writes.
//!
//! ## Atomicity
//!
//! `apply` runs inside `Tree::transaction`. sled may retry the closure under
//! contention, which is fine: it only reads the read set and the batch,
//! both immutable. Either every version matches and every write lands, or
//! the transaction aborts with a conflict and the tree is untouched.

use std::path::Path;

use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
};
use sled::{Db, IVec, Tree};

use super::world_state::{
    RangeIter, ReadSet, StoreError, StoreResult, Version, Versioned, WorldState, WriteBatch,
    WriteOp,
};

/// Width of the big-endian version header on every stored value.
const VERSION_HEADER_LEN: usize = 8;

/// Tree used when no namespace is given.
pub const DEFAULT_NAMESPACE: &str = "world_state";

// ---------------------------------------------------------------------------
// Record Encoding
// ---------------------------------------------------------------------------

fn encode_record(version: Version, value: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(VERSION_HEADER_LEN + value.len());
    record.extend_from_slice(&version.to_be_bytes());
    record.extend_from_slice(value);
    record
}

fn decode_record(raw: &[u8]) -> StoreResult<Versioned> {
    if raw.len() < VERSION_HEADER_LEN {
        return Err(StoreError::Corrupt(format!(
            "record shorter than version header ({} bytes)",
            raw.len()
        )));
    }
    let (header, value) = raw.split_at(VERSION_HEADER_LEN);
    let version = Version::from_be_bytes(
        header
            .try_into()
            .map_err(|_| StoreError::Corrupt("invalid version header".to_string()))?,
    );
    Ok(Versioned {
        value: value.to_vec(),
        version,
    })
}

fn decode_key(raw: &IVec) -> StoreResult<String> {
    String::from_utf8(raw.to_vec())
        .map_err(|e| StoreError::Corrupt(format!("non UTF-8 key: {e}")))
}

// ---------------------------------------------------------------------------
// SledState
// ---------------------------------------------------------------------------

/// Persistent, versioned world state backed by a sled tree.
///
/// Cloning is cheap: clones share the underlying database handle, and sled
/// is safe to use from many threads at once.
#[derive(Debug, Clone)]
pub struct SledState {
    db: Db,
    tree: Tree,
}

impl SledState {
    /// Open or create a database at `path` and use the default namespace.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db, DEFAULT_NAMESPACE)
    }

    /// Create a temporary database that is removed when the last handle is
    /// dropped. No filesystem cleanup needed in tests.
    pub fn open_temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db, DEFAULT_NAMESPACE)
    }

    fn from_db(db: Db, namespace: &str) -> StoreResult<Self> {
        let tree = db.open_tree(namespace)?;
        Ok(Self { db, tree })
    }

    /// A handle onto another namespace of the same database.
    pub fn namespace(&self, name: &str) -> StoreResult<Self> {
        Self::from_db(self.db.clone(), name)
    }

    /// Number of live keys in this namespace.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Block until every committed batch is durable.
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl WorldState for SledState {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        match self.tree.get(key.as_bytes())? {
            Some(raw) => Ok(Some(decode_record(&raw)?)),
            None => Ok(None),
        }
    }

    fn range<'a>(&'a self, start: &str, end: &str) -> StoreResult<RangeIter<'a>> {
        let iter = if end.is_empty() {
            self.tree.range(start.as_bytes().to_vec()..)
        } else {
            self.tree
                .range(start.as_bytes().to_vec()..end.as_bytes().to_vec())
        };
        Ok(Box::new(iter.map(|entry| -> StoreResult<(String, Versioned)> {
            let (key, raw) = entry?;
            Ok((decode_key(&key)?, decode_record(&raw)?))
        })))
    }

    fn apply(&self, reads: &ReadSet, writes: &WriteBatch) -> StoreResult<()> {
        let version = self.db.generate_id()?;

        let result = self.tree.transaction(|tx| -> ConflictableTransactionResult<(), StoreError> {
            for (key, expected) in reads.iter() {
                let current = match tx.get(key.as_bytes())? {
                    Some(raw) => Some(
                        decode_record(&raw)
                            .map_err(ConflictableTransactionError::Abort)?
                            .version,
                    ),
                    None => None,
                };
                if current != *expected {
                    return Err(ConflictableTransactionError::Abort(StoreError::Conflict {
                        key: key.clone(),
                    }));
                }
            }

            for (key, op) in writes.iter() {
                match op {
                    WriteOp::Put(value) => {
                        tx.insert(key.as_bytes(), encode_record(version, value))?;
                    }
                    WriteOp::Delete => {
                        tx.remove(key.as_bytes())?;
                    }
                }
            }
            Ok(())
        });

        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(StoreError::Sled(err)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
