//! # Transaction Context
//!
//! Everything a contract method may touch during one invocation:
//!
//! - the caller's resolved identity,
//! - a read-through view of world state that remembers which versions it saw,
//! - a write buffer that nothing outside this transaction can observe,
//! - one staged event.
//!
//! ## Lifecycle
//!
//! ```text
//! begin ──► get/put/del/range ──► commit ──► writes applied, event published
//!                    │
//!                    └──────────► drop   ──► everything discarded
//! ```
//!
//! `commit` is all-or-nothing. If any key read during the transaction has a
//! different version in the store by the time we commit, the whole write set
//! is rejected with [`LedgerError::Conflict`] and the event is dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::events::{ChaincodeEvent, EventSink};
use crate::identity::ClientIdentity;
use crate::storage::composite::{self, is_composite_key};
use crate::storage::{ReadSet, WorldState, WriteBatch, WriteOp};

/// Summary of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_id: String,
    /// Number of keys written or deleted.
    pub writes: usize,
    /// Name of the published event, if one was staged.
    pub event: Option<String>,
    /// When the transaction began.
    pub timestamp: DateTime<Utc>,
}

/// Iterator over `(key, value)` pairs returned by
/// [`TxContext::state_by_range`].
pub type StateIter = std::collections::btree_map::IntoIter<String, Vec<u8>>;

/// Per-invocation view of the ledger. See the module docs for the lifecycle.
pub struct TxContext<'a> {
    tx_id: String,
    timestamp: DateTime<Utc>,
    state: &'a dyn WorldState,
    events: &'a dyn EventSink,
    identity: &'a dyn ClientIdentity,
    reads: ReadSet,
    writes: WriteBatch,
    event: Option<(String, Vec<u8>)>,
}

impl<'a> TxContext<'a> {
    /// Start a transaction with a fresh id and the current time.
    pub fn new(
        state: &'a dyn WorldState,
        events: &'a dyn EventSink,
        identity: &'a dyn ClientIdentity,
    ) -> Self {
        Self {
            tx_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            state,
            events,
            identity,
            reads: ReadSet::new(),
            writes: WriteBatch::new(),
            event: None,
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The caller's identity.
    pub fn client_identity(&self) -> &dyn ClientIdentity {
        self.identity
    }

    // -- State access -------------------------------------------------------

    /// Read a key. Sees this transaction's own pending writes first.
    pub fn get_state(&mut self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        validate_key(key)?;
        if let Some(op) = self.writes.get(key) {
            return Ok(match op {
                WriteOp::Put(value) => Some(value.clone()),
                WriteOp::Delete => None,
            });
        }

        let stored = self.state.get(key)?;
        self.reads
            .record(key, stored.as_ref().map(|versioned| versioned.version));
        Ok(stored.map(|versioned| versioned.value))
    }

    /// Buffer a write. Visible to later reads in this transaction only.
    pub fn put_state(&mut self, key: &str, value: impl Into<Vec<u8>>) -> LedgerResult<()> {
        validate_key(key)?;
        self.writes.put(key, value);
        Ok(())
    }

    /// Buffer a delete.
    pub fn del_state(&mut self, key: &str) -> LedgerResult<()> {
        validate_key(key)?;
        self.writes.delete(key);
        Ok(())
    }

    /// Ordered scan over `[start, end)` with this transaction's pending
    /// writes merged on top. An empty `end` scans to the end of the keyspace.
    ///
    /// Every stored key the scan visits joins the read set. Keys inserted by
    /// someone else into the range after the scan are not detected.
    pub fn state_by_range(&mut self, start: &str, end: &str) -> LedgerResult<StateIter> {
        let mut merged = BTreeMap::new();
        for entry in self.state.range(start, end)? {
            let (key, versioned) = entry?;
            self.reads.record(&key, Some(versioned.version));
            merged.insert(key, versioned.value);
        }

        for (key, op) in self.writes.range(start, end) {
            match op {
                WriteOp::Put(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                WriteOp::Delete => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter())
    }

    /// Scan every composite key of `object_type` whose leading attributes
    /// match `attributes`.
    pub fn state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<StateIter> {
        let (start, end) = composite::partial_key_range(object_type, attributes)?;
        self.state_by_range(&start, &end)
    }

    // -- Events -------------------------------------------------------------

    /// Stage the transaction's event. A later call replaces an earlier one:
    /// a transaction publishes at most one event.
    pub fn set_event(&mut self, name: &str, payload: impl Into<Vec<u8>>) -> LedgerResult<()> {
        if name.is_empty() {
            return Err(LedgerError::Serialization(
                "event name cannot be empty".to_string(),
            ));
        }
        self.event = Some((name.to_string(), payload.into()));
        Ok(())
    }

    /// The staged event, if any.
    pub fn pending_event(&self) -> Option<(&str, &[u8])> {
        self.event
            .as_ref()
            .map(|(name, payload)| (name.as_str(), payload.as_slice()))
    }

    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    // -- Commit -------------------------------------------------------------

    /// Validate the read set, apply the write set atomically, then publish
    /// the staged event.
    pub fn commit(self) -> LedgerResult<TxReceipt> {
        let TxContext {
            tx_id,
            timestamp,
            state,
            events,
            reads,
            writes,
            event,
            ..
        } = self;

        if let Err(err) = state.apply(&reads, &writes) {
            let err = LedgerError::from(err);
            warn!(tx_id = %tx_id, error = %err, "transaction rejected at commit");
            return Err(err);
        }

        debug!(
            tx_id = %tx_id,
            reads = reads.len(),
            writes = writes.len(),
            "transaction committed"
        );

        let event_name = event.map(|(name, payload)| {
            events.publish(&ChaincodeEvent {
                tx_id: tx_id.clone(),
                name: name.clone(),
                payload,
            });
            name
        });

        Ok(TxReceipt {
            tx_id,
            writes: writes.len(),
            event: event_name,
            timestamp,
        })
    }
}

impl std::fmt::Debug for TxContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxContext")
            .field("tx_id", &self.tx_id)
            .field("timestamp", &self.timestamp)
            .field("reads", &self.reads.len())
            .field("writes", &self.writes.len())
            .field("event", &self.event.as_ref().map(|(name, _)| name))
            .finish()
    }
}

fn validate_key(key: &str) -> LedgerResult<()> {
    if key.is_empty() {
        return Err(LedgerError::InvalidKey("key cannot be empty".to_string()));
    }
    if is_composite_key(key) {
        composite::split_composite_key(key)?;
    }
    Ok(())
}
