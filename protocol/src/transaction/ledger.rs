//! # Ledger
//!
//! Owns one chaincode namespace (a world state plus the event sink its
//! transactions publish to) and drives the begin/execute/commit cycle.
//!
//! Two entry points, matching the two ways a client talks to chaincode:
//!
//! - [`Ledger::submit`] executes and commits. Used for anything that writes.
//! - [`Ledger::evaluate`] executes against current state and throws the
//!   transaction away. Used for queries such as `BalanceOf`.

use std::sync::Arc;

use tracing::debug;

use super::context::{TxContext, TxReceipt};
use crate::error::LedgerError;
use crate::events::EventSink;
use crate::identity::ClientIdentity;
use crate::storage::WorldState;

/// A chaincode namespace: world state plus event publication.
#[derive(Clone)]
pub struct Ledger {
    state: Arc<dyn WorldState>,
    events: Arc<dyn EventSink>,
}

impl Ledger {
    pub fn new(state: Arc<dyn WorldState>, events: Arc<dyn EventSink>) -> Self {
        Self { state, events }
    }

    /// The underlying world state. Reads through it bypass transactions.
    pub fn state(&self) -> &dyn WorldState {
        self.state.as_ref()
    }

    /// Open a transaction for `identity`. Nothing is persisted unless the
    /// returned context is committed.
    pub fn begin<'a>(&'a self, identity: &'a dyn ClientIdentity) -> TxContext<'a> {
        TxContext::new(self.state.as_ref(), self.events.as_ref(), identity)
    }

    /// Run `op` in a fresh transaction and commit it if `op` succeeds.
    ///
    /// On `Err` the transaction is discarded: no writes, no event. A commit
    /// conflict is reported through `E`'s `From<LedgerError>` conversion.
    pub fn submit<T, E, F>(&self, identity: &dyn ClientIdentity, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        self.submit_with_receipt(identity, op)
            .map(|(output, _receipt)| output)
    }

    /// Like [`submit`](Self::submit), but also hands back the commit receipt.
    pub fn submit_with_receipt<T, E, F>(
        &self,
        identity: &dyn ClientIdentity,
        op: F,
    ) -> Result<(T, TxReceipt), E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let mut ctx = self.begin(identity);
        let output = match op(&mut ctx) {
            Ok(output) => output,
            Err(err) => {
                debug!(tx_id = %ctx.tx_id(), "transaction aborted by chaincode");
                return Err(err);
            }
        };
        let receipt = ctx.commit()?;
        Ok((output, receipt))
    }

    /// Run `op` without committing. Writes and events it stages are dropped.
    pub fn evaluate<T, E, F>(&self, identity: &dyn ClientIdentity, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
    {
        let mut ctx = self.begin(identity);
        op(&mut ctx)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}
