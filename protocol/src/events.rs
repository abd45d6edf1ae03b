//! # Chaincode Events
//!
//! A transaction may stage one named event with an opaque payload. The event
//! is published only after the transaction's writes commit, so listeners
//! never hear about a state change that didn't happen.
//!
//! Publication is fire-and-forget. Sinks cannot fail the transaction and the
//! ledger never retries delivery.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A committed chaincode event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Transaction that emitted the event.
    pub tx_id: String,
    /// Event name, e.g. `"Transfer"`.
    pub name: String,
    /// Encoded payload (JSON for every event the bundled contracts emit).
    pub payload: Vec<u8>,
}

impl ChaincodeEvent {
    /// Decode a JSON payload into a typed event body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Receives events from committed transactions.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &ChaincodeEvent);
}

/// Keeps every published event in memory. Mostly for tests and audit tools.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ChaincodeEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, oldest first.
    pub fn events(&self) -> Vec<ChaincodeEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<ChaincodeEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &ChaincodeEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Writes events to the tracing log and drops them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &ChaincodeEvent) {
        info!(
            tx_id = %event.tx_id,
            event = %event.name,
            payload = %String::from_utf8_lossy(&event.payload),
            "chaincode event"
        );
    }
}
