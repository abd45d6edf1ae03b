//! End-to-end tests for the transaction substrate.
//!
//! These drive the full begin/read/write/commit cycle against both world
//! state backends. Each test stands alone with its own temporary database,
//! so there is no shared state and no ordering dependency.

use std::sync::Arc;

use ledgerline_protocol::storage::{create_composite_key, split_composite_key};
use chrono::Utc;
use ledgerline_protocol::{
    Ledger, LedgerError, LedgerResult, LogSink, MemoryState, RecordingSink, SledState,
    StaticIdentity, WorldState,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn backends() -> anyhow::Result<Vec<(&'static str, Arc<dyn WorldState>)>> {
    Ok(vec![
        ("memory", Arc::new(MemoryState::new()) as Arc<dyn WorldState>),
        ("sled", Arc::new(SledState::open_temporary()?) as Arc<dyn WorldState>),
    ])
}

fn counter(ctx: &mut ledgerline_protocol::TxContext<'_>, key: &str) -> LedgerResult<i64> {
    Ok(ctx
        .get_state(key)?
        .and_then(|raw| String::from_utf8(raw).ok())
        .and_then(|text| text.parse().ok())
        .unwrap_or(0))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn committed_writes_and_event_are_visible_on_every_backend() -> anyhow::Result<()> {
    for (name, state) in backends()? {
        let sink = Arc::new(RecordingSink::new());
        let ledger = Ledger::new(state.clone(), sink.clone());
        let alice = StaticIdentity::new("alice", "Org1MSP");

        let (_, receipt) = ledger.submit_with_receipt(&alice, |ctx| -> LedgerResult<()> {
            let next = counter(ctx, "counter")? + 1;
            let owner = ctx.client_identity().id()?;
            ctx.put_state("counter", next.to_string())?;
            ctx.put_state("owner", owner)?;
            ctx.set_event("Incremented", next.to_string())
        })?;

        assert_eq!(receipt.writes, 2, "{name}");
        assert_eq!(receipt.event.as_deref(), Some("Incremented"), "{name}");
        assert_eq!(state.get("counter")?.map(|v| v.value), Some(b"1".to_vec()), "{name}");
        assert_eq!(state.get("owner")?.map(|v| v.value), Some(b"alice".to_vec()), "{name}");

        let events = sink.take();
        assert_eq!(events.len(), 1, "{name}");
        assert_eq!(events[0].tx_id, receipt.tx_id, "{name}");
        assert_eq!(events[0].payload, b"1", "{name}");
    }
    Ok(())
}

#[test]
fn interleaved_transactions_conflict_on_every_backend() -> anyhow::Result<()> {
    for (name, state) in backends()? {
        state.put("counter", b"10")?;
        let sink = Arc::new(RecordingSink::new());
        let ledger = Ledger::new(state.clone(), sink.clone());
        let alice = StaticIdentity::new("alice", "Org1MSP");

        let mut first = ledger.begin(&alice);
        let mut second = ledger.begin(&alice);
        for ctx in [&mut first, &mut second] {
            let next = counter(ctx, "counter")? + 1;
            ctx.put_state("counter", next.to_string())?;
            ctx.set_event("Incremented", "bump")?;
        }

        first.commit()?;
        let err = second.commit().unwrap_err();
        assert!(
            matches!(err, LedgerError::Conflict { ref key } if key == "counter"),
            "{name}: {err}"
        );
        assert_eq!(state.get("counter")?.map(|v| v.value), Some(b"11".to_vec()), "{name}");
        assert_eq!(sink.len(), 1, "{name}");
    }
    Ok(())
}

#[test]
fn range_scans_merge_pending_writes() -> anyhow::Result<()> {
    for (name, state) in backends()? {
        for (owner, spender) in [("alice", "bob"), ("alice", "carol"), ("bob", "alice")] {
            let key = create_composite_key("allowance", &[owner, spender])?;
            state.put(&key, b"5")?;
        }
        let ledger = Ledger::new(state.clone(), Arc::new(RecordingSink::new()));
        let alice = StaticIdentity::new("alice", "Org1MSP");

        let spenders = ledger.evaluate(&alice, |ctx| -> LedgerResult<Vec<String>> {
            ctx.del_state(&create_composite_key("allowance", &["alice", "bob"])?)?;
            ctx.put_state(&create_composite_key("allowance", &["alice", "dave"])?, "1")?;

            let mut spenders = Vec::new();
            for (key, _) in ctx.state_by_partial_composite_key("allowance", &["alice"])? {
                let (_, attributes) = split_composite_key(&key)?;
                spenders.push(attributes[1].clone());
            }
            Ok(spenders)
        })?;

        assert_eq!(spenders, ["carol", "dave"], "{name}");
    }
    Ok(())
}

#[test]
fn inverted_ranges_are_empty_on_every_backend() -> anyhow::Result<()> {
    for (name, state) in backends()? {
        for key in ["a", "b", "z"] {
            state.put(key, key.as_bytes())?;
        }
        let ledger = Ledger::new(state.clone(), Arc::new(RecordingSink::new()));
        let alice = StaticIdentity::new("alice", "Org1MSP");

        let found = ledger.evaluate(&alice, |ctx| -> LedgerResult<usize> {
            ctx.put_state("m", "pending")?;
            Ok(ctx.state_by_range("z", "b")?.count())
        })?;
        assert_eq!(found, 0, "{name}");

        let tail = ledger.evaluate(&alice, |ctx| -> LedgerResult<Vec<String>> {
            Ok(ctx.state_by_range("b", "")?.map(|(key, _)| key).collect())
        })?;
        assert_eq!(tail, ["b", "z"], "{name}");
    }
    Ok(())
}

#[test]
fn log_sink_ledger_commits_and_stamps_receipts() -> anyhow::Result<()> {
    let ledger = Ledger::new(Arc::new(MemoryState::new()), Arc::new(LogSink));
    let alice = StaticIdentity::new("alice", "Org1MSP");

    let before = Utc::now();
    let (_, receipt) = ledger.submit_with_receipt(&alice, |ctx| -> LedgerResult<()> {
        ctx.put_state("greeting", "hello")?;
        ctx.set_event("Greeted", r#"{"who":"alice"}"#)
    })?;

    assert!(receipt.timestamp >= before);
    assert!(receipt.timestamp <= Utc::now());
    assert_eq!(receipt.event.as_deref(), Some("Greeted"));
    assert_eq!(
        ledger.state().get("greeting")?.map(|v| v.value),
        Some(b"hello".to_vec())
    );
    Ok(())
}

#[test]
fn invalid_keys_never_reach_the_store() {
    let state = Arc::new(MemoryState::new());
    let ledger = Ledger::new(state.clone(), Arc::new(RecordingSink::new()));
    let alice = StaticIdentity::new("alice", "Org1MSP");

    let result = ledger.submit(&alice, |ctx| ctx.put_state("", "x"));
    assert!(matches!(result, Err(LedgerError::InvalidKey(_))));
    assert!(state.is_empty());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn sled_namespaces_persist_independently() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let alice = StaticIdentity::new("alice", "Org1MSP");

    {
        let db = SledState::open(dir.path())?;
        for (namespace, value) in [("token", "100"), ("assets", "{}")] {
            let ledger = Ledger::new(
                Arc::new(db.namespace(namespace)?),
                Arc::new(RecordingSink::new()),
            );
            ledger.submit(&alice, |ctx| ctx.put_state("alice", value))?;
        }
        db.flush()?;
    }

    let db = SledState::open(dir.path())?;
    let token = db.namespace("token")?;
    let assets = db.namespace("assets")?;
    assert_eq!(token.get("alice")?.map(|v| v.value), Some(b"100".to_vec()));
    assert_eq!(assets.get("alice")?.map(|v| v.value), Some(b"{}".to_vec()));
    assert_eq!(token.len(), 1);
    Ok(())
}
