use crate::{
    CoreError, DurableWriter, MemoryStore, SessionStore,
    tests::{recording::FlakyStore, tagged_reading_at},
};

use std::sync::{Arc, atomic::Ordering};

use uuid::Uuid;

/// WHAT: Submitted readings are persisted once the worker drains
/// WHY: The durable path must deliver what the live path hands off
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_submitted_readings_when_writer_dropped_then_all_persisted() {
    // Given: A writer over a memory store
    let store = Arc::new(MemoryStore::new());
    let (writer, worker) = DurableWriter::spawn(store.clone(), 16).unwrap();
    let stats = writer.stats();
    let session_id = Uuid::new_v4();

    // When: Submitting three readings and closing the queue
    for i in 0..3 {
        assert!(writer.submit(tagged_reading_at(i as f64, i, session_id)));
    }
    drop(writer);
    worker.await.unwrap();

    // Then: All three are stored and counted
    assert_eq!(store.readings_for_session(session_id).unwrap().len(), 3);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.written, 3);
    assert_eq!(snapshot.failed, 0);
    assert_eq!(snapshot.dropped, 0);
}

/// WHAT: Store failures are counted, not propagated
/// WHY: A failing store degrades history only, never the caller
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_store_when_submitting_then_failures_counted() {
    // Given: A store that rejects every append
    let store = Arc::new(FlakyStore::default());
    store.fail_append.store(true, Ordering::SeqCst);
    let (writer, worker) = DurableWriter::spawn(store.clone(), 4).unwrap();
    let stats = writer.stats();

    // When: Submitting two readings
    let session_id = Uuid::new_v4();
    assert!(writer.submit(tagged_reading_at(1.0, 0, session_id)));
    assert!(writer.submit(tagged_reading_at(2.0, 1, session_id)));
    drop(writer);
    worker.await.unwrap();

    // Then: Both counted as failed, nothing stored
    assert_eq!(stats.snapshot().failed, 2);
    assert!(store.readings_for_session(session_id).unwrap().is_empty());
}

/// WHAT: Zero queue capacity is rejected
/// WHY: A zero-sized channel cannot be constructed
#[tokio::test]
async fn given_zero_capacity_when_spawning_then_invalid_config() {
    // Given/When: Spawning with no queue
    let result = DurableWriter::spawn(Arc::new(MemoryStore::new()), 0);

    // Then: Invalid configuration
    assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
}
