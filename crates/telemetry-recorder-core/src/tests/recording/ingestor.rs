use crate::{
    DurableWriter, IngestOutcome, Ingestor, LiveBuffer, MemoryStore, Recorder, SessionQuery,
    SessionStore,
};

use std::sync::Arc;

const PAYLOAD: &[u8] = br#"{"velocidade": 10, "tensao": 12, "corrente": 1, "temperatura": 30}"#;

/// WHAT: Idle ingestion updates the live buffer only
/// WHY: Readings are persisted only while recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_idle_recorder_when_ingesting_then_buffered_but_not_persisted() {
    // Given: An idle pipeline
    let store = Arc::new(MemoryStore::new());
    let recorder = Arc::new(Recorder::new(store.clone()));
    let buffer = Arc::new(LiveBuffer::new(10).unwrap());
    let (writer, worker) = DurableWriter::spawn(store.clone(), 8).unwrap();
    let stats = writer.stats();
    let ingestor = Ingestor::new(buffer.clone(), recorder, writer);

    // When: Ingesting one payload
    let outcome = ingestor.handle(PAYLOAD);
    drop(ingestor);
    worker.await.unwrap();

    // Then: Live only, untagged, nothing written
    assert_eq!(outcome, IngestOutcome::Live);
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot[0].session_id.is_none());
    assert_eq!(stats.snapshot().written, 0);
}

/// WHAT: Recording ingestion tags, buffers and persists
/// WHY: The session's history is built from readings taken while recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_recording_when_ingesting_then_tagged_buffered_and_persisted() {
    // Given: A pipeline with an open session
    let store = Arc::new(MemoryStore::new());
    let recorder = Arc::new(Recorder::new(store.clone()));
    let buffer = Arc::new(LiveBuffer::new(10).unwrap());
    let (writer, worker) = DurableWriter::spawn(store.clone(), 8).unwrap();
    let ingestor = Ingestor::new(buffer.clone(), recorder.clone(), writer);
    let session_id = recorder.start("Bench", "userA").unwrap();

    // When: Ingesting two payloads, stopping, then one more
    assert_eq!(ingestor.handle(PAYLOAD), IngestOutcome::Recorded { session_id });
    assert_eq!(ingestor.handle(PAYLOAD), IngestOutcome::Recorded { session_id });
    recorder.stop().unwrap();
    assert_eq!(ingestor.handle(PAYLOAD), IngestOutcome::Live);
    drop(ingestor);
    worker.await.unwrap();

    // Then: Buffer holds all three; the session holds the two tagged ones
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[0].session_id, Some(session_id));
    assert_eq!(snapshot[2].session_id, None);

    let readings = SessionQuery::new(store.clone())
        .readings(session_id, "userA")
        .unwrap();
    assert_eq!(readings.len(), 2);
    assert!(readings.iter().all(|r| r.session_id == Some(session_id)));
    assert_eq!(store.readings_for_session(session_id).unwrap(), readings);
}

/// WHAT: Malformed payloads are dropped without touching the buffer
/// WHY: Decode failures must never interrupt or pollute the live path
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_malformed_payload_when_ingesting_then_rejected_and_loop_continues() {
    // Given: An idle pipeline
    let store = Arc::new(MemoryStore::new());
    let buffer = Arc::new(LiveBuffer::new(10).unwrap());
    let (writer, _worker) = DurableWriter::spawn(store.clone(), 8).unwrap();
    let ingestor = Ingestor::new(
        buffer.clone(),
        Arc::new(Recorder::new(store.clone())),
        writer,
    );

    // When: A bad payload followed by a good one
    let bad = ingestor.handle(b"{\"velocidade\": ");
    let good = ingestor.handle(PAYLOAD);

    // Then: Only the good one is buffered
    assert_eq!(bad, IngestOutcome::Rejected);
    assert_eq!(good, IngestOutcome::Live);
    assert_eq!(buffer.len(), 1);
}
