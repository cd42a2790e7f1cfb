use crate::{
    CoreError, MemoryStore, Session, SessionStore,
    tests::{at, tagged_reading_at},
};

use uuid::Uuid;

/// WHAT: Closing a session twice fails the second time
/// WHY: The end timestamp is set exactly once
#[test]
#[allow(clippy::unwrap_used)]
fn given_closed_session_when_closing_again_then_persistence_error() {
    // Given: A session closed at t=10
    let store = MemoryStore::new();
    let session = Session::open(Uuid::new_v4(), "Run", "userA", at(0));
    store.create_session(&session).unwrap();
    store.close_session(session.id, at(10)).unwrap();

    // When: Closing again at t=20
    let result = store.close_session(session.id, at(20));

    // Then: Rejected, original end kept
    assert!(matches!(result, Err(CoreError::Persistence { .. })));
    assert_eq!(
        store.find_session(session.id).unwrap().unwrap().ended_at,
        Some(at(10))
    );
}

/// WHAT: Duplicate session ids are rejected
/// WHY: Session ids are primary keys in every store
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_session_when_creating_same_id_then_persistence_error() {
    // Given: A stored session
    let store = MemoryStore::new();
    let session = Session::open(Uuid::new_v4(), "Run", "userA", at(0));
    store.create_session(&session).unwrap();

    // When: Creating it again
    let result = store.create_session(&session);

    // Then: Rejected
    assert!(matches!(result, Err(CoreError::Persistence { .. })));
}

/// WHAT: Session readings are filtered by tag
/// WHY: Concurrent history from other sessions must not bleed in
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_sessions_when_reading_one_then_only_its_rows() {
    // Given: Rows for two sessions
    let store = MemoryStore::new();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    store.append_reading(&tagged_reading_at(1.0, 1, a)).unwrap();
    store.append_reading(&tagged_reading_at(2.0, 2, b)).unwrap();
    store.append_reading(&tagged_reading_at(3.0, 3, a)).unwrap();

    // When: Reading session a
    let rows = store.readings_for_session(a).unwrap();

    // Then: Only a's rows
    let velocities: Vec<f64> = rows.iter().map(|r| r.velocity).collect();
    assert_eq!(velocities, vec![1.0, 3.0]);
}
