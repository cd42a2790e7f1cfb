use crate::{CoreError, LiveBuffer, tests::reading_at};

use std::{sync::Arc, thread};

/// WHAT: Pushing past capacity evicts the oldest readings
/// WHY: The dashboard shows only the most recent N samples
#[test]
#[allow(clippy::unwrap_used)]
fn given_capacity_two_when_pushing_three_then_oldest_evicted() {
    // Given: A buffer of capacity 2
    let buffer = LiveBuffer::new(2).unwrap();

    // When: Pushing v=10, 20, 30
    for (i, v) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        buffer.push(reading_at(v, i as i64));
    }

    // Then: Snapshot is [20, 30]
    let velocities: Vec<f64> = buffer.snapshot().iter().map(|r| r.velocity).collect();
    assert_eq!(velocities, vec![20.0, 30.0]);
    assert_eq!(buffer.latest().map(|r| r.velocity), Some(30.0));
}

/// WHAT: Snapshot is always a contiguous suffix of the push history
/// WHY: Eviction must be strict FIFO with no gaps or reordering
#[test]
#[allow(clippy::unwrap_used)]
fn given_any_push_count_when_snapshotting_then_suffix_of_history() {
    // Given: A buffer of capacity 5
    let buffer = LiveBuffer::new(5).unwrap();
    let mut history = Vec::new();

    for i in 0..23 {
        // When: Pushing one more reading
        buffer.push(reading_at(i as f64, i));
        history.push(i as f64);

        // Then: Contents equal the last min(len, 5) pushes, in order
        let snapshot: Vec<f64> = buffer.snapshot().iter().map(|r| r.velocity).collect();
        let expected = &history[history.len().saturating_sub(5)..];
        assert_eq!(snapshot, expected);
        assert!(buffer.len() <= buffer.capacity());
    }
}

/// WHAT: Zero capacity is rejected at construction
/// WHY: A buffer that can hold nothing would silently hide all telemetry
#[test]
fn given_zero_capacity_when_creating_then_invalid_config() {
    // Given/When: Creating a zero-capacity buffer
    let result = LiveBuffer::new(0);

    // Then: Invalid configuration
    assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
}

/// WHAT: Concurrent pushes and snapshots never exceed capacity
/// WHY: Readers must never observe a torn buffer
#[test]
#[allow(clippy::unwrap_used)]
fn given_concurrent_writers_and_readers_when_running_then_capacity_holds() {
    // Given: A shared buffer of capacity 8
    let buffer = Arc::new(LiveBuffer::new(8).unwrap());

    // When: Four writers push while four readers snapshot
    let writers: Vec<_> = (0..4)
        .map(|w| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for i in 0..500 {
                    buffer.push(reading_at((w * 1000 + i) as f64, i));
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for _ in 0..500 {
                    // Then: Every observed snapshot respects capacity
                    assert!(buffer.snapshot().len() <= 8);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(buffer.len(), 8);
}
