use crate::{CoreError, CoreResult, SensorReading};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use tracing::error;

/// Bounded, most-recent-N view of ingested readings.
///
/// Each `push` appends and evicts under one lock, so `snapshot` never
/// observes a partially evicted buffer. Contents are not persisted.
pub struct LiveBuffer {
    capacity: usize,
    readings: Mutex<VecDeque<SensorReading>>,
}

impl LiveBuffer {
    /// Creates an empty buffer holding at most `capacity` readings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `capacity` is zero.
    #[track_caller]
    pub fn new(capacity: usize) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "Live buffer capacity must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            capacity,
            readings: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    /// Appends `reading` at the tail, evicting the oldest entries beyond capacity.
    pub fn push(&self, reading: SensorReading) {
        let mut buf = self.lock();
        buf.push_back(reading);
        while buf.len() > self.capacity {
            buf.pop_front();
        }
    }

    /// Ordered copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<SensorReading> {
        self.lock().iter().cloned().collect()
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<SensorReading> {
        self.lock().back().cloned()
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of readings held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<SensorReading>> {
        // A poisoned lock means a holder panicked mid-operation, but every
        // operation leaves the deque within capacity, so the data is usable.
        self.readings.lock().unwrap_or_else(|e| {
            error!("Live buffer lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}
