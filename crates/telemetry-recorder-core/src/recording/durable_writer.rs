//! Non-blocking hand-off of recorded readings to the persistence store.
//!
//! The ingestion path enqueues with `try_send` and never waits. A single
//! blocking worker drains the queue into the store; failures are logged and
//! counted, never surfaced to the live path.

use crate::{CoreError, CoreResult, SensorReading, SessionStore};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use error_location::ErrorLocation;
use serde::Serialize;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

/// Counters for the durable path.
#[derive(Debug, Default)]
pub struct WriterStats {
    written: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`WriterStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriterStatsSnapshot {
    /// Readings persisted successfully.
    pub written: u64,
    /// Readings the store rejected.
    pub failed: u64,
    /// Readings discarded because the queue was full or closed.
    pub dropped: u64,
}

impl WriterStats {
    /// Current counter values.
    pub fn snapshot(&self) -> WriterStatsSnapshot {
        WriterStatsSnapshot {
            written: self.written.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Sending half of the durable path.
///
/// Dropping every `DurableWriter` closes the queue; the worker then drains
/// what is left and exits.
#[derive(Clone)]
pub struct DurableWriter {
    tx: mpsc::Sender<SensorReading>,
    stats: Arc<WriterStats>,
}

impl DurableWriter {
    /// Spawn the writer worker on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `queue_capacity` is zero.
    #[track_caller]
    pub fn spawn(
        store: Arc<dyn SessionStore>,
        queue_capacity: usize,
    ) -> CoreResult<(Self, JoinHandle<()>)> {
        if queue_capacity == 0 {
            return Err(CoreError::InvalidConfig {
                reason: "Durable writer queue capacity must be at least 1".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (tx, mut rx) = mpsc::channel::<SensorReading>(queue_capacity);
        let stats = Arc::new(WriterStats::default());
        let worker_stats = Arc::clone(&stats);

        // Store calls are synchronous, so the worker owns a blocking thread
        // and exits once every sender is dropped and the queue is empty.
        let handle = tokio::task::spawn_blocking(move || {
            while let Some(reading) = rx.blocking_recv() {
                match store.append_reading(&reading) {
                    Ok(()) => {
                        worker_stats.written.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        worker_stats.failed.fetch_add(1, Ordering::Relaxed);
                        error!(
                            session_id = ?reading.session_id,
                            error = ?e,
                            "Failed to persist reading"
                        );
                    }
                }
            }
            info!("Durable writer drained and stopped");
        });

        debug!(queue_capacity, "Durable writer started");

        Ok((Self { tx, stats }, handle))
    }

    /// Enqueue `reading` without waiting.
    ///
    /// Returns `false` if the reading was dropped.
    pub fn submit(&self, reading: SensorReading) -> bool {
        match self.tx.try_send(reading) {
            Ok(()) => true,
            Err(TrySendError::Full(reading)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    session_id = ?reading.session_id,
                    "Durable writer queue full, reading dropped"
                );
                false
            }
            Err(TrySendError::Closed(reading)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    session_id = ?reading.session_id,
                    "Durable writer stopped, reading dropped"
                );
                false
            }
        }
    }

    /// Shared counters, for health reporting.
    pub fn stats(&self) -> Arc<WriterStats> {
        Arc::clone(&self.stats)
    }
}
