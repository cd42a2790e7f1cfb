mod durable_writer;
mod ingestor;

use crate::{CoreError, CoreResult, MemoryStore, SensorReading, Session, SessionId, SessionStore};

use std::{
    panic::Location,
    sync::{
        Arc, Barrier,
        atomic::{AtomicBool, Ordering},
    },
};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;

/// Holds a store call until the test releases it.
pub(crate) struct StorePause {
    /// Passed once the store call has begun.
    pub(crate) entered: Barrier,
    /// Passed when the test lets the call finish.
    pub(crate) release: Barrier,
}

impl StorePause {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Barrier::new(2),
            release: Barrier::new(2),
        })
    }

    fn hold(&self) {
        self.entered.wait();
        self.release.wait();
    }
}

/// Memory store whose writes can be switched to fail or held mid-call.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub(crate) inner: MemoryStore,
    pub(crate) fail_create: AtomicBool,
    pub(crate) fail_close: AtomicBool,
    pub(crate) fail_append: AtomicBool,
    pub(crate) pause_create: Option<Arc<StorePause>>,
    pub(crate) pause_close: Option<Arc<StorePause>>,
}

impl FlakyStore {
    #[track_caller]
    fn check(flag: &AtomicBool) -> CoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence {
                reason: "store unavailable".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl SessionStore for FlakyStore {
    fn create_session(&self, session: &Session) -> CoreResult<()> {
        if let Some(pause) = &self.pause_create {
            pause.hold();
        }
        Self::check(&self.fail_create)?;
        self.inner.create_session(session)
    }

    fn close_session(&self, id: SessionId, ended_at: DateTime<Utc>) -> CoreResult<()> {
        if let Some(pause) = &self.pause_close {
            pause.hold();
        }
        Self::check(&self.fail_close)?;
        self.inner.close_session(id, ended_at)
    }

    fn find_session(&self, id: SessionId) -> CoreResult<Option<Session>> {
        self.inner.find_session(id)
    }

    fn open_sessions(&self) -> CoreResult<Vec<Session>> {
        self.inner.open_sessions()
    }

    fn sessions_for_owner(&self, owner: &str) -> CoreResult<Vec<Session>> {
        self.inner.sessions_for_owner(owner)
    }

    fn append_reading(&self, reading: &SensorReading) -> CoreResult<()> {
        Self::check(&self.fail_append)?;
        self.inner.append_reading(reading)
    }

    fn readings_for_session(&self, id: SessionId) -> CoreResult<Vec<SensorReading>> {
        self.inner.readings_for_session(id)
    }

    fn readings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CoreResult<Vec<SensorReading>> {
        self.inner.readings_between(from, to)
    }
}
