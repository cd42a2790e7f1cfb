use crate::{CoreError, CoreResult, SensorReading, Session, SessionId, SessionStore};

use std::{
    panic::Location,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tracing::error;

#[derive(Default)]
struct Tables {
    sessions: Vec<Session>,
    readings: Vec<SensorReading>,
}

/// Process-local [`SessionStore`], used in tests and for runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| {
            error!("Memory store lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl SessionStore for MemoryStore {
    #[track_caller]
    fn create_session(&self, session: &Session) -> CoreResult<()> {
        let mut tables = self.lock();
        if tables.sessions.iter().any(|s| s.id == session.id) {
            return Err(CoreError::Persistence {
                reason: format!("Session {} already exists", session.id),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        tables.sessions.push(session.clone());
        Ok(())
    }

    #[track_caller]
    fn close_session(&self, id: SessionId, ended_at: DateTime<Utc>) -> CoreResult<()> {
        let mut tables = self.lock();
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.is_open())
        {
            Some(session) => {
                session.ended_at = Some(ended_at);
                Ok(())
            }
            None => Err(CoreError::Persistence {
                reason: format!("No open session {}", id),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn find_session(&self, id: SessionId) -> CoreResult<Option<Session>> {
        Ok(self.lock().sessions.iter().find(|s| s.id == id).cloned())
    }

    fn open_sessions(&self) -> CoreResult<Vec<Session>> {
        Ok(self
            .lock()
            .sessions
            .iter()
            .filter(|s| s.is_open())
            .cloned()
            .collect())
    }

    fn sessions_for_owner(&self, owner: &str) -> CoreResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .lock()
            .sessions
            .iter()
            .filter(|s| s.is_owned_by(owner))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(sessions)
    }

    fn append_reading(&self, reading: &SensorReading) -> CoreResult<()> {
        self.lock().readings.push(reading.clone());
        Ok(())
    }

    fn readings_for_session(&self, id: SessionId) -> CoreResult<Vec<SensorReading>> {
        let mut readings: Vec<SensorReading> = self
            .lock()
            .readings
            .iter()
            .filter(|r| r.session_id == Some(id))
            .cloned()
            .collect();
        readings.sort_by_key(|r| r.recorded_at);
        Ok(readings)
    }

    fn readings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CoreResult<Vec<SensorReading>> {
        let mut readings: Vec<SensorReading> = self
            .lock()
            .readings
            .iter()
            .filter(|r| r.recorded_at >= from && r.recorded_at <= to)
            .cloned()
            .collect();
        readings.sort_by_key(|r| r.recorded_at);
        Ok(readings)
    }
}
