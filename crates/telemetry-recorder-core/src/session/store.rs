use crate::{CoreResult, SensorReading, Session, SessionId};

use chrono::{DateTime, Utc};

/// Persistence contract for sessions and recorded readings.
///
/// Implementations are synchronous; the ingestion path never calls them
/// directly, only through the durable writer worker.
pub trait SessionStore: Send + Sync {
    /// Persist a newly opened session.
    fn create_session(&self, session: &Session) -> CoreResult<()>;

    /// Set `ended_at` on an open session. Fails if the session is unknown or
    /// already closed.
    fn close_session(&self, id: SessionId, ended_at: DateTime<Utc>) -> CoreResult<()>;

    /// Look up a session by id.
    fn find_session(&self, id: SessionId) -> CoreResult<Option<Session>>;

    /// Sessions with no end timestamp.
    fn open_sessions(&self) -> CoreResult<Vec<Session>>;

    /// All sessions owned by `owner`, newest first.
    fn sessions_for_owner(&self, owner: &str) -> CoreResult<Vec<Session>>;

    /// Append a recorded reading.
    fn append_reading(&self, reading: &SensorReading) -> CoreResult<()>;

    /// Readings tagged with `id`, ascending by timestamp.
    fn readings_for_session(&self, id: SessionId) -> CoreResult<Vec<SensorReading>>;

    /// Readings with `from <= recorded_at <= to`, ascending by timestamp.
    fn readings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CoreResult<Vec<SensorReading>>;
}
