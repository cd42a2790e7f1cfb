//! Owner-scoped, read-only access to recorded sessions.

use crate::{CoreError, CoreResult, SensorReading, Session, SessionId, SessionScheme, SessionStore};

use std::{panic::Location, sync::Arc};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Resolves sessions and their readings on behalf of an authenticated owner.
///
/// A session owned by someone else is reported exactly like a missing one,
/// so ids cannot be probed for existence.
#[derive(Clone)]
pub struct SessionQuery {
    store: Arc<dyn SessionStore>,
}

impl SessionQuery {
    /// Creates a query service over `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Readings of `session_id`, ascending by timestamp.
    ///
    /// Tagged sessions are resolved by session id. Legacy time-window
    /// sessions are resolved by scanning `[started_at, ended_at]` inclusive,
    /// with an open window ending now.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] if the session does not exist or belongs to a
    /// different owner; [`CoreError::Persistence`] if the store fails.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn readings(&self, session_id: SessionId, requester: &str) -> CoreResult<Vec<SensorReading>> {
        let session = self.owned_session(session_id, requester)?;

        let mut readings = match session.scheme {
            SessionScheme::Tagged => self.store.readings_for_session(session.id)?,
            SessionScheme::TimeWindow => {
                let end = session.ended_at.unwrap_or_else(Utc::now);
                self.store.readings_between(session.started_at, end)?
            }
        };
        readings.sort_by_key(|r| r.recorded_at);

        debug!(
            session_id = %session_id,
            scheme = session.scheme.as_str(),
            reading_count = readings.len(),
            "Session readings resolved"
        );

        Ok(readings)
    }

    /// A single session owned by `requester`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotFound`] on a missing or foreign session.
    #[track_caller]
    pub fn session(&self, session_id: SessionId, requester: &str) -> CoreResult<Session> {
        self.owned_session(session_id, requester)
    }

    /// Readings in `[from, to]` inclusive that belong to sessions owned by
    /// `requester`, ascending by timestamp.
    ///
    /// Tagged readings count when their session is owned by the requester.
    /// Untagged readings count only when they fall inside one of the
    /// requester's time-window sessions. An inverted window is empty.
    #[instrument(skip(self))]
    pub fn export(
        &self,
        requester: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CoreResult<Vec<SensorReading>> {
        if from > to {
            return Ok(Vec::new());
        }

        let owned = self.store.sessions_for_owner(requester)?;
        let now = Utc::now();
        let windows: Vec<(DateTime<Utc>, DateTime<Utc>)> = owned
            .iter()
            .filter(|s| s.scheme == SessionScheme::TimeWindow)
            .map(|s| (s.started_at, s.ended_at.unwrap_or(now)))
            .collect();

        let mut readings: Vec<SensorReading> = self
            .store
            .readings_between(from, to)?
            .into_iter()
            .filter(|r| match r.session_id {
                Some(id) => owned.iter().any(|s| s.id == id),
                None => windows
                    .iter()
                    .any(|(start, end)| r.recorded_at >= *start && r.recorded_at <= *end),
            })
            .collect();
        readings.sort_by_key(|r| r.recorded_at);

        debug!(
            requester = requester,
            reading_count = readings.len(),
            "Window export resolved"
        );

        Ok(readings)
    }

    /// Sessions owned by `requester`, newest first.
    pub fn sessions(&self, requester: &str) -> CoreResult<Vec<Session>> {
        self.store.sessions_for_owner(requester)
    }

    #[track_caller]
    fn owned_session(&self, session_id: SessionId, requester: &str) -> CoreResult<Session> {
        match self.store.find_session(session_id)? {
            Some(session) if session.is_owned_by(requester) => Ok(session),
            _ => Err(CoreError::NotFound {
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
