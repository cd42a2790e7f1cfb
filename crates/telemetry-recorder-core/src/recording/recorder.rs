//! Single-session recording state machine.
//!
//! Owns the process-wide [`RecordingState`]. Every read and transition goes
//! through one mutex, so two concurrent starts cannot both succeed and the
//! ingestion hook sees a consistent (state, session) pair. Store calls run
//! with the mutex released, behind a pending `Starting`/`Stopping` state, so
//! a slow store never delays ingestion.

use crate::{CoreError, CoreResult, RecordingState, SensorReading, Session, SessionId, SessionStore};

use std::{
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;
use error_location::ErrorLocation;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Recording controller shared by the ingestion path and HTTP handlers.
pub struct Recorder {
    state: Mutex<RecordingState>,
    store: Arc<dyn SessionStore>,
}

impl Recorder {
    /// Creates an idle recorder persisting sessions to `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            state: Mutex::new(RecordingState::Idle),
            store,
        }
    }

    /// Start recording a new session named `name` for `owner`.
    ///
    /// The state is reserved as `Starting` under the lock, the session is
    /// persisted with the lock released, and the outcome is committed after.
    /// Ingestion keeps running untagged while the store works. If the store
    /// fails, the recorder returns to idle.
    ///
    /// # Errors
    ///
    /// [`CoreError::AlreadyRecording`] if a session is open or a start is
    /// in flight (nothing is created), or the store's error if the session
    /// cannot be persisted.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&self, name: &str, owner: &str) -> CoreResult<SessionId> {
        let session = {
            let mut state = self.lock();

            match &*state {
                RecordingState::Idle => {}
                RecordingState::Starting { session_id, .. }
                | RecordingState::Recording { session_id, .. }
                | RecordingState::Stopping { session_id, .. } => {
                    warn!(session_id = %session_id, "Start rejected, already recording");
                    return Err(CoreError::AlreadyRecording {
                        session_id: *session_id,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }

            let session = Session::open(Uuid::new_v4(), name, owner, Utc::now());
            *state = RecordingState::Starting {
                session_id: session.id,
                owner: owner.to_string(),
                started_at: session.started_at,
            };
            session
        };

        let persisted = self.store.create_session(&session);

        let mut state = self.lock();
        if let Err(e) = persisted {
            *state = RecordingState::Idle;
            return Err(e);
        }

        *state = RecordingState::Recording {
            session_id: session.id,
            owner: owner.to_string(),
            started_at: session.started_at,
        };

        info!(session_id = %session.id, owner = owner, "Recording started");

        Ok(session.id)
    }

    /// Stop the open session, stamping its end time.
    ///
    /// Tagging stops as soon as the state moves to `Stopping`, so no tagged
    /// reading is later than the end time. If the store cannot close the
    /// session the recorder returns to recording, so the stop can be retried.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotRecording`] if idle or another transition is in
    /// flight (nothing is altered), or the store's error if the session
    /// cannot be closed.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&self) -> CoreResult<SessionId> {
        let (session_id, owner, started_at, ended_at) = {
            let mut state = self.lock();

            let (session_id, owner, started_at) = match &*state {
                RecordingState::Recording {
                    session_id,
                    owner,
                    started_at,
                } => (*session_id, owner.clone(), *started_at),
                RecordingState::Idle
                | RecordingState::Starting { .. }
                | RecordingState::Stopping { .. } => {
                    warn!(state = ?*state, "Stop rejected, not recording");
                    return Err(CoreError::NotRecording {
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };

            let ended_at = Utc::now();
            *state = RecordingState::Stopping {
                session_id,
                owner: owner.clone(),
                started_at,
                ended_at,
            };
            (session_id, owner, started_at, ended_at)
        };

        let closed = self.store.close_session(session_id, ended_at);

        let mut state = self.lock();
        if let Err(e) = closed {
            *state = RecordingState::Recording {
                session_id,
                owner,
                started_at,
            };
            return Err(e);
        }

        *state = RecordingState::Idle;

        info!(
            session_id = %session_id,
            duration_ms = (ended_at - started_at).num_milliseconds(),
            "Recording stopped"
        );

        Ok(session_id)
    }

    /// The open session id, or `None` when idle.
    pub fn current_session_id(&self) -> Option<SessionId> {
        self.lock().session_id()
    }

    /// Copy of the current state.
    pub fn state(&self) -> RecordingState {
        self.lock().clone()
    }

    /// Ingestion hook: tag `reading` with the open session, if any.
    ///
    /// Called exactly once per decoded reading. Tagged readings are
    /// re-stamped under the state lock, so their timestamp always falls
    /// inside the session's `[started_at, ended_at]`.
    pub fn tag(&self, reading: SensorReading) -> SensorReading {
        let state = self.lock();
        match &*state {
            RecordingState::Recording { session_id, .. } => SensorReading {
                recorded_at: Utc::now(),
                ..reading.tagged(*session_id)
            },
            _ => reading,
        }
    }

    /// Close sessions left open in the store by a previous process.
    ///
    /// Only valid while idle; returns how many sessions were closed.
    ///
    /// # Errors
    ///
    /// [`CoreError::AlreadyRecording`] if this recorder has an open session,
    /// or the store's error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn recover_open_sessions(&self) -> CoreResult<usize> {
        // Runs once at startup, before ingestion, so holding the lock across
        // the store calls delays nothing.
        let state = self.lock();

        match &*state {
            RecordingState::Idle => {}
            RecordingState::Starting { session_id, .. }
            | RecordingState::Recording { session_id, .. }
            | RecordingState::Stopping { session_id, .. } => {
                return Err(CoreError::AlreadyRecording {
                    session_id: *session_id,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let dangling = self.store.open_sessions()?;
        let ended_at = Utc::now();
        for session in &dangling {
            self.store.close_session(session.id, ended_at)?;
            warn!(
                session_id = %session.id,
                owner = %session.owner,
                "Closed session left open by a previous run"
            );
        }

        Ok(dangling.len())
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        // Every state write is a single assignment, so a poisoned guard
        // still holds a consistent state.
        self.state.lock().unwrap_or_else(|e| {
            error!("Recorder state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}
