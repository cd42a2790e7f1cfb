use crate::SessionId;

use chrono::{DateTime, Utc};

/// Recording state owned by the [`Recorder`](crate::Recorder).
///
/// `Starting` and `Stopping` cover the store call of a transition. Neither
/// tags readings, and both reject further starts and stops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Not currently recording.
    #[default]
    Idle,
    /// A start is persisting its session.
    Starting {
        /// The session being created.
        session_id: SessionId,
        /// Owner of the session being created.
        owner: String,
        /// Start time written to the store.
        started_at: DateTime<Utc>,
    },
    /// Readings are being tagged and persisted.
    Recording {
        /// The open session.
        session_id: SessionId,
        /// Owner of the open session.
        owner: String,
        /// When recording started.
        started_at: DateTime<Utc>,
    },
    /// A stop is closing the session in the store.
    Stopping {
        /// The session being closed.
        session_id: SessionId,
        /// Owner of the session being closed.
        owner: String,
        /// When recording started.
        started_at: DateTime<Utc>,
        /// End time written to the store.
        ended_at: DateTime<Utc>,
    },
}

impl RecordingState {
    /// The open session id, if recording.
    ///
    /// A session that is still being created is not open yet. A session
    /// being closed is still open until the store confirms.
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            RecordingState::Idle | RecordingState::Starting { .. } => None,
            RecordingState::Recording { session_id, .. }
            | RecordingState::Stopping { session_id, .. } => Some(*session_id),
        }
    }

    /// Whether readings arriving now belong to a session.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }
}
