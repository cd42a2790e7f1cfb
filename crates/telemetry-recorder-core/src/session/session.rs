use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a recording session.
pub type SessionId = Uuid;

/// How readings are associated with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionScheme {
    /// Readings carry the session id.
    Tagged,
    /// Legacy sessions: readings are matched by timestamp window.
    TimeWindow,
}

impl SessionScheme {
    /// Stable storage token.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionScheme::Tagged => "tagged",
            SessionScheme::TimeWindow => "time_window",
        }
    }

    /// Parses a storage token produced by [`SessionScheme::as_str`].
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "tagged" => Some(SessionScheme::Tagged),
            "time_window" => Some(SessionScheme::TimeWindow),
            _ => None,
        }
    }
}

/// A named, owned recording window.
///
/// `ended_at` is the only field that changes after creation, and it is set
/// once when the recording stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// Display name.
    pub name: String,
    /// Authenticated owner of the session.
    pub owner: String,
    /// When recording started.
    pub started_at: DateTime<Utc>,
    /// When recording stopped; `None` while open.
    pub ended_at: Option<DateTime<Utc>>,
    /// How readings are linked to this session.
    pub scheme: SessionScheme,
}

impl Session {
    /// A new open session using the tagged scheme.
    pub fn open(id: SessionId, name: &str, owner: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.to_string(),
            owner: owner.to_string(),
            started_at,
            ended_at: None,
            scheme: SessionScheme::Tagged,
        }
    }

    /// Whether the session is still recording.
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Whether `owner` owns this session.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }
}
