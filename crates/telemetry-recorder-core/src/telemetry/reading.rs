use crate::SessionId;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sensor sample as seen by the ingestion path.
///
/// The timestamp is assigned at ingestion, never by the producing device.
/// Serialized field names follow the dashboard wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Motor velocity.
    #[serde(rename = "velocidade")]
    pub velocity: f64,
    /// Supply voltage.
    #[serde(rename = "tensao")]
    pub voltage: f64,
    /// Drawn current.
    #[serde(rename = "corrente")]
    pub current: f64,
    /// Temperature.
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    /// When the reading was ingested.
    #[serde(rename = "data_hora")]
    pub recorded_at: DateTime<Utc>,
    /// Recording session this reading belongs to, if any.
    pub session_id: Option<SessionId>,
}

impl SensorReading {
    /// Returns a copy of this reading tagged with `session_id`.
    pub fn tagged(self, session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            ..self
        }
    }
}
