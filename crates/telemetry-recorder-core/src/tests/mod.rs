mod recording;
mod session;

use crate::{SensorReading, SessionId};

use chrono::{DateTime, TimeZone, Utc};

/// Reading with the given velocity, stamped `offset_secs` after a fixed epoch.
pub(crate) fn reading_at(velocity: f64, offset_secs: i64) -> SensorReading {
    SensorReading {
        velocity,
        voltage: 12.0,
        current: 0.5,
        temperature: 25.0,
        recorded_at: at(offset_secs),
        session_id: None,
    }
}

/// Like [`reading_at`] but tagged with `session_id`.
pub(crate) fn tagged_reading_at(
    velocity: f64,
    offset_secs: i64,
    session_id: SessionId,
) -> SensorReading {
    reading_at(velocity, offset_secs).tagged(session_id)
}

/// Fixed instant plus `offset_secs`.
pub(crate) fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_secs, 0)
        .single()
        .unwrap_or_default()
}
