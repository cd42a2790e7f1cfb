//! Strict decoding of raw telemetry payloads.

use crate::{CoreError, CoreResult, SensorReading};

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Wire shape published by the sensor board.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TelemetryPayload {
    velocidade: f64,
    tensao: f64,
    corrente: f64,
    temperatura: f64,
}

/// Converts transport payloads into [`SensorReading`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadDecoder;

impl PayloadDecoder {
    /// Decode a raw payload, stamping it with the current clock.
    ///
    /// The payload must be a JSON object with exactly the four numeric
    /// fields `velocidade`, `tensao`, `corrente` and `temperatura`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] for anything else. Callers on the
    /// ingestion path drop the message; the error never reaches the transport.
    #[track_caller]
    pub fn decode(&self, payload: &[u8]) -> CoreResult<SensorReading> {
        // Structs also deserialize from sequences, so the object shape is
        // enforced before the field check.
        let object: Map<String, Value> =
            serde_json::from_slice(payload).map_err(|e| CoreError::Decode {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let raw = TelemetryPayload::deserialize(Value::Object(object)).map_err(|e| {
            CoreError::Decode {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        Ok(SensorReading {
            velocity: raw.velocidade,
            voltage: raw.tensao,
            current: raw.corrente,
            temperature: raw.temperatura,
            recorded_at: Utc::now(),
            session_id: None,
        })
    }
}
