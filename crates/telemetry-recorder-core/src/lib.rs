//! Telemetry Recorder Core Library
//!
//! Ingestion and session-recording engine for sensor telemetry: strict
//! payload decoding, a bounded live view, a single-session recording state
//! machine with a non-blocking durable path, actuator command dispatch and
//! owner-scoped session queries.
//!
//! # Example
//!
//! ```no_run
//! use telemetry_recorder_core::{
//!     CoreResult, DurableWriter, Ingestor, LiveBuffer, MemoryStore, Recorder,
//! };
//!
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let store = Arc::new(MemoryStore::new());
//!     let recorder = Arc::new(Recorder::new(store.clone()));
//!     let buffer = Arc::new(LiveBuffer::new(50)?);
//!     let (writer, _worker) = DurableWriter::spawn(store, 256)?;
//!     let ingestor = Ingestor::new(buffer.clone(), recorder.clone(), writer);
//!
//!     let session_id = recorder.start("Bench run", "alice")?;
//!     ingestor.handle(br#"{"velocidade":10,"tensao":12.1,"corrente":0.4,"temperatura":31}"#);
//!     recorder.stop()?;
//!
//!     println!("{session_id}: {} live readings", buffer.len());
//!     Ok(())
//! }
//! ```

mod command;
mod error;
mod recording;
mod session;
mod telemetry;

pub use {
    command::{Action, CommandDispatcher, CommandPublisher},
    error::{CoreError, Result as CoreResult},
    recording::{
        DurableWriter, IngestOutcome, Ingestor, Recorder, RecordingState, WriterStats,
        WriterStatsSnapshot,
    },
    session::{MemoryStore, Session, SessionId, SessionQuery, SessionScheme, SessionStore},
    telemetry::{LiveBuffer, PayloadDecoder, SensorReading},
};

#[cfg(test)]
mod tests;
