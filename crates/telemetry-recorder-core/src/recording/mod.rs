mod durable_writer;
mod ingestor;
mod recorder;
mod recording_state;

pub use {
    durable_writer::{DurableWriter, WriterStats, WriterStatsSnapshot},
    ingestor::{IngestOutcome, Ingestor},
    recorder::Recorder,
    recording_state::RecordingState,
};
