use crate::{DurableWriter, LiveBuffer, PayloadDecoder, Recorder, SessionId};

use std::sync::Arc;

use tracing::{trace, warn};

/// What happened to one inbound transport message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Payload failed to decode and was dropped.
    Rejected,
    /// Pushed to the live buffer only (recorder idle).
    Live,
    /// Pushed to the live buffer and queued for persistence.
    Recorded {
        /// Session the reading was tagged with.
        session_id: SessionId,
    },
    /// Pushed to the live buffer; the durable queue refused it.
    RecordDropped {
        /// Session the reading was tagged with.
        session_id: SessionId,
    },
}

/// Transport message handler: decode, tag, buffer, and maybe persist.
pub struct Ingestor {
    decoder: PayloadDecoder,
    buffer: Arc<LiveBuffer>,
    recorder: Arc<Recorder>,
    writer: DurableWriter,
}

impl Ingestor {
    /// Wires the ingestion path.
    pub fn new(buffer: Arc<LiveBuffer>, recorder: Arc<Recorder>, writer: DurableWriter) -> Self {
        Self {
            decoder: PayloadDecoder,
            buffer,
            recorder,
            writer,
        }
    }

    /// Handle one raw telemetry payload.
    ///
    /// Never fails: malformed payloads are logged and dropped so the
    /// subscription loop keeps running. The live buffer is always updated
    /// before the durable hand-off, which never blocks.
    pub fn handle(&self, payload: &[u8]) -> IngestOutcome {
        let reading = match self.decoder.decode(payload) {
            Ok(reading) => reading,
            Err(e) => {
                warn!(payload_len = payload.len(), error = %e, "Dropping telemetry message");
                return IngestOutcome::Rejected;
            }
        };

        let reading = self.recorder.tag(reading);
        let session_id = reading.session_id;

        match session_id {
            None => {
                self.buffer.push(reading);
                trace!("Reading buffered");
                IngestOutcome::Live
            }
            Some(session_id) => {
                self.buffer.push(reading.clone());
                if self.writer.submit(reading) {
                    IngestOutcome::Recorded { session_id }
                } else {
                    IngestOutcome::RecordDropped { session_id }
                }
            }
        }
    }
}
