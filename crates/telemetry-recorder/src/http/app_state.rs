use std::sync::Arc;

use axum::http::HeaderName;
use telemetry_recorder_core::{CommandDispatcher, LiveBuffer, Recorder, SessionQuery, WriterStats};

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub(crate) recorder: Arc<Recorder>,
    pub(crate) buffer: Arc<LiveBuffer>,
    pub(crate) query: SessionQuery,
    pub(crate) dispatcher: CommandDispatcher,
    pub(crate) writer_stats: Arc<WriterStats>,
    pub(crate) owner_header: HeaderName,
}
