use crate::{
    AppError, AppResult, MqttTransport, SqliteStore,
    config::Config,
    http::{self, AppState},
};

use std::{panic::Location, str::FromStr, sync::Arc, time::Duration};

use axum::http::HeaderName;
use error_location::ErrorLocation;
use telemetry_recorder_core::{
    CommandDispatcher, DurableWriter, Ingestor, LiveBuffer, Recorder, SessionQuery,
};
use tokio::{net::TcpListener, sync::watch};
use tracing::{error, info, instrument, warn};

/// How long shutdown waits for the durable writer to drain.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Main application: owns configuration and wires the engine to its
/// transport, store and HTTP surface.
pub struct App {
    pub(crate) config: Config,
}

impl App {
    /// Application over a validated configuration.
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run until Ctrl-C.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        info!("Telemetry recorder starting");

        let config = self.config;

        let store = Arc::new(SqliteStore::open(&config.storage.database_path)?);

        let recorder = Arc::new(Recorder::new(store.clone()));
        let recovered = recorder.recover_open_sessions()?;
        if recovered > 0 {
            warn!(recovered, "Closed sessions left open by a previous run");
        }

        let buffer = Arc::new(LiveBuffer::new(config.buffer.capacity)?);
        let (writer, writer_handle) = DurableWriter::spawn(store.clone(), config.writer.queue_capacity)?;
        let writer_stats = writer.stats();
        let ingestor = Arc::new(Ingestor::new(buffer.clone(), recorder.clone(), writer));

        let transport = MqttTransport::new(&config.mqtt)?;
        let dispatcher = CommandDispatcher::new(
            Arc::new(transport.publisher()),
            config.mqtt.command_topic.clone(),
        );

        let owner_header =
            HeaderName::from_str(&config.identity.owner_header).map_err(|e| {
                AppError::ConfigError {
                    reason: format!("Invalid owner header: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let state = AppState {
            recorder: recorder.clone(),
            buffer,
            query: SessionQuery::new(store),
            dispatcher,
            writer_stats,
            owner_header,
        };

        let addr = config.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::ServerError {
                reason: format!("Failed to bind {}: {}", addr, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        info!(addr = %addr, "HTTP API listening");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown requested"),
                Err(e) => error!(error = ?e, "Failed to listen for Ctrl-C, shutting down"),
            }
            let _ = shutdown_tx.send(true);
        });

        let mut server_shutdown_rx = shutdown_rx.clone();
        let (served, ()) = tokio::join!(
            async {
                axum::serve(listener, http::router(state))
                    .with_graceful_shutdown(async move {
                        let _ = server_shutdown_rx.changed().await;
                    })
                    .await
            },
            transport.run(ingestor, shutdown_rx),
        );

        // Ingestion has stopped; close the open session so the store never
        // carries it into the next run.
        if recorder.current_session_id().is_some() {
            match recorder.stop() {
                Ok(session_id) => info!(session_id = %session_id, "Recording stopped on shutdown"),
                Err(e) => error!(error = ?e, "Failed to stop recording on shutdown"),
            }
        }

        // The transport dropped the last writer handle, so the worker drains
        // its queue and exits.
        match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer_handle).await {
            Ok(Ok(())) => info!("Durable writer stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Durable writer task panicked"),
            Err(_) => warn!("Durable writer did not drain within timeout"),
        }

        served.map_err(|e| AppError::ServerError {
            reason: format!("HTTP server failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Telemetry recorder shut down successfully");

        Ok(())
    }
}
