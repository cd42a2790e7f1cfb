//! Telemetry Recorder: live sensor dashboard backend with on-demand session recording.

mod app;
mod config;
mod error;
mod http;
mod mqtt;
mod storage;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
    mqtt::{MqttPublisher, MqttTransport},
    storage::SqliteStore,
};

use crate::config::Config;

use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "telemetry_recorder=debug,telemetry_recorder_core=debug";
const LOG_FORMAT_ENV: &str = "TELEMETRY_RECORDER_LOG_FORMAT";

/// Application entry point.
#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = App::new(config).run().await {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

/// `RUST_LOG` overrides the default filter; `TELEMETRY_RECORDER_LOG_FORMAT=json`
/// switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
