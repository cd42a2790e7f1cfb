//! Configuration management for telemetry-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        BufferConfig, CONFIG_PATH_ENV, IdentityConfig, MqttConfig, ServerConfig, StorageConfig,
        WriterConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    str::FromStr,
};

use axum::http::HeaderName;
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broker connection and topics.
    #[serde(default)]
    pub mqtt: MqttConfig,
    /// Live buffer sizing.
    #[serde(default)]
    pub buffer: BufferConfig,
    /// Durable writer sizing.
    #[serde(default)]
    pub writer: WriterConfig,
    /// Database location.
    pub storage: StorageConfig,
    /// Identity layer integration.
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl Config {
    /// Load configuration from disk, creating a default file if none exists.
    ///
    /// The path comes from `TELEMETRY_RECORDER_CONFIG` when set, otherwise
    /// the platform config directory.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Self::with_data_dir(&Self::data_dir()?);
            config.save_to(&config_path)?;
            warn!(
                config_path = ?config_path,
                mqtt_host = %config.mqtt.host,
                "Default config created. Review the broker settings before production use."
            );
            Ok(config)
        }
    }

    /// Load and validate configuration from `path`.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Defaults with the database placed under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Config {
            server: ServerConfig::default(),
            mqtt: MqttConfig::default(),
            buffer: BufferConfig::default(),
            writer: WriterConfig::default(),
            storage: StorageConfig {
                database_path: data_dir.join("telemetry.db"),
            },
            identity: IdentityConfig::default(),
        }
    }

    /// Reject values the engine cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let problem = if self.buffer.capacity == 0 {
            Some("buffer.capacity must be at least 1".to_string())
        } else if self.writer.queue_capacity == 0 {
            Some("writer.queue_capacity must be at least 1".to_string())
        } else if self.mqtt.request_capacity == 0 {
            Some("mqtt.request_capacity must be at least 1".to_string())
        } else if self.mqtt.telemetry_topic.trim().is_empty() {
            Some("mqtt.telemetry_topic must not be empty".to_string())
        } else if self.mqtt.command_topic.trim().is_empty() {
            Some("mqtt.command_topic must not be empty".to_string())
        } else if HeaderName::from_str(&self.identity.owner_header).is_err() {
            Some(format!(
                "identity.owner_header {:?} is not a valid header name",
                self.identity.owner_header
            ))
        } else {
            None
        };

        match problem {
            Some(reason) => Err(AppError::ConfigError {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
    }

    /// Save configuration to `path` using the atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            debug!(config_dir = ?parent, "Created config directory");
        }

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "telemetry-recorder", "Telemetry-Recorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    #[track_caller]
    fn data_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }
}
