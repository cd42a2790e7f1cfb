use crate::SessionId;

use error_location::ErrorLocation;
use thiserror::Error;

/// Telemetry engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport payload did not match the telemetry schema.
    #[error("Malformed telemetry payload: {reason} {location}")]
    Decode {
        /// Why the payload was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording is already in progress.
    #[error("Already recording session {session_id} {location}")]
    AlreadyRecording {
        /// The session that is currently open.
        session_id: SessionId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stop requested while no recording is in progress.
    #[error("Not recording {location}")]
    NotRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Session does not exist or is not owned by the requester.
    #[error("Session not found {location}")]
    NotFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Actuator command outside the recognized set.
    #[error("Invalid command: {command:?} {location}")]
    InvalidCommand {
        /// The rejected command text.
        command: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persistence store operation failed.
    #[error("Persistence error: {reason} {location}")]
    Persistence {
        /// Description of the store failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Transport refused an outbound publish.
    #[error("Publish failed: {reason} {location}")]
    Publish {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Invalid construction parameters.
    #[error("Invalid configuration: {reason} {location}")]
    InvalidConfig {
        /// Description of the invalid parameter.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
