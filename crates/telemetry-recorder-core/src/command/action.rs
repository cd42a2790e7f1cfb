use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Actuator actions understood by the sensor board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Switch the actuator on.
    Engage,
    /// Switch the actuator off.
    Disengage,
}

impl Action {
    /// Canonical wire token published on the command topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Engage => "LIGAR",
            Action::Disengage => "DESLIGAR",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    /// Parses a canonical token. Matching is exact.
    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "LIGAR" => Ok(Action::Engage),
            "DESLIGAR" => Ok(Action::Disengage),
            other => Err(CoreError::InvalidCommand {
                command: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
