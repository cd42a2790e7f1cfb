use crate::config::default_buffer_capacity;

use serde::{Deserialize, Serialize};

/// Live buffer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Number of most recent readings kept for the dashboard.
    #[serde(default = "default_buffer_capacity")]
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: default_buffer_capacity(),
        }
    }
}
