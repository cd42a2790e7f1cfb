use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}
