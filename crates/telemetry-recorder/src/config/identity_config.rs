use crate::config::default_owner_header;

use serde::{Deserialize, Serialize};

/// Identity layer integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Request header carrying the authenticated owner id.
    #[serde(default = "default_owner_header")]
    pub owner_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            owner_header: default_owner_header(),
        }
    }
}
