//! StorageConfig and path resolution for the agent store.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_flush_every_ms() -> Option<u64> {
    Some(500)
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory; `None` means `$XDG_DATA_HOME/agentdir/store`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Discard the store when the process exits
    #[serde(default)]
    pub temporary: bool,

    /// Page cache size for the embedded store, in bytes
    #[serde(default)]
    pub cache_capacity_bytes: Option<u64>,

    /// Background flush interval; `None` disables background flushing
    #[serde(default = "default_flush_every_ms")]
    pub flush_every_ms: Option<u64>,
}

impl StorageConfig {
    /// Resolve the store directory.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => xdg::default_store_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            temporary: false,
            cache_capacity_bytes: None,
            flush_every_ms: default_flush_every_ms(),
        }
    }
}
