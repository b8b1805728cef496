//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::StoreConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<StoreConfig, ConfigError> {
        MergeService::load()
    }

    /// Load configuration, layering a specific file when given.
    pub fn load_with(path: Option<&Path>) -> Result<StoreConfig, ConfigError> {
        match path {
            Some(path) => MergeService::load_from_file(path),
            None => MergeService::load(),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<StoreConfig, ConfigError> {
        MergeService::load_from_file(path)
    }
}
