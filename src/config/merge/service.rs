//! MergeService: orchestrates sources, applies precedence, deserializes to StoreConfig.

use crate::config::sources::{environment, file};
use crate::config::StoreConfig;
use config::ConfigError;
use std::path::Path;

use super::builder_with_defaults;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> global file -> environment (highest).
    pub fn load() -> Result<StoreConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_global_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config with an explicit file layered over the global one.
    pub fn load_from_file(path: &Path) -> Result<StoreConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = file::add_global_to_builder(builder)?;
        let builder = file::add_explicit_to_builder(builder, path)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
