//! Agentdir: Agent Directory & Configuration Synchronization Store
//!
//! Keeps track of registered monitoring agents, the rollup hierarchy their ids imply,
//! and the configuration each agent runs with. Administrative config changes are
//! handed to agents through a pending-update protocol guarded by update tokens.

pub mod agent;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod rollup;
pub mod store;
pub mod tooling;
pub mod types;
pub mod update;

pub use agent::{AgentConfig, Environment, PluginConfig, PluginProperty, PropertyValue};
pub use directory::{AgentDirectory, DirectoryCacheStats};
pub use error::{ApiError, StorageError};
pub use rollup::AgentRollup;
pub use store::{AgentStore, MemoryAgentStore, SledAgentStore};
pub use types::ConfigUpdateToken;
pub use update::{ConfigUpdate, UpdateState};
