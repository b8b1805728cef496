//! Agent domain
//!
//! The payloads an agent reports (environment, configuration), the registration
//! merge policy, and input validation.

pub mod config;
pub mod environment;
pub mod merge;
pub mod validation;

pub use config::{AgentConfig, GeneralConfig, PluginConfig, PluginProperty, PropertyValue};
pub use environment::{Environment, HostInfo, ProcessInfo, RuntimeInfo};
pub use merge::merge_for_registration;
pub use validation::{validate_agent_config, validate_agent_id};
