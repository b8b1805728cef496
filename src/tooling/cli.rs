//! CLI Tooling
//!
//! Administrative command-line access to an agent store. Every command prints
//! JSON on stdout.

use crate::agent::{validate_agent_config, AgentConfig, Environment};
use crate::config::{ConfigLoader, StoreConfig};
use crate::directory::AgentDirectory;
use crate::error::ApiError;
use crate::store::SledAgentStore;
use crate::types::ConfigUpdateToken;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// agentdir - agent directory and configuration synchronization store
#[derive(Parser, Debug)]
#[command(name = "agentdir")]
#[command(about = "Agent directory and configuration synchronization store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the rollup forest
    Rollups,
    /// Report whether an id is a registered agent
    Leaf { agent_id: String },
    /// Print an agent id followed by its rollups, nearest first
    Ancestors { agent_id: String },
    /// Register an agent (or re-register and merge its config)
    Register {
        agent_id: String,
        /// Parent rollup id, e.g. "prod/eu"
        #[arg(long)]
        parent: Option<String>,
        /// JSON file with the agent environment
        #[arg(long)]
        environment: PathBuf,
        /// JSON file with the agent config
        #[arg(long)]
        agent_config: PathBuf,
    },
    /// Print the environment reported by an agent
    Environment { agent_id: String },
    /// Agent config commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print the pending config update of an agent
    Pending { agent_id: String },
    /// Acknowledge a config update
    Ack { agent_id: String, token: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the stored config
    Show { agent_id: String },
    /// Overwrite the config and mark it pending for the agent
    Push { agent_id: String, file: PathBuf },
}

impl Cli {
    /// Load layered configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<StoreConfig, ApiError> {
        let mut config = ConfigLoader::load_with(self.config.as_deref())?;
        if let Some(store) = &self.store {
            config.storage.path = Some(store.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        Ok(config)
    }
}

/// CLI context: the opened directory commands run against
pub struct CliContext {
    directory: AgentDirectory<SledAgentStore>,
}

impl CliContext {
    /// Open the store described by `config`
    pub fn new(config: &StoreConfig) -> Result<Self, ApiError> {
        let path = config.storage.resolve_path()?;
        if !config.storage.temporary {
            std::fs::create_dir_all(&path)?;
        }
        let store = SledAgentStore::open_with(&config.storage, &path)?;
        info!(path = %path.display(), "Opened agent store");
        Ok(Self::from_directory(AgentDirectory::new(store)))
    }

    pub fn from_directory(directory: AgentDirectory<SledAgentStore>) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &AgentDirectory<SledAgentStore> {
        &self.directory
    }

    /// Execute a command and return its JSON output
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let output = match command {
            Commands::Rollups => serde_json::to_value(self.directory.list_rollup_forest()?)?,
            Commands::Leaf { agent_id } => json!({
                "agent_id": agent_id,
                "leaf": self.directory.is_leaf(agent_id)?,
            }),
            Commands::Ancestors { agent_id } => {
                serde_json::to_value(self.directory.read_ancestor_chain(agent_id)?)?
            }
            Commands::Register {
                agent_id,
                parent,
                environment,
                agent_config,
            } => {
                let environment: Environment = read_json_file(environment)?;
                let config: AgentConfig = read_json_file(agent_config)?;
                validate_agent_config(&config).map_err(ApiError::InvalidInput)?;
                let stored = self.directory.register_or_merge(
                    agent_id,
                    parent.as_deref(),
                    &environment,
                    config,
                )?;
                serde_json::to_value(stored)?
            }
            Commands::Environment { agent_id } => {
                let environment = self
                    .directory
                    .read_environment(agent_id)?
                    .ok_or_else(|| ApiError::AgentNotFound(agent_id.clone()))?;
                serde_json::to_value(environment)?
            }
            Commands::Config { command } => self.execute_config(command)?,
            Commands::Pending { agent_id } => json!({
                "agent_id": agent_id,
                "update": self.directory.peek_pending_update(agent_id)?,
            }),
            Commands::Ack { agent_id, token } => {
                let parsed: ConfigUpdateToken = token.parse().map_err(|e| {
                    ApiError::InvalidInput(format!("Invalid token '{}': {}", token, e))
                })?;
                json!({
                    "agent_id": agent_id,
                    "token": parsed,
                    "acknowledged": self.directory.acknowledge(agent_id, &parsed)?,
                })
            }
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn execute_config(&self, command: &ConfigCommands) -> Result<serde_json::Value, ApiError> {
        match command {
            ConfigCommands::Show { agent_id } => {
                let config = self
                    .directory
                    .read_config(agent_id)?
                    .ok_or_else(|| ApiError::AgentNotFound(agent_id.clone()))?;
                Ok(serde_json::to_value(config)?)
            }
            ConfigCommands::Push { agent_id, file } => {
                let config: AgentConfig = read_json_file(file)?;
                validate_agent_config(&config).map_err(ApiError::InvalidInput)?;
                let token = self.directory.overwrite_config(agent_id, &config)?;
                Ok(json!({ "agent_id": agent_id, "token": token }))
            }
        }
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ApiError::InvalidInput(format!("Failed to parse {}: {}", path.display(), e)))
}
