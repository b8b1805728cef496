//! Tooling Layer
//!
//! Command-line access to the agent directory for operators and scripts.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
