//! Rollups
//!
//! Hierarchical grouping of agents derived from `/`-separated identifiers.

pub mod path;
pub mod tree;

pub use path::expand_ancestors;
pub use tree::{build_forest, AgentRollup};
