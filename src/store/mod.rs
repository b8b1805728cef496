//! Agent Record Store
//!
//! Persistence contract for agent records and the agent index. Backends provide
//! per-identifier linearizable reads and writes plus one conditional update, the
//! pending-token compare-and-swap used by acknowledgments. There are no
//! cross-identifier transactions.

pub mod codec;
pub mod memory;
pub mod persistence;

use crate::error::StorageError;
use crate::types::ConfigUpdateToken;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use memory::MemoryAgentStore;
pub use persistence::SledAgentStore;

/// AgentRecord: everything stored for one agent id
///
/// `environment` and `config` hold encoded payloads; either may be missing when a
/// registration crashed half way or a record was created by a config push alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub parent_rollup_id: Option<String>,
    pub environment: Option<Vec<u8>>,
    pub config: Option<Vec<u8>>,
    /// Pending flag and token in one field: pending iff `Some`
    pub pending_update: Option<ConfigUpdateToken>,
}

/// Entry of the agent index: one per registered agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub agent_id: String,
    pub parent_rollup_id: Option<String>,
}

impl From<IndexEntry> for (String, Option<String>) {
    fn from(entry: IndexEntry) -> Self {
        (entry.agent_id, entry.parent_rollup_id)
    }
}

/// AgentStore: persistence backend interface
pub trait AgentStore: Send + Sync {
    fn read_record(&self, agent_id: &str) -> Result<Option<AgentRecord>, StorageError>;

    /// Replace the whole record (registration path, last writer wins)
    fn write_record(&self, agent_id: &str, record: &AgentRecord) -> Result<(), StorageError>;

    /// Set `config` and mark a pending update with `token`, creating a bare record
    /// if none exists. Parent and environment of an existing record are preserved.
    fn write_pending_config(
        &self,
        agent_id: &str,
        config: Vec<u8>,
        token: ConfigUpdateToken,
    ) -> Result<(), StorageError>;

    /// Clear the pending update only if its token equals `token`.
    ///
    /// Must be a single conditional update on the backend. Returns whether the
    /// pending state was cleared.
    fn clear_pending_update(
        &self,
        agent_id: &str,
        token: &ConfigUpdateToken,
    ) -> Result<bool, StorageError>;

    fn index_contains(&self, agent_id: &str) -> Result<bool, StorageError>;

    fn index_insert(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
    ) -> Result<(), StorageError>;

    /// All registered agents
    fn index_entries(&self) -> Result<Vec<IndexEntry>, StorageError>;
}

impl<S: AgentStore + ?Sized> AgentStore for Arc<S> {
    fn read_record(&self, agent_id: &str) -> Result<Option<AgentRecord>, StorageError> {
        (**self).read_record(agent_id)
    }

    fn write_record(&self, agent_id: &str, record: &AgentRecord) -> Result<(), StorageError> {
        (**self).write_record(agent_id, record)
    }

    fn write_pending_config(
        &self,
        agent_id: &str,
        config: Vec<u8>,
        token: ConfigUpdateToken,
    ) -> Result<(), StorageError> {
        (**self).write_pending_config(agent_id, config, token)
    }

    fn clear_pending_update(
        &self,
        agent_id: &str,
        token: &ConfigUpdateToken,
    ) -> Result<bool, StorageError> {
        (**self).clear_pending_update(agent_id, token)
    }

    fn index_contains(&self, agent_id: &str) -> Result<bool, StorageError> {
        (**self).index_contains(agent_id)
    }

    fn index_insert(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
    ) -> Result<(), StorageError> {
        (**self).index_insert(agent_id, parent_rollup_id)
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>, StorageError> {
        (**self).index_entries()
    }
}
