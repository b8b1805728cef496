//! In-process agent store for tests and single-process embedding.

use super::{AgentRecord, AgentStore, IndexEntry};
use crate::error::StorageError;
use crate::types::ConfigUpdateToken;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryAgentStore {
    agents: RwLock<BTreeMap<String, AgentRecord>>,
    index: RwLock<BTreeMap<String, Option<String>>>,
}

impl MemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-band deletion of an agent record and its index entry
    pub fn purge(&self, agent_id: &str) {
        self.index.write().remove(agent_id);
        self.agents.write().remove(agent_id);
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}

impl AgentStore for MemoryAgentStore {
    fn read_record(&self, agent_id: &str) -> Result<Option<AgentRecord>, StorageError> {
        Ok(self.agents.read().get(agent_id).cloned())
    }

    fn write_record(&self, agent_id: &str, record: &AgentRecord) -> Result<(), StorageError> {
        self.agents
            .write()
            .insert(agent_id.to_string(), record.clone());
        Ok(())
    }

    fn write_pending_config(
        &self,
        agent_id: &str,
        config: Vec<u8>,
        token: ConfigUpdateToken,
    ) -> Result<(), StorageError> {
        let mut agents = self.agents.write();
        let record = agents.entry(agent_id.to_string()).or_default();
        record.config = Some(config);
        record.pending_update = Some(token);
        Ok(())
    }

    fn clear_pending_update(
        &self,
        agent_id: &str,
        token: &ConfigUpdateToken,
    ) -> Result<bool, StorageError> {
        let mut agents = self.agents.write();
        match agents.get_mut(agent_id) {
            Some(record) if record.pending_update.as_ref() == Some(token) => {
                record.pending_update = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn index_contains(&self, agent_id: &str) -> Result<bool, StorageError> {
        Ok(self.index.read().contains_key(agent_id))
    }

    fn index_insert(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
    ) -> Result<(), StorageError> {
        self.index
            .write()
            .insert(agent_id.to_string(), parent_rollup_id.map(str::to_string));
        Ok(())
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>, StorageError> {
        Ok(self
            .index
            .read()
            .iter()
            .map(|(agent_id, parent)| IndexEntry {
                agent_id: agent_id.clone(),
                parent_rollup_id: parent.clone(),
            })
            .collect())
    }
}
