//! Sled-backed agent store
//!
//! Two trees: `agent` holds the bincode-encoded [`AgentRecord`] per agent id and
//! `agent_index` holds the parent rollup id of every registered agent. Conditional
//! updates use `compare_and_swap` on the encoded record.

use super::codec;
use super::{AgentRecord, AgentStore, IndexEntry};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::types::ConfigUpdateToken;
use sled::IVec;
use std::path::Path;
use tracing::debug;

const AGENT_TREE: &str = "agent";
const INDEX_TREE: &str = "agent_index";

pub struct SledAgentStore {
    db: sled::Db,
    agents: sled::Tree,
    index: sled::Tree,
}

impl SledAgentStore {
    /// Open (or create) a store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Self::from_db(sled::open(path)?)
    }

    /// Open a store using storage settings; `path` is the resolved location
    pub fn open_with(config: &StorageConfig, path: &Path) -> Result<Self, StorageError> {
        let mut sled_config = sled::Config::new()
            .path(path)
            .temporary(config.temporary)
            .flush_every_ms(config.flush_every_ms);
        if let Some(capacity) = config.cache_capacity_bytes {
            sled_config = sled_config.cache_capacity(capacity);
        }
        Self::from_db(sled_config.open()?)
    }

    /// Store deleted when dropped
    pub fn temporary() -> Result<Self, StorageError> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let agents = db.open_tree(AGENT_TREE)?;
        let index = db.open_tree(INDEX_TREE)?;
        Ok(Self { db, agents, index })
    }

    /// Flush dirty buffers to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    /// Out-of-band deletion of an agent record and its index entry
    pub fn purge(&self, agent_id: &str) -> Result<(), StorageError> {
        self.index.remove(agent_id.as_bytes())?;
        self.agents.remove(agent_id.as_bytes())?;
        Ok(())
    }

    fn decode_record(agent_id: &str, bytes: &[u8]) -> Result<AgentRecord, StorageError> {
        codec::decode(agent_id, "agent record", bytes)
    }

    /// Apply `update` to the current record with compare-and-swap, retrying only
    /// when the stored bytes changed between read and swap.
    ///
    /// `update` returns `None` to leave the record untouched. Returns whether a
    /// new record was written.
    fn update_record<F>(&self, agent_id: &str, mut update: F) -> Result<bool, StorageError>
    where
        F: FnMut(Option<AgentRecord>) -> Option<AgentRecord>,
    {
        let key = agent_id.as_bytes();
        loop {
            let current: Option<IVec> = self.agents.get(key)?;
            let record = match current.as_deref() {
                Some(bytes) => Some(Self::decode_record(agent_id, bytes)?),
                None => None,
            };
            let Some(updated) = update(record) else {
                return Ok(false);
            };
            let encoded = codec::encode("agent record", &updated)?;
            match self.agents.compare_and_swap(key, current, Some(encoded))? {
                Ok(()) => return Ok(true),
                Err(_) => {
                    debug!(agent_id, "Agent record changed during conditional update, retrying");
                }
            }
        }
    }
}

impl AgentStore for SledAgentStore {
    fn read_record(&self, agent_id: &str) -> Result<Option<AgentRecord>, StorageError> {
        match self.agents.get(agent_id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode_record(agent_id, &bytes)?)),
            None => Ok(None),
        }
    }

    fn write_record(&self, agent_id: &str, record: &AgentRecord) -> Result<(), StorageError> {
        let encoded = codec::encode("agent record", record)?;
        self.agents.insert(agent_id.as_bytes(), encoded)?;
        Ok(())
    }

    fn write_pending_config(
        &self,
        agent_id: &str,
        config: Vec<u8>,
        token: ConfigUpdateToken,
    ) -> Result<(), StorageError> {
        self.update_record(agent_id, |record| {
            let mut record = record.unwrap_or_default();
            record.config = Some(config.clone());
            record.pending_update = Some(token);
            Some(record)
        })?;
        Ok(())
    }

    fn clear_pending_update(
        &self,
        agent_id: &str,
        token: &ConfigUpdateToken,
    ) -> Result<bool, StorageError> {
        self.update_record(agent_id, |record| {
            let mut record = record?;
            if record.pending_update.as_ref() != Some(token) {
                return None;
            }
            record.pending_update = None;
            Some(record)
        })
    }

    fn index_contains(&self, agent_id: &str) -> Result<bool, StorageError> {
        Ok(self.index.contains_key(agent_id.as_bytes())?)
    }

    fn index_insert(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
    ) -> Result<(), StorageError> {
        let encoded = codec::encode("agent index entry", &parent_rollup_id)?;
        self.index.insert(agent_id.as_bytes(), encoded)?;
        Ok(())
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>, StorageError> {
        let mut entries = Vec::new();
        for item in self.index.iter() {
            let (key, value) = item?;
            let agent_id = String::from_utf8(key.to_vec()).map_err(|e| StorageError::InvalidKey {
                tree: INDEX_TREE,
                reason: e.to_string(),
            })?;
            let parent_rollup_id: Option<String> =
                codec::decode(&agent_id, "agent index entry", &value)?;
            entries.push(IndexEntry {
                agent_id,
                parent_rollup_id,
            });
        }
        Ok(entries)
    }
}
