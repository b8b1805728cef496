use agentdir::store::{AgentRecord, AgentStore, IndexEntry};
use agentdir::{
    AgentConfig, AgentDirectory, ConfigUpdateToken, Environment, PluginConfig, PluginProperty,
    PropertyValue, SledAgentStore, StorageError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub fn sled_directory() -> (TempDir, AgentDirectory<SledAgentStore>) {
    let dir = TempDir::new().unwrap();
    let store = SledAgentStore::open(dir.path().join("store")).unwrap();
    (dir, AgentDirectory::new(store))
}

pub fn plugin_config(plugin: &str, property: &str, value: PropertyValue) -> AgentConfig {
    let property = PluginProperty::new(property, value);
    AgentConfig::new(vec![PluginConfig::new(plugin, plugin.to_uppercase()).with_property(property)])
}

pub fn register<S: AgentStore>(
    directory: &AgentDirectory<S>,
    agent_id: &str,
    parent: Option<&str>,
) {
    directory
        .register_or_merge(
            agent_id,
            parent,
            &Environment::for_host(agent_id),
            AgentConfig::default(),
        )
        .unwrap();
}

/// Store wrapper counting backend record reads
pub struct CountingStore<S> {
    inner: S,
    reads: Arc<AtomicUsize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                reads: reads.clone(),
            },
            reads,
        )
    }
}

impl<S: AgentStore> AgentStore for CountingStore<S> {
    fn read_record(&self, agent_id: &str) -> Result<Option<AgentRecord>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_record(agent_id)
    }

    fn write_record(&self, agent_id: &str, record: &AgentRecord) -> Result<(), StorageError> {
        self.inner.write_record(agent_id, record)
    }

    fn write_pending_config(
        &self,
        agent_id: &str,
        config: Vec<u8>,
        token: ConfigUpdateToken,
    ) -> Result<(), StorageError> {
        self.inner.write_pending_config(agent_id, config, token)
    }

    fn clear_pending_update(
        &self,
        agent_id: &str,
        token: &ConfigUpdateToken,
    ) -> Result<bool, StorageError> {
        self.inner.clear_pending_update(agent_id, token)
    }

    fn index_contains(&self, agent_id: &str) -> Result<bool, StorageError> {
        self.inner.index_contains(agent_id)
    }

    fn index_insert(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
    ) -> Result<(), StorageError> {
        self.inner.index_insert(agent_id, parent_rollup_id)
    }

    fn index_entries(&self) -> Result<Vec<IndexEntry>, StorageError> {
        self.inner.index_entries()
    }
}
