//! Agent Directory
//!
//! Public facade over an [`AgentStore`]: registration with config merge, rollup
//! forest and ancestor queries, and the configuration push/acknowledge protocol.
//!
//! Two process-local caches sit in front of the store (agent id -> parent rollup,
//! agent id -> decoded config). Every mutating call invalidates the entries it
//! touched before returning, so reads in the same process see their own writes.
//! Other processes sharing the backend are not notified.
//!
//! Registration is not atomic: the index check, config read, merge and write are
//! separate backend calls, so two concurrent registrations of one agent can lose
//! one of the merges. Acknowledgment is atomic (backend compare-and-swap).

use crate::agent::{merge_for_registration, validate_agent_id, AgentConfig, Environment};
use crate::cache::{CacheStats, LoadingCache};
use crate::error::{ApiError, StorageError};
use crate::rollup::{build_forest, expand_ancestors, AgentRollup};
use crate::store::{codec, AgentRecord, AgentStore};
use crate::types::ConfigUpdateToken;
use crate::update::{ConfigUpdate, UpdateState};
use tracing::{debug, info, warn};

/// Counters of both directory caches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCacheStats {
    pub rollup: CacheStats,
    pub config: CacheStats,
}

pub struct AgentDirectory<S> {
    store: S,
    /// Present iff a record exists; the inner value is the parent rollup id
    rollup_cache: LoadingCache<Option<String>>,
    config_cache: LoadingCache<AgentConfig>,
}

impl<S: AgentStore> AgentDirectory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rollup_cache: LoadingCache::new("agent_rollup"),
            config_cache: LoadingCache::new("agent_config"),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Build the full rollup forest from the agent index
    pub fn list_rollup_forest(&self) -> Result<Vec<AgentRollup>, ApiError> {
        let entries = self.store.index_entries()?;
        let agent_count = entries.len();
        let forest = build_forest(entries.into_iter().map(Into::into));
        debug!(agents = agent_count, roots = forest.len(), "Built rollup forest");
        Ok(forest)
    }

    /// True iff a stored record exists for the id. Grouping nodes that only appear
    /// inside other ids' paths are not leaves.
    pub fn is_leaf(&self, agent_rollup_id: &str) -> Result<bool, ApiError> {
        Ok(self.cached_parent(agent_rollup_id)?.is_some())
    }

    /// Register an agent, merging its config with any stored one.
    ///
    /// Returns the config that was stored; the agent should adopt it. The stored
    /// record has no pending update.
    pub fn register_or_merge(
        &self,
        agent_id: &str,
        parent_rollup_id: Option<&str>,
        environment: &Environment,
        config: AgentConfig,
    ) -> Result<AgentConfig, ApiError> {
        validate_agent_id(agent_id).map_err(ApiError::InvalidInput)?;
        if let Some(parent) = parent_rollup_id {
            validate_agent_id(parent).map_err(ApiError::InvalidInput)?;
        }

        // an agent missing from the index is not listed anywhere, so a config left
        // in its record is not worth keeping
        let existing = if self.store.index_contains(agent_id)? {
            self.read_config(agent_id)?
        } else {
            None
        };
        let merged = merge_for_registration(existing.as_ref(), config);

        let record = AgentRecord {
            parent_rollup_id: parent_rollup_id.map(str::to_string),
            environment: Some(codec::encode("environment", environment)?),
            config: Some(codec::encode("config", &merged)?),
            pending_update: None,
        };
        self.store.write_record(agent_id, &record)?;
        // index last: readers that find the index entry also find the record
        self.store.index_insert(agent_id, parent_rollup_id)?;

        self.rollup_cache.invalidate(agent_id);
        self.config_cache.invalidate(agent_id);

        info!(
            agent_id,
            parent_rollup_id = ?parent_rollup_id,
            merged = existing.is_some(),
            plugins = merged.plugins.len(),
            "Registered agent"
        );
        Ok(merged)
    }

    /// Environment reported at registration; `None` if the agent or payload is missing
    pub fn read_environment(&self, agent_id: &str) -> Result<Option<Environment>, ApiError> {
        let Some(record) = self.store.read_record(agent_id)? else {
            debug!(agent_id, "No agent record, agent may have been removed");
            return Ok(None);
        };
        let Some(bytes) = record.environment else {
            debug!(agent_id, "Agent record has no environment payload");
            return Ok(None);
        };
        Ok(Some(codec::decode(agent_id, "environment", &bytes)?))
    }

    /// Current stored config (cached); `None` if the agent or payload is missing
    pub fn read_config(&self, agent_id: &str) -> Result<Option<AgentConfig>, ApiError> {
        let config = self.config_cache.get_or_try_load(agent_id, || -> Result<_, StorageError> {
            let Some(record) = self.store.read_record(agent_id)? else {
                debug!(agent_id, "No agent record, agent may have been removed");
                return Ok(None);
            };
            let Some(bytes) = record.config else {
                debug!(agent_id, "Agent record has no config payload");
                return Ok(None);
            };
            codec::decode(agent_id, "config", &bytes).map(Some)
        })?;
        Ok(config)
    }

    /// The agent id followed by its rollups, nearest first.
    ///
    /// `leaf1` under `A/B` gives `["leaf1", "A/B", "A"]`. Top-level and unknown
    /// agents give just `[agent_id]`.
    pub fn read_ancestor_chain(&self, agent_id: &str) -> Result<Vec<String>, ApiError> {
        let parent = match self.cached_parent(agent_id)? {
            Some(Some(parent)) => parent,
            Some(None) => return Ok(vec![agent_id.to_string()]),
            None => {
                debug!(agent_id, "No agent record, agent may have been removed");
                return Ok(vec![agent_id.to_string()]);
            }
        };
        let mut chain = expand_ancestors(&parent);
        chain.reverse();
        chain.insert(0, agent_id.to_string());
        Ok(chain)
    }

    /// Store `config` for the agent and mark it pending under a fresh token.
    ///
    /// Replaces any earlier pending push; the earlier token can no longer be
    /// acknowledged.
    pub fn request_config_update(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<ConfigUpdateToken, ApiError> {
        validate_agent_id(agent_id).map_err(ApiError::InvalidInput)?;
        let token = ConfigUpdateToken::generate();
        let encoded = codec::encode("config", config)?;
        self.store.write_pending_config(agent_id, encoded, token)?;

        self.config_cache.invalidate(agent_id);
        // the write may have created the record
        self.rollup_cache.invalidate(agent_id);

        info!(agent_id, token = %token, "Requested agent config update");
        Ok(token)
    }

    /// Administrative overwrite: bypasses the registration merge and always
    /// issues a fresh pending update.
    pub fn overwrite_config(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<ConfigUpdateToken, ApiError> {
        debug!(agent_id, "Overwriting agent config");
        self.request_config_update(agent_id, config)
    }

    /// The pending push for the agent, if any
    pub fn peek_pending_update(&self, agent_id: &str) -> Result<Option<ConfigUpdate>, ApiError> {
        let Some(record) = self.store.read_record(agent_id)? else {
            return Ok(None);
        };
        let Some(token) = record.pending_update else {
            return Ok(None);
        };
        let Some(bytes) = record.config else {
            warn!(agent_id, token = %token, "Pending update without a config payload");
            return Ok(None);
        };
        let config = codec::decode(agent_id, "config", &bytes)?;
        Ok(Some(ConfigUpdate { config, token }))
    }

    /// Update state of the agent; `None` if no record exists
    pub fn read_update_state(&self, agent_id: &str) -> Result<Option<UpdateState>, ApiError> {
        Ok(self
            .store
            .read_record(agent_id)?
            .as_ref()
            .map(UpdateState::from))
    }

    /// Clear the pending update if `token` is still the current one.
    ///
    /// A stale or unknown token is not an error: nothing changes and `false` is
    /// returned. The agent picks up the newer push on its next poll.
    pub fn acknowledge(&self, agent_id: &str, token: &ConfigUpdateToken) -> Result<bool, ApiError> {
        let cleared = self.store.clear_pending_update(agent_id, token)?;
        if cleared {
            info!(agent_id, token = %token, "Agent acknowledged config update");
        } else {
            debug!(
                agent_id,
                token = %token,
                "Ignoring acknowledgment for a token that is not pending"
            );
        }
        Ok(cleared)
    }

    pub fn cache_stats(&self) -> DirectoryCacheStats {
        DirectoryCacheStats {
            rollup: self.rollup_cache.stats(),
            config: self.config_cache.stats(),
        }
    }

    fn cached_parent(&self, agent_id: &str) -> Result<Option<Option<String>>, ApiError> {
        let parent = self.rollup_cache.get_or_try_load(agent_id, || {
            self.store
                .read_record(agent_id)
                .map(|record| record.map(|r| r.parent_rollup_id))
        })?;
        Ok(parent)
    }
}
