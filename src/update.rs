//! Configuration push protocol
//!
//! A push stores the new config together with a fresh [`ConfigUpdateToken`]. The
//! agent polls with [`AgentDirectory::peek_pending_update`], applies the config and
//! acknowledges with the token it received. The acknowledgment clears the pending
//! state only if no newer push replaced the token in between.
//!
//! [`AgentDirectory::peek_pending_update`]: crate::directory::AgentDirectory::peek_pending_update

use crate::agent::AgentConfig;
use crate::store::AgentRecord;
use crate::types::ConfigUpdateToken;
use serde::{Deserialize, Serialize};

/// Whether a configuration push is waiting for acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "token", rename_all = "snake_case")]
pub enum UpdateState {
    NoPendingUpdate,
    PendingUpdate(ConfigUpdateToken),
}

impl From<&AgentRecord> for UpdateState {
    fn from(record: &AgentRecord) -> Self {
        match record.pending_update {
            Some(token) => UpdateState::PendingUpdate(token),
            None => UpdateState::NoPendingUpdate,
        }
    }
}

/// A pending push as handed to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub config: AgentConfig,
    pub token: ConfigUpdateToken,
}
