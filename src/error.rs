//! Error types
//!
//! Two layers: [`StorageError`] for the persistence backend and payload codecs,
//! [`ApiError`] for the directory facade, configuration and CLI.

use thiserror::Error;

/// Errors raised by an [`AgentStore`](crate::store::AgentStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connectivity, I/O or corruption reported by the backing store itself.
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: bincode::Error,
    },

    /// Stored bytes exist but cannot be decoded. Never collapsed into absence.
    #[error("corrupt {what} payload for agent '{agent_id}': {source}")]
    Decode {
        agent_id: String,
        what: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("invalid key in {tree}: {reason}")]
    InvalidKey { tree: &'static str, reason: String },
}

/// Errors surfaced to callers of the directory facade and tooling.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl ApiError {
    /// True when the underlying failure is a corrupted stored payload.
    pub fn is_corrupt_payload(&self) -> bool {
        matches!(self, ApiError::Storage(StorageError::Decode { .. }))
    }
}
