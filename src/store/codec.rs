//! Payload encoding for stored records (bincode).

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(what: &'static str, value: &T) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(value).map_err(|source| StorageError::Encode { what, source })
}

pub fn decode<T: DeserializeOwned>(
    agent_id: &str,
    what: &'static str,
    bytes: &[u8],
) -> Result<T, StorageError> {
    bincode::deserialize(bytes).map_err(|source| StorageError::Decode {
        agent_id: agent_id.to_string(),
        what,
        source,
    })
}
