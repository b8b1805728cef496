//! Core identifier and token types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// ConfigUpdateToken: correlates one in-flight configuration push with its acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigUpdateToken(Uuid);

impl ConfigUpdateToken {
    /// Generate a fresh, random token
    pub fn generate() -> Self {
        ConfigUpdateToken(Uuid::new_v4())
    }
}

impl From<Uuid> for ConfigUpdateToken {
    fn from(uuid: Uuid) -> Self {
        ConfigUpdateToken(uuid)
    }
}

impl fmt::Display for ConfigUpdateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ConfigUpdateToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ConfigUpdateToken)
    }
}
