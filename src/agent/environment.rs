//! Environment facts reported once by an agent at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Environment of a monitored process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub host: HostInfo,
    #[serde(default)]
    pub process: ProcessInfo,
    #[serde(default)]
    pub runtime: RuntimeInfo,
    /// Free-form properties (system properties, container labels, ...)
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub available_processors: u32,
    #[serde(default)]
    pub total_physical_memory_bytes: Option<u64>,
    #[serde(default)]
    pub os_name: String,
    #[serde(default)]
    pub os_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    #[serde(default)]
    pub process_id: Option<u64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub arguments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl Environment {
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            host: HostInfo {
                hostname: hostname.into(),
                ..HostInfo::default()
            },
            ..Environment::default()
        }
    }
}
