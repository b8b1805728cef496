//! Agent configuration shape.
//!
//! The persisted payload an agent reports at registration and the server pushes
//! back on update. Encoded with bincode when stored, so fields are positional and
//! must not use skip/flatten attributes.

use serde::{Deserialize, Serialize};

/// Full configuration of one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Server-owned settings, never taken from the agent on re-registration
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl AgentConfig {
    pub fn new(plugins: Vec<PluginConfig>) -> Self {
        Self {
            general: GeneralConfig::default(),
            plugins,
        }
    }

    pub fn plugin(&self, id: &str) -> Option<&PluginConfig> {
        self.plugins.iter().find(|p| p.id == id)
    }
}

/// Server-side general settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub slow_threshold_millis: Option<u32>,
    #[serde(default)]
    pub profiling_interval_millis: Option<u32>,
    #[serde(default)]
    pub capture_thread_stats: bool,
}

/// Per-plugin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PluginProperty>,
}

impl PluginConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PluginProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PluginProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A single plugin property.
///
/// `value` is the only field the server owns; the descriptive fields always follow
/// the agent's plugin definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginProperty {
    pub name: String,
    pub value: PropertyValue,
    #[serde(default)]
    pub default: Option<PropertyValue>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub checkbox_label: String,
    #[serde(default)]
    pub description: String,
}

impl PluginProperty {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
            default: None,
            label: String::new(),
            checkbox_label: String::new(),
            description: String::new(),
        }
    }
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Bool(bool),
    /// `None` is an explicitly empty numeric field
    Double(Option<f64>),
    String(String),
    List(Vec<String>),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(Some(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}
