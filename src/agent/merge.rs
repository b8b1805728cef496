//! Registration-time configuration merge.
//!
//! When an already-known agent registers again it sends its current configuration.
//! The agent decides which plugins and properties exist; the server keeps the
//! values that were set for properties that still exist.

use super::config::{AgentConfig, PluginConfig, PluginProperty};
use std::collections::HashMap;

/// Merge an incoming registration config over the stored one.
///
/// - no stored config: `incoming` is returned untouched
/// - plugins and properties follow `incoming` (order and membership)
/// - a property present on both sides takes the stored value
/// - the `general` section is taken from the stored config
pub fn merge_for_registration(
    existing: Option<&AgentConfig>,
    incoming: AgentConfig,
) -> AgentConfig {
    let Some(existing) = existing else {
        return incoming;
    };

    let existing_plugins: HashMap<&str, &PluginConfig> = existing
        .plugins
        .iter()
        .map(|plugin| (plugin.id.as_str(), plugin))
        .collect();

    let plugins = incoming
        .plugins
        .into_iter()
        .map(|plugin| match existing_plugins.get(plugin.id.as_str()) {
            Some(stored) => merge_plugin(stored, plugin),
            None => plugin,
        })
        .collect();

    AgentConfig {
        general: existing.general.clone(),
        plugins,
    }
}

fn merge_plugin(stored: &PluginConfig, incoming: PluginConfig) -> PluginConfig {
    let stored_properties: HashMap<&str, &PluginProperty> = stored
        .properties
        .iter()
        .map(|property| (property.name.as_str(), property))
        .collect();

    let properties = incoming
        .properties
        .into_iter()
        .map(|mut property| {
            if let Some(stored) = stored_properties.get(property.name.as_str()) {
                property.value = stored.value.clone();
            }
            property
        })
        .collect();

    PluginConfig {
        id: incoming.id,
        name: incoming.name,
        properties,
    }
}
