//! Input validation for agent identifiers and configuration payloads.

use super::config::AgentConfig;
use std::collections::HashSet;

/// Validate an agent or rollup identifier.
///
/// Only blank ids are rejected. Empty path segments (`"A//B"`, `"A/"`) are legal and
/// expand like any other segment.
pub fn validate_agent_id(agent_id: &str) -> Result<(), String> {
    if agent_id.trim().is_empty() {
        return Err("Agent ID cannot be empty".to_string());
    }
    Ok(())
}

/// Validate agent configuration.
///
/// Plugin ids must be unique and non-empty; property names must be unique within
/// their plugin. Merging relies on both being stable keys.
pub fn validate_agent_config(config: &AgentConfig) -> Result<(), String> {
    let mut plugin_ids = HashSet::new();
    for plugin in &config.plugins {
        if plugin.id.trim().is_empty() {
            return Err("Plugin ID cannot be empty".to_string());
        }
        if !plugin_ids.insert(plugin.id.as_str()) {
            return Err(format!("Duplicate plugin ID '{}'", plugin.id));
        }

        let mut names = HashSet::new();
        for property in &plugin.properties {
            if property.name.trim().is_empty() {
                return Err(format!("Plugin '{}' has a property with no name", plugin.id));
            }
            if !names.insert(property.name.as_str()) {
                return Err(format!(
                    "Plugin '{}' declares property '{}' more than once",
                    plugin.id, property.name
                ));
            }
        }
    }
    Ok(())
}
