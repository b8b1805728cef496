use crate::support::{plugin_config, register, sled_directory};
use agentdir::{AgentConfig, Environment, PropertyValue};

#[test]
fn first_registration_stores_config_as_given() {
    let (_dir, directory) = sled_directory();
    let config = plugin_config("jdbc", "captureBindParameters", PropertyValue::from(true));

    let stored = directory
        .register_or_merge("a1", None, &Environment::for_host("h1"), config.clone())
        .unwrap();

    assert_eq!(stored, config);
    assert_eq!(directory.read_config("a1").unwrap(), Some(config));
    assert_eq!(
        directory.read_environment("a1").unwrap(),
        Some(Environment::for_host("h1"))
    );
}

#[test]
fn reregistration_keeps_stored_values_for_surviving_properties() {
    let (_dir, directory) = sled_directory();
    directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("jdbc", "threshold", PropertyValue::from(1.0)),
        )
        .unwrap();
    directory
        .request_config_update("a1", &plugin_config("jdbc", "threshold", PropertyValue::from(7.0)))
        .unwrap();

    let merged = directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("jdbc", "threshold", PropertyValue::from(2.0)),
        )
        .unwrap();

    let value = merged
        .plugin("jdbc")
        .and_then(|p| p.property("threshold"))
        .map(|p| p.value.clone());
    assert_eq!(value, Some(PropertyValue::from(7.0)));
    assert_eq!(directory.read_config("a1").unwrap(), Some(merged));
}

#[test]
fn reregistration_drops_properties_the_agent_no_longer_has() {
    let (_dir, directory) = sled_directory();
    directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("jdbc", "old", PropertyValue::from("x")),
        )
        .unwrap();

    let merged = directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("jdbc", "new", PropertyValue::from("y")),
        )
        .unwrap();

    let plugin = merged.plugin("jdbc").unwrap();
    assert!(plugin.property("old").is_none());
    assert_eq!(plugin.property("new").unwrap().value, PropertyValue::from("y"));
}

#[test]
fn ancestor_chain_lists_nearest_rollup_first() {
    let (_dir, directory) = sled_directory();
    register(&directory, "leaf1", Some("A/B/C"));
    register(&directory, "top", None);

    assert_eq!(
        directory.read_ancestor_chain("leaf1").unwrap(),
        vec!["leaf1", "A/B/C", "A/B", "A"]
    );
    assert_eq!(directory.read_ancestor_chain("top").unwrap(), vec!["top"]);
    assert_eq!(directory.read_ancestor_chain("nobody").unwrap(), vec!["nobody"]);
}

#[test]
fn missing_agent_reads_are_absent_not_errors() {
    let (_dir, directory) = sled_directory();
    assert_eq!(directory.read_config("ghost").unwrap(), None);
    assert_eq!(directory.read_environment("ghost").unwrap(), None);
    assert!(directory.peek_pending_update("ghost").unwrap().is_none());
    assert_eq!(directory.read_update_state("ghost").unwrap(), None);
    assert!(!directory.is_leaf("ghost").unwrap());
}

#[test]
fn blank_ids_are_rejected() {
    let (_dir, directory) = sled_directory();
    for id in ["", "   "] {
        let result =
            directory.register_or_merge(id, None, &Environment::default(), AgentConfig::default());
        assert!(result.is_err(), "id {:?} should be rejected", id);
    }
    let result = directory.register_or_merge(
        "a1",
        Some(""),
        &Environment::default(),
        AgentConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn empty_path_segments_are_accepted() {
    let (_dir, directory) = sled_directory();
    register(&directory, "a1", Some("A/"));
    register(&directory, "/b", None);

    assert_eq!(directory.read_ancestor_chain("a1").unwrap(), vec!["a1", "A/", "A"]);
    assert!(directory.is_leaf("/b").unwrap());
}
