use crate::support::{plugin_config, register, CountingStore};
use agentdir::{AgentDirectory, Environment, MemoryAgentStore, PropertyValue};
use std::sync::atomic::Ordering;

#[test]
fn absence_is_memoized() {
    let (store, reads) = CountingStore::new(MemoryAgentStore::new());
    let directory = AgentDirectory::new(store);

    assert_eq!(directory.read_config("ghost").unwrap(), None);
    assert_eq!(directory.read_config("ghost").unwrap(), None);
    assert!(!directory.is_leaf("ghost").unwrap());
    assert!(!directory.is_leaf("ghost").unwrap());

    // one load per cache
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    let stats = directory.cache_stats();
    assert_eq!(stats.config.misses, 1);
    assert_eq!(stats.config.hits, 1);
    assert_eq!(stats.rollup.misses, 1);
    assert_eq!(stats.rollup.hits, 1);
}

#[test]
fn writes_are_visible_to_later_reads() {
    let (store, _reads) = CountingStore::new(MemoryAgentStore::new());
    let directory = AgentDirectory::new(store);

    assert!(!directory.is_leaf("a1").unwrap());
    assert_eq!(directory.read_config("a1").unwrap(), None);

    register(&directory, "a1", Some("R"));
    assert!(directory.is_leaf("a1").unwrap());
    assert_eq!(directory.read_ancestor_chain("a1").unwrap(), vec!["a1", "R"]);

    let config = plugin_config("p", "x", PropertyValue::from(4.0));
    directory.request_config_update("a1", &config).unwrap();
    assert_eq!(directory.read_config("a1").unwrap(), Some(config));
}

#[test]
fn repeated_reads_are_served_from_cache() {
    let (store, reads) = CountingStore::new(MemoryAgentStore::new());
    let directory = AgentDirectory::new(store);
    register(&directory, "a1", Some("R"));
    let before = reads.load(Ordering::SeqCst);

    for _ in 0..5 {
        directory.read_config("a1").unwrap();
        directory.read_ancestor_chain("a1").unwrap();
    }
    assert_eq!(reads.load(Ordering::SeqCst), before + 2);
}

#[test]
fn reregistration_replaces_cached_config() {
    let directory = AgentDirectory::new(MemoryAgentStore::new());
    directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("p", "old", PropertyValue::from(1.0)),
        )
        .unwrap();
    let cached = directory.read_config("a1").unwrap().unwrap();
    assert!(cached.plugin("p").unwrap().property("old").is_some());

    let merged = directory
        .register_or_merge(
            "a1",
            None,
            &Environment::default(),
            plugin_config("p", "new", PropertyValue::from(2.0)),
        )
        .unwrap();

    let config = directory.read_config("a1").unwrap();
    assert_eq!(config, Some(merged));
    let plugin = config.as_ref().and_then(|c| c.plugin("p")).unwrap();
    assert!(plugin.property("old").is_none());
    assert!(plugin.property("new").is_some());
}

#[test]
fn push_to_unknown_agent_replaces_cached_absence() {
    let directory = AgentDirectory::new(MemoryAgentStore::new());
    assert!(!directory.is_leaf("fresh").unwrap());
    assert_eq!(directory.read_ancestor_chain("fresh").unwrap(), vec!["fresh"]);

    directory
        .request_config_update("fresh", &plugin_config("p", "x", PropertyValue::from(true)))
        .unwrap();

    assert!(directory.is_leaf("fresh").unwrap());
}
