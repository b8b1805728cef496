use crate::support::{plugin_config, register, sled_directory};
use agentdir::{ConfigUpdateToken, PropertyValue, UpdateState};
use std::sync::Arc;
use std::thread;

#[test]
fn push_then_acknowledge_clears_pending() {
    let (_dir, directory) = sled_directory();
    register(&directory, "a1", None);

    let config = plugin_config("p", "x", PropertyValue::from(3.0));
    let token = directory.request_config_update("a1", &config).unwrap();

    let pending = directory.peek_pending_update("a1").unwrap().unwrap();
    assert_eq!(pending.token, token);
    assert_eq!(pending.config, config);

    assert!(directory.acknowledge("a1", &token).unwrap());
    assert!(directory.peek_pending_update("a1").unwrap().is_none());
    assert_eq!(directory.read_config("a1").unwrap(), Some(config));
}

#[test]
fn stale_token_does_not_clear_newer_push() {
    let (_dir, directory) = sled_directory();
    register(&directory, "a1", None);

    let first = directory
        .request_config_update("a1", &plugin_config("p", "x", PropertyValue::from(1.0)))
        .unwrap();
    let second = directory
        .request_config_update("a1", &plugin_config("p", "x", PropertyValue::from(2.0)))
        .unwrap();
    assert_ne!(first, second);

    assert!(!directory.acknowledge("a1", &first).unwrap());
    assert_eq!(
        directory.read_update_state("a1").unwrap(),
        Some(UpdateState::PendingUpdate(second))
    );

    assert!(directory.acknowledge("a1", &second).unwrap());
    assert!(!directory.acknowledge("a1", &second).unwrap());
}

#[test]
fn acknowledging_unknown_agent_is_a_no_op() {
    let (_dir, directory) = sled_directory();
    assert!(!directory
        .acknowledge("ghost", &ConfigUpdateToken::generate())
        .unwrap());
    assert_eq!(directory.read_update_state("ghost").unwrap(), None);
}

#[test]
fn push_to_unregistered_agent_creates_bare_record() {
    let (_dir, directory) = sled_directory();
    let config = plugin_config("p", "x", PropertyValue::from(true));
    let token = directory.overwrite_config("fresh", &config).unwrap();

    assert!(directory.is_leaf("fresh").unwrap());
    assert_eq!(directory.read_environment("fresh").unwrap(), None);
    assert_eq!(directory.read_config("fresh").unwrap(), Some(config));
    assert!(directory.list_rollup_forest().unwrap().is_empty());
    assert_eq!(directory.peek_pending_update("fresh").unwrap().unwrap().token, token);
}

#[test]
fn push_preserves_parent_and_environment() {
    let (_dir, directory) = sled_directory();
    register(&directory, "a1", Some("prod"));
    directory
        .request_config_update("a1", &plugin_config("p", "x", PropertyValue::from(1.0)))
        .unwrap();

    assert_eq!(directory.read_ancestor_chain("a1").unwrap(), vec!["a1", "prod"]);
    assert!(directory.read_environment("a1").unwrap().is_some());
}

#[test]
fn concurrent_pushes_leave_exactly_one_acknowledgeable_token() {
    let (_dir, directory) = sled_directory();
    register(&directory, "a1", None);
    let directory = Arc::new(directory);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let directory = directory.clone();
            thread::spawn(move || {
                let config = plugin_config("p", "x", PropertyValue::from(i as f64));
                directory.request_config_update("a1", &config).unwrap()
            })
        })
        .collect();
    let tokens: Vec<ConfigUpdateToken> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let current = directory.peek_pending_update("a1").unwrap().unwrap().token;
    let acknowledged: Vec<bool> = tokens
        .iter()
        .map(|token| directory.acknowledge("a1", token).unwrap())
        .collect();
    assert_eq!(acknowledged.iter().filter(|ok| **ok).count(), 1);
    let position = tokens.iter().position(|t| *t == current).unwrap();
    assert!(acknowledged[position]);
}
