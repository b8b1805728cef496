use crate::support::{plugin_config, register};
use agentdir::store::{AgentRecord, AgentStore};
use agentdir::{AgentDirectory, PropertyValue, SledAgentStore};
use tempfile::TempDir;

#[test]
fn state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");
    let token = {
        let directory = AgentDirectory::new(SledAgentStore::open(&path).unwrap());
        register(&directory, "a1", Some("A/B"));
        let token = directory
            .request_config_update("a1", &plugin_config("p", "x", PropertyValue::from(true)))
            .unwrap();
        directory.store().flush().unwrap();
        token
    };

    let directory = AgentDirectory::new(SledAgentStore::open(&path).unwrap());
    assert_eq!(
        directory.read_ancestor_chain("a1").unwrap(),
        vec!["a1", "A/B", "A"]
    );
    assert_eq!(directory.peek_pending_update("a1").unwrap().unwrap().token, token);
    assert_eq!(directory.list_rollup_forest().unwrap().len(), 1);
}

#[test]
fn corrupt_config_payload_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = SledAgentStore::open(dir.path().join("store")).unwrap();
    store
        .write_record(
            "broken",
            &AgentRecord {
                parent_rollup_id: None,
                environment: Some(vec![0xff; 3]),
                config: Some(vec![0xff; 3]),
                pending_update: None,
            },
        )
        .unwrap();
    let directory = AgentDirectory::new(store);

    let err = directory.read_config("broken").unwrap_err();
    assert!(err.is_corrupt_payload());
    let err = directory.read_environment("broken").unwrap_err();
    assert!(err.is_corrupt_payload());
}

#[test]
fn purged_agent_reads_as_absent() {
    let dir = TempDir::new().unwrap();
    let store = SledAgentStore::open(dir.path().join("store")).unwrap();
    let directory = AgentDirectory::new(store);
    register(&directory, "a1", None);
    directory.store().purge("a1").unwrap();

    assert!(directory.list_rollup_forest().unwrap().is_empty());
    assert_eq!(directory.read_environment("a1").unwrap(), None);
}
