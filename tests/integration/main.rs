//! Integration tests for the agent directory store

mod caching;
mod directory_contract;
mod persistence;
mod support;
mod update_protocol;
