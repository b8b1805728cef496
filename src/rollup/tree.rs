//! Rollup forest construction
//!
//! Builds the ordered forest of [`AgentRollup`] nodes from the flat
//! `(agent id, parent rollup id)` relation held in the agent index. Grouping nodes
//! that were never registered as agents are synthesized from the `/` segments of
//! the parent ids.

use crate::rollup::path::expand_ancestors;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// A node of the rollup forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRollup {
    pub id: String,
    /// True for directly registered agents, false for synthesized grouping nodes
    pub leaf: bool,
    pub children: Vec<AgentRollup>,
}

impl AgentRollup {
    /// Depth-first search for a node by id
    pub fn find(&self, id: &str) -> Option<&AgentRollup> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.id.as_str()).collect()
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AgentRollup::node_count).sum::<usize>()
    }
}

/// Parent -> children edges, deduplicated, in first-registration order.
#[derive(Default)]
struct EdgeMap {
    children: HashMap<String, Vec<String>>,
    seen: HashSet<(String, String)>,
}

impl EdgeMap {
    fn insert(&mut self, parent: &str, child: &str) {
        if self.seen.insert((parent.to_string(), child.to_string())) {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(child.to_string());
        }
    }

    fn children_of(&self, parent: &str) -> &[String] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Case-insensitive ordering for top-level rollups, exact order as tie-break
fn case_insensitive(a: &String, b: &String) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Build the rollup forest from `(agent id, parent rollup id)` pairs.
///
/// Every call rebuilds the whole forest; nothing is cached between calls.
pub fn build_forest<I>(pairs: I) -> Vec<AgentRollup>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let mut agents: HashSet<String> = HashSet::new();
    let mut top_level: HashSet<String> = HashSet::new();
    let mut parented: Vec<(String, String)> = Vec::new();
    let mut parents: Vec<String> = Vec::new();
    let mut parents_seen: HashSet<String> = HashSet::new();

    for (agent_id, parent) in pairs {
        agents.insert(agent_id.clone());
        match parent {
            None => {
                top_level.insert(agent_id);
            }
            Some(parent) => {
                if parents_seen.insert(parent.clone()) {
                    parents.push(parent.clone());
                }
                parented.push((agent_id, parent));
            }
        }
    }

    let mut edges = EdgeMap::default();
    for parent in &parents {
        let chain = expand_ancestors(parent);
        top_level.insert(chain[0].clone());
        for pair in chain.windows(2) {
            edges.insert(&pair[0], &pair[1]);
        }
    }
    for (agent_id, parent) in &parented {
        edges.insert(parent, agent_id);
    }

    let mut roots: Vec<String> = top_level.into_iter().collect();
    roots.sort_by(case_insensitive);

    let mut path = Vec::new();
    roots
        .iter()
        .map(|root| materialize(root, &edges, &agents, &mut path))
        .collect()
}

fn materialize<'a>(
    id: &'a str,
    edges: &'a EdgeMap,
    agents: &HashSet<String>,
    path: &mut Vec<&'a str>,
) -> AgentRollup {
    path.push(id);
    let mut children = Vec::new();
    for child in edges.children_of(id) {
        if path.contains(&child.as_str()) {
            warn!(rollup_id = %id, child_id = %child, "Skipping rollup edge that forms a cycle");
            continue;
        }
        children.push(materialize(child, edges, agents, path));
    }
    path.pop();
    AgentRollup {
        id: id.to_string(),
        leaf: agents.contains(id),
        children,
    }
}
