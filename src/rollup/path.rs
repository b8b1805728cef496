//! Rollup identifier paths
//!
//! Rollup ids encode their hierarchy with `/` separators: `"A/B/C"` lives under
//! `"A/B"`, which lives under `"A"`.

/// Segment separator inside rollup identifiers
pub const SEPARATOR: char = '/';

/// Expand a rollup id into its ancestor chain, root first and `id` itself last.
///
/// `"A/B/C"` expands to `["A", "A/B", "A/B/C"]`. Every `/` contributes exactly one
/// prefix, so empty segments are kept as-is rather than collapsed.
pub fn expand_ancestors(id: &str) -> Vec<String> {
    let mut chain: Vec<String> = id
        .match_indices(SEPARATOR)
        .map(|(index, _)| id[..index].to_string())
        .collect();
    chain.push(id.to_string());
    chain
}
