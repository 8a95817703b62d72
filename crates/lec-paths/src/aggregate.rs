//! Reduction of a search tree to a single accessibility figure.
//!
//! The leaves of a predecessor tree are the vertices no other vertex was
//! reached through: the far end of each branch, where fuel or terrain ran
//! out. Summing their cumulative distances measures how far effort carries
//! a traveler without counting shared path prefixes more than once.

use std::collections::HashSet;

use lec_core::VertexId;

use crate::search::SearchResult;

/// Total leaf distance for one start vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregatedResult {
    pub vertex: VertexId,
    pub total_distance: f64,
}

/// Vertices of `result` that are nobody's predecessor, in discovery order.
///
/// A start with no reachable neighbor is its own single leaf.
pub fn leaves(result: &SearchResult<'_>) -> Vec<VertexId> {
    let parents: HashSet<VertexId> = result.iter().filter_map(|n| n.parent).collect();
    result
        .vertices()
        .iter()
        .copied()
        .filter(|v| !parents.contains(v))
        .collect()
}

/// Sum of the cumulative distance of every leaf of `result`.
pub fn total_distance(result: &SearchResult<'_>) -> f64 {
    leaves(result)
        .into_iter()
        .filter_map(|v| result.distance(v))
        .sum()
}

/// [`total_distance`] paired with the start vertex.
pub fn aggregate(result: &SearchResult<'_>) -> AggregatedResult {
    AggregatedResult {
        vertex: result.start(),
        total_distance: total_distance(result),
    }
}
