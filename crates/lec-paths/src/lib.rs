//! Fuel-bounded least-cost search over terrain meshes.
//!
//! This crate computes how far effort can carry a traveler across a
//! triangulated terrain:
//!
//! - [`CostModel`] answers neighbor, distance and travel-cost queries, each
//!   memoized in its own bounded LRU cache ([`LruCache`])
//! - [`CostSearch`] runs a uniform-cost search from one start vertex,
//!   never spending more than a fuel budget
//! - [`aggregate`] reduces the resulting tree to the summed distance of its
//!   leaves
//! - [`Explorer`] ties the three together as a per-worker
//!   `start -> (start, total distance)` function
//!
//! # Strategies
//!
//! | Trait | Default | Alternatives |
//! |---|---|---|
//! | [`NeighborStrategy`] | [`SeaLevelNeighbors`] | [`PrecomputedNeighbors`], closures |
//! | [`CostStrategy`] | [`ElevationCost`] | closures |

pub mod aggregate;
mod cache;
mod cost_model;
mod dijkstra;
mod distance;
mod explorer;
mod neighbors;
mod search;
mod traits;

#[cfg(test)]
mod testing;

pub use aggregate::{AggregatedResult, leaves, total_distance};
pub use cache::{CacheStats, LruCache};
pub use cost_model::{CacheCapacity, CostModel, ModelStats};
pub use distance::{ElevationCost, euclidean};
pub use explorer::Explorer;
pub use neighbors::{PrecomputedNeighbors, SeaLevelNeighbors};
pub use search::{CostSearch, SearchNode, SearchResult};
pub use traits::{CostStrategy, NeighborStrategy};
