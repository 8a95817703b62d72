//! Run configuration.

use lec_core::{LecError, Mesh};
use lec_paths::{CacheCapacity, ElevationCost, SeaLevelNeighbors};

/// What to do when the search from one start vertex fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FailurePolicy {
    /// Stop and return the error. This is the default.
    #[default]
    Abort,
    /// Log the failure, leave the field value at zero and carry on.
    Skip,
}

/// Settings for one accessibility run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LecConfig {
    /// Upper bound on the cumulative cost of every search.
    pub max_fuel: i32,
    /// Vertices below this elevation are neither starts nor neighbors.
    pub sea_level: f64,
    /// Share of the travelled distance added to the elevation change.
    pub distance_weight: f64,
    /// Neighbor cache entries per worker. Defaults to the vertex count.
    pub neighbors_cache_size: Option<usize>,
    /// Cost and distance cache entries per worker. Defaults to the neighbor
    /// cache size.
    pub other_cache_size: Option<usize>,
    /// Minimum number of start vertices handed to a worker at once.
    pub chunk_size: usize,
    /// Abort a search whose frontier holds more entries than this.
    pub frontier_limit: Option<usize>,
    pub failure_policy: FailurePolicy,
    /// Log progress every this many finished start vertices. Zero disables.
    pub progress_interval: usize,
    /// Worker threads. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl Default for LecConfig {
    fn default() -> Self {
        Self {
            max_fuel: 2000,
            sea_level: 0.0,
            distance_weight: ElevationCost::DEFAULT_DISTANCE_WEIGHT,
            neighbors_cache_size: None,
            other_cache_size: None,
            chunk_size: 10,
            frontier_limit: None,
            failure_policy: FailurePolicy::Abort,
            progress_interval: 1000,
            threads: None,
        }
    }
}

impl LecConfig {
    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), LecError> {
        if self.max_fuel <= 0 {
            return Err(LecError::NonPositiveFuel(self.max_fuel));
        }
        if self.neighbors_cache_size == Some(0) {
            return Err(LecError::ZeroCacheCapacity("neighbor"));
        }
        if self.other_cache_size == Some(0) {
            return Err(LecError::ZeroCacheCapacity("cost"));
        }
        if !self.sea_level.is_finite() {
            return Err(LecError::InvalidConfig(format!(
                "sea level must be finite, got {}",
                self.sea_level
            )));
        }
        if !self.distance_weight.is_finite() || self.distance_weight < 0.0 {
            return Err(LecError::InvalidConfig(format!(
                "distance weight must be finite and non-negative, got {}",
                self.distance_weight
            )));
        }
        if self.chunk_size == 0 {
            return Err(LecError::InvalidConfig("chunk size must be non-zero".into()));
        }
        if self.frontier_limit == Some(0) {
            return Err(LecError::InvalidConfig("frontier limit must be non-zero".into()));
        }
        if self.threads == Some(0) {
            return Err(LecError::InvalidConfig("thread count must be non-zero".into()));
        }
        Ok(())
    }

    /// Per-worker cache limits for `mesh`.
    pub fn cache_capacity(&self, mesh: &Mesh) -> CacheCapacity {
        CacheCapacity::from_sizes(mesh, self.neighbors_cache_size, self.other_cache_size)
    }

    /// The default cost strategy with this configuration's weight.
    pub fn cost_strategy(&self) -> ElevationCost {
        ElevationCost::new(self.distance_weight)
    }

    /// The default neighbor strategy with this configuration's sea level.
    pub fn neighbor_strategy(&self) -> SeaLevelNeighbors {
        SeaLevelNeighbors::new(self.sea_level)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let c: LecConfig =
            serde_json::from_str(r#"{"max_fuel": 300, "failure_policy": "skip"}"#).unwrap();
        assert_eq!(c.max_fuel, 300);
        assert_eq!(c.failure_policy, FailurePolicy::Skip);
        assert_eq!(c.chunk_size, 10);
        assert_eq!(c.sea_level, 0.0);
    }
}
