//! [`Explorer`]: the per-worker entry point combining model, search and
//! aggregation.

use lec_core::{LecError, Mesh, VertexId};

use crate::aggregate::{self, AggregatedResult};
use crate::cost_model::CostModel;
use crate::distance::ElevationCost;
use crate::neighbors::SeaLevelNeighbors;
use crate::search::{CostSearch, SearchResult};
use crate::traits::{CostStrategy, NeighborStrategy};

/// Computes the accessibility of start vertices with a fixed fuel budget.
///
/// An explorer owns one [`CostModel`] and one [`CostSearch`], so a worker
/// that keeps its explorer across many start vertices reuses warm caches and
/// search buffers. Each call is independent of the previous ones: results
/// depend only on the mesh, the strategies, the fuel and the start.
pub struct Explorer<'m, C = ElevationCost, N = SeaLevelNeighbors> {
    model: CostModel<'m, C, N>,
    search: CostSearch,
    fuel: i32,
    searches: u64,
}

impl<'m> Explorer<'m> {
    /// An explorer with the default cost model.
    pub fn new(mesh: &'m Mesh, fuel: i32) -> Result<Self, LecError> {
        Self::with_model(CostModel::new(mesh), fuel)
    }
}

impl<'m, C: CostStrategy, N: NeighborStrategy> Explorer<'m, C, N> {
    /// Wrap an existing model. `fuel` must be positive.
    pub fn with_model(model: CostModel<'m, C, N>, fuel: i32) -> Result<Self, LecError> {
        if fuel <= 0 {
            return Err(LecError::NonPositiveFuel(fuel));
        }
        let search = CostSearch::for_mesh(model.mesh());
        Ok(Self {
            model,
            search,
            fuel,
            searches: 0,
        })
    }

    /// Abort searches whose frontier grows past `limit` entries.
    pub fn with_frontier_limit(mut self, limit: Option<usize>) -> Self {
        self.search.set_frontier_limit(limit);
        self
    }

    /// The fuel budget of every search.
    pub fn fuel(&self) -> i32 {
        self.fuel
    }

    /// The underlying cost model.
    pub fn model(&self) -> &CostModel<'m, C, N> {
        &self.model
    }

    /// Number of searches run so far.
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Run the search from `start` and return its tree.
    pub fn search(&mut self, start: VertexId) -> Result<SearchResult<'_>, LecError> {
        self.searches += 1;
        self.search.run(&mut self.model, start, self.fuel)
    }

    /// Total leaf distance reachable from `start`.
    pub fn total_distance(&mut self, start: VertexId) -> Result<f64, LecError> {
        let result = self.search(start)?;
        Ok(aggregate::total_distance(&result))
    }

    /// `(start, total distance)` for one start vertex.
    pub fn evaluate(&mut self, start: VertexId) -> Result<AggregatedResult, LecError> {
        let result = self.search(start)?;
        Ok(aggregate::aggregate(&result))
    }
}

impl<C, N> Drop for Explorer<'_, C, N> {
    fn drop(&mut self) {
        if self.searches == 0 {
            return;
        }
        let stats = self.model.stats();
        log::debug!(
            "explorer finished {} searches (hit rates: neighbors {:.1}%, costs {:.1}%, distances {:.1}%)",
            self.searches,
            stats.neighbors.hit_rate() * 100.0,
            stats.costs.hit_rate() * 100.0,
            stats.distances.hit_rate() * 100.0,
        );
    }
}
