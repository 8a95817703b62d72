//! [`CostModel`]: memoized neighbor, distance and cost queries on a mesh.

use std::num::NonZeroUsize;

use lec_core::{LecError, Mesh, VertexId};

use crate::cache::{CacheStats, LruCache};
use crate::distance::{ElevationCost, euclidean};
use crate::neighbors::SeaLevelNeighbors;
use crate::traits::{CostStrategy, NeighborStrategy};

/// Entry limits for the three caches of a [`CostModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheCapacity {
    pub neighbors: usize,
    pub costs: usize,
    pub distances: usize,
}

impl CacheCapacity {
    /// The same limit for every cache.
    pub const fn uniform(n: usize) -> Self {
        Self {
            neighbors: n,
            costs: n,
            distances: n,
        }
    }

    /// One entry per vertex of `mesh` in each cache.
    pub fn for_mesh(mesh: &Mesh) -> Self {
        Self::uniform(mesh.len().max(1))
    }

    /// Neighbor cache size plus a shared size for the pair caches.
    ///
    /// `neighbors` defaults to the vertex count and `other` defaults to
    /// whatever the neighbor cache ends up with.
    pub fn from_sizes(mesh: &Mesh, neighbors: Option<usize>, other: Option<usize>) -> Self {
        let neighbors = neighbors.unwrap_or(mesh.len().max(1));
        let other = other.unwrap_or(neighbors);
        Self {
            neighbors,
            costs: other,
            distances: other,
        }
    }

    fn checked(self) -> Result<[NonZeroUsize; 3], LecError> {
        let nz = |n: usize, name| NonZeroUsize::new(n).ok_or(LecError::ZeroCacheCapacity(name));
        Ok([
            nz(self.neighbors, "neighbor")?,
            nz(self.costs, "cost")?,
            nz(self.distances, "distance")?,
        ])
    }
}

/// Cache counters of a [`CostModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelStats {
    pub neighbors: CacheStats,
    pub costs: CacheStats,
    pub distances: CacheStats,
}

/// Neighbor, distance and travel-cost queries over a [`Mesh`], each backed
/// by its own bounded LRU cache.
///
/// The cost and neighbor rules are strategies fixed at construction. A
/// model is meant to be owned by one worker and reused across many searches
/// so that the caches stay warm; it is never shared between threads.
///
/// Every query takes vertex ids that must be valid for the mesh. Passing an
/// out-of-range id is a bug in the caller and panics.
pub struct CostModel<'m, C = ElevationCost, N = SeaLevelNeighbors> {
    mesh: &'m Mesh,
    cost_fn: C,
    neighbor_fn: N,
    neighbors: LruCache<VertexId, Box<[VertexId]>>,
    costs: LruCache<(VertexId, VertexId), i32>,
    distances: LruCache<(VertexId, VertexId), f64>,
    nbuf: Vec<VertexId>,
}

impl<'m> CostModel<'m> {
    /// A model with the default strategies and one cache entry per vertex.
    pub fn new(mesh: &'m Mesh) -> Self {
        let n = NonZeroUsize::new(mesh.len()).unwrap_or(NonZeroUsize::MIN);
        Self::build(
            mesh,
            ElevationCost::default(),
            SeaLevelNeighbors::default(),
            [n; 3],
        )
    }
}

impl<'m, C, N> CostModel<'m, C, N> {
    /// The mesh being queried.
    #[inline]
    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    /// The configured cache limits.
    pub fn capacity(&self) -> CacheCapacity {
        CacheCapacity {
            neighbors: self.neighbors.capacity(),
            costs: self.costs.capacity(),
            distances: self.distances.capacity(),
        }
    }

    /// Counters for the three caches.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            neighbors: self.neighbors.stats(),
            costs: self.costs.stats(),
            distances: self.distances.stats(),
        }
    }

    /// Forget every memoized value.
    pub fn clear_caches(&mut self) {
        self.neighbors.clear();
        self.costs.clear();
        self.distances.clear();
    }
}

impl<'m, C: CostStrategy, N: NeighborStrategy> CostModel<'m, C, N> {
    /// A model with custom strategies and cache limits.
    ///
    /// Fails if any cache limit is zero.
    pub fn with_strategies(
        mesh: &'m Mesh,
        cost_fn: C,
        neighbor_fn: N,
        capacity: CacheCapacity,
    ) -> Result<Self, LecError> {
        Ok(Self::build(mesh, cost_fn, neighbor_fn, capacity.checked()?))
    }

    fn build(mesh: &'m Mesh, cost_fn: C, neighbor_fn: N, capacity: [NonZeroUsize; 3]) -> Self {
        Self {
            mesh,
            cost_fn,
            neighbor_fn,
            neighbors: LruCache::new(capacity[0]),
            costs: LruCache::new(capacity[1]),
            distances: LruCache::new(capacity[2]),
            nbuf: Vec::with_capacity(16),
        }
    }

    /// Vertices one step away from `v`, as decided by the neighbor strategy.
    ///
    /// `v` itself is never included.
    pub fn neighbors(&mut self, v: VertexId) -> &[VertexId] {
        self.assert_vertex(v);
        let mesh = self.mesh;
        let strategy = &self.neighbor_fn;
        let buf = &mut self.nbuf;
        &self.neighbors.get_or_insert_with(v, || {
            buf.clear();
            strategy.neighbors(mesh, v, buf);
            buf.retain(|&n| n != v);
            Box::from(buf.as_slice())
        })[..]
    }

    /// Euclidean distance between `a` and `b`. Symmetric, zero on the diagonal.
    pub fn distance(&mut self, a: VertexId, b: VertexId) -> f64 {
        self.assert_vertex(a);
        self.assert_vertex(b);
        if a == b {
            return 0.0;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        let mesh = self.mesh;
        *self
            .distances
            .get_or_insert_with(key, || euclidean(mesh, key.0, key.1))
    }

    /// Travel cost of stepping from `from` to `to`. Zero on the diagonal.
    pub fn cost(&mut self, from: VertexId, to: VertexId) -> i32 {
        self.assert_vertex(from);
        self.assert_vertex(to);
        if from == to {
            return 0;
        }
        if let Some(&c) = self.costs.get(&(from, to)) {
            return c;
        }
        let d = self.distance(from, to);
        let c = self.cost_fn.cost(self.mesh, from, to, d);
        self.costs.insert((from, to), c);
        c
    }

    #[inline]
    fn assert_vertex(&self, v: VertexId) {
        assert!(
            self.mesh.contains(v),
            "vertex {v} out of range for mesh of {} vertices",
            self.mesh.len()
        );
    }
}
