use std::collections::BinaryHeap;

use lec_core::{Mesh, VertexId};

/// A vertex reached by a search, with its predecessor and cumulative totals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchNode {
    pub vertex: VertexId,
    /// `None` for the start vertex.
    pub parent: Option<VertexId>,
    pub cost: i32,
    pub distance: f64,
}

// ---------------------------------------------------------------------------
// Internal node and frontier entry
// ---------------------------------------------------------------------------

pub(crate) const NO_PARENT: usize = usize::MAX;

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) cost: i32,
    pub(crate) distance: f64,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            cost: 0,
            distance: 0.0,
            parent: NO_PARENT,
            generation: 0,
        }
    }
}

/// Frontier entry ordered by cost for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct FrontierEntry {
    pub(crate) vertex: VertexId,
    pub(crate) cost: i32,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops the cheapest entry first;
        // equal costs pop in ascending vertex order.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// CostSearch
// ---------------------------------------------------------------------------

/// Reusable state for fuel-bounded least-cost searches.
///
/// `CostSearch` owns a node slot per vertex, the frontier heap and a
/// neighbor scratch buffer. Slots are invalidated lazily with a generation
/// counter, so a search only touches the vertices it reaches and repeated
/// searches do not allocate after warm-up.
pub struct CostSearch {
    pub(crate) nodes: Vec<Node>,
    pub(crate) generation: u32,
    pub(crate) start: VertexId,
    pub(crate) reached: Vec<VertexId>,
    pub(crate) frontier_limit: Option<usize>,
    pub(crate) stale_pops: usize,
    pub(crate) expansions: usize,
    pub(crate) open: BinaryHeap<FrontierEntry>,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<VertexId>,
}

impl Default for CostSearch {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CostSearch {
    /// Create search state for meshes of up to `len` vertices. Larger meshes
    /// grow the state on first use.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![Node::default(); len],
            generation: 0,
            start: 0,
            reached: Vec::new(),
            frontier_limit: None,
            stale_pops: 0,
            expansions: 0,
            open: BinaryHeap::new(),
            nbuf: Vec::with_capacity(16),
        }
    }

    /// Create search state sized for `mesh`.
    pub fn for_mesh(mesh: &Mesh) -> Self {
        Self::new(mesh.len())
    }

    /// Abort searches whose frontier grows past `limit` entries.
    pub fn with_frontier_limit(mut self, limit: usize) -> Self {
        self.frontier_limit = Some(limit);
        self
    }

    /// Set or remove the frontier limit.
    pub fn set_frontier_limit(&mut self, limit: Option<usize>) {
        self.frontier_limit = limit;
    }

    /// The frontier limit, if any.
    pub fn frontier_limit(&self) -> Option<usize> {
        self.frontier_limit
    }

    /// Number of outdated frontier entries the last search discarded.
    pub fn stale_pops(&self) -> usize {
        self.stale_pops
    }

    /// The outcome of the most recent search.
    ///
    /// If that search failed, the view holds whatever had been reached
    /// before the failure.
    pub fn result(&self) -> SearchResult<'_> {
        SearchResult {
            start: self.start,
            nodes: &self.nodes,
            reached: &self.reached,
            generation: self.generation,
        }
    }

    /// Invalidate the previous search and make room for `len` vertices.
    pub(crate) fn prepare(&mut self, len: usize) {
        if self.nodes.len() < len {
            self.nodes.resize(len, Node::default());
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Slots stamped 2^32 searches ago would look current again.
            for n in self.nodes.iter_mut() {
                n.generation = 0;
            }
            self.generation = 1;
        }
        self.reached.clear();
        self.stale_pops = 0;
        self.expansions = 0;
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// Read-only view of one search: a predecessor tree rooted at the start
/// vertex, with the cumulative cost and distance of every reached vertex.
#[derive(Clone, Copy)]
pub struct SearchResult<'a> {
    start: VertexId,
    nodes: &'a [Node],
    reached: &'a [VertexId],
    generation: u32,
}

impl<'a> SearchResult<'a> {
    /// The vertex the search started from.
    #[inline]
    pub fn start(&self) -> VertexId {
        self.start
    }

    /// Number of reached vertices, start included.
    #[inline]
    pub fn len(&self) -> usize {
        self.reached.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reached.is_empty()
    }

    /// Reached vertices in discovery order. The start comes first.
    pub fn vertices(&self) -> &'a [VertexId] {
        self.reached
    }

    /// Whether `v` was reached within the fuel budget.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.nodes
            .get(v)
            .is_some_and(|n| n.generation == self.generation)
    }

    /// Full record for `v`, or `None` if it was not reached.
    pub fn node(&self, v: VertexId) -> Option<SearchNode> {
        if !self.contains(v) {
            return None;
        }
        let n = &self.nodes[v];
        Some(SearchNode {
            vertex: v,
            parent: (n.parent != NO_PARENT).then_some(n.parent),
            cost: n.cost,
            distance: n.distance,
        })
    }

    /// Predecessor of `v`. `None` for the start and for unreached vertices.
    pub fn predecessor(&self, v: VertexId) -> Option<VertexId> {
        self.node(v).and_then(|n| n.parent)
    }

    /// Least cumulative cost from the start to `v`.
    pub fn cost(&self, v: VertexId) -> Option<i32> {
        self.node(v).map(|n| n.cost)
    }

    /// Cumulative distance travelled along the least-cost path to `v`.
    pub fn distance(&self, v: VertexId) -> Option<f64> {
        self.node(v).map(|n| n.distance)
    }

    /// Iterate over every reached vertex in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = SearchNode> + 'a {
        let this = *self;
        let reached = self.reached;
        reached.iter().filter_map(move |&v| this.node(v))
    }

    /// The least-cost path from the start to `v`, both endpoints included.
    pub fn path_to(&self, v: VertexId) -> Option<Vec<VertexId>> {
        if !self.contains(v) {
            return None;
        }
        let mut path = Vec::new();
        let mut ci = v;
        while ci != NO_PARENT {
            path.push(ci);
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }
}
