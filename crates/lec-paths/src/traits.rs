use lec_core::{Mesh, VertexId};

/// Neighbor enumeration. Decides which vertices a traveler can step to.
pub trait NeighborStrategy {
    /// Append the neighbors of `v` into `buf`. The caller clears `buf` before calling.
    ///
    /// Must be deterministic: the same `v` always yields the same vertices.
    fn neighbors(&self, mesh: &Mesh, v: VertexId, buf: &mut Vec<VertexId>);
}

/// Travel cost of a single step between adjacent vertices.
pub trait CostStrategy {
    /// Cost of moving from `from` to adjacent `to`, whose straight-line
    /// separation is `distance`. Must be >= 0.
    fn cost(&self, mesh: &Mesh, from: VertexId, to: VertexId, distance: f64) -> i32;
}

impl<F> NeighborStrategy for F
where
    F: Fn(&Mesh, VertexId, &mut Vec<VertexId>),
{
    #[inline]
    fn neighbors(&self, mesh: &Mesh, v: VertexId, buf: &mut Vec<VertexId>) {
        self(mesh, v, buf)
    }
}

impl<F> CostStrategy for F
where
    F: Fn(&Mesh, VertexId, VertexId, f64) -> i32,
{
    #[inline]
    fn cost(&self, mesh: &Mesh, from: VertexId, to: VertexId, distance: f64) -> i32 {
        self(mesh, from, to, distance)
    }
}
