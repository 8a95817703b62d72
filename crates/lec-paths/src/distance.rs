use lec_core::{Mesh, VertexId};

use crate::traits::CostStrategy;

/// Straight-line (L2) distance between two mesh vertices.
#[inline]
pub fn euclidean(mesh: &Mesh, a: VertexId, b: VertexId) -> f64 {
    if a == b {
        return 0.0;
    }
    mesh.point(a).distance(mesh.point(b))
}

/// Default cost strategy: elevation change dominates, with a small share of
/// the distance travelled.
///
/// `cost = floor(|z(from) - z(to)| + distance_weight * distance)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevationCost {
    pub distance_weight: f64,
}

impl ElevationCost {
    pub const DEFAULT_DISTANCE_WEIGHT: f64 = 0.004;

    pub fn new(distance_weight: f64) -> Self {
        Self { distance_weight }
    }
}

impl Default for ElevationCost {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DISTANCE_WEIGHT)
    }
}

impl CostStrategy for ElevationCost {
    fn cost(&self, mesh: &Mesh, from: VertexId, to: VertexId, distance: f64) -> i32 {
        if from == to {
            return 0;
        }
        let climb = (mesh.elevation(from) - mesh.elevation(to)).abs();
        // Float to int casts saturate, so huge climbs clamp at i32::MAX.
        (climb + distance * self.distance_weight).floor() as i32
    }
}
