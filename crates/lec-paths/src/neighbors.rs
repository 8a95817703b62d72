use lec_core::{Mesh, VertexId};

use crate::traits::NeighborStrategy;

/// Default neighbor strategy: every vertex sharing a triangle with `v`,
/// keeping only those at or above the sea level.
///
/// Neighbors are returned in ascending vertex order without duplicates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeaLevelNeighbors {
    pub sea_level: f64,
}

impl Default for SeaLevelNeighbors {
    fn default() -> Self {
        Self { sea_level: 0.0 }
    }
}

impl SeaLevelNeighbors {
    pub fn new(sea_level: f64) -> Self {
        Self { sea_level }
    }
}

impl NeighborStrategy for SeaLevelNeighbors {
    fn neighbors(&self, mesh: &Mesh, v: VertexId, buf: &mut Vec<VertexId>) {
        buf.extend(
            mesh.cell_corners(v)
                .filter(|&n| n != v && mesh.elevation(n) >= self.sea_level),
        );
        buf.sort_unstable();
        buf.dedup();
    }
}

/// Neighbor strategy backed by a precomputed connectivity table.
///
/// Rows are indexed by vertex; negative entries are padding, so tables with
/// a fixed row width (as exported by mesh preprocessing tools) can be used
/// directly. Entries below sea level are skipped at lookup time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecomputedNeighbors {
    rows: Vec<Vec<i64>>,
    pub sea_level: f64,
}

impl PrecomputedNeighbors {
    /// Wrap a padded table. Row `v` lists the neighbors of vertex `v`.
    pub fn from_padded(rows: Vec<Vec<i64>>, sea_level: f64) -> Self {
        Self { rows, sea_level }
    }

    /// Build the table from mesh adjacency, without any elevation filter
    /// baked in.
    pub fn from_mesh(mesh: &Mesh, sea_level: f64) -> Self {
        let mut buf = Vec::new();
        let rows = (0..mesh.len())
            .map(|v| {
                buf.clear();
                buf.extend(mesh.cell_corners(v).filter(|&n| n != v));
                buf.sort_unstable();
                buf.dedup();
                buf.iter().map(|&n| n as i64).collect()
            })
            .collect();
        Self { rows, sea_level }
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl NeighborStrategy for PrecomputedNeighbors {
    fn neighbors(&self, mesh: &Mesh, v: VertexId, buf: &mut Vec<VertexId>) {
        let Some(row) = self.rows.get(v) else {
            return;
        };
        buf.extend(
            row.iter()
                .filter(|&&n| n >= 0)
                .map(|&n| n as VertexId)
                // Out-of-range entries are passed through; the search
                // reports them as a configuration error.
                .filter(|&n| !mesh.contains(n) || mesh.elevation(n) >= self.sea_level),
        );
    }
}
