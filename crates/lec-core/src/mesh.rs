//! The [`Mesh`] type: an immutable triangulated terrain surface.
//!
//! A mesh owns three aligned pieces of data: 3D vertex coordinates, one
//! elevation value per vertex (the `Z` field), and triangles given as
//! triples of vertex indices. A vertex→triangle incidence table is built once
//! at construction so that adjacency queries never scan the cell list.

use glam::DVec3;

use crate::error::LecError;

/// Index of a vertex in a [`Mesh`]. Stable for the lifetime of the mesh.
pub type VertexId = usize;

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

/// A triangulated terrain mesh with a per-vertex elevation field.
///
/// Meshes are validated on construction and never change afterwards, so a
/// single `Mesh` can be shared by reference across worker threads.
#[derive(Debug, Clone)]
pub struct Mesh {
    points: Vec<DVec3>,
    elevation: Vec<f64>,
    triangles: Vec<[VertexId; 3]>,
    // Incidence in compressed rows: the cells touching vertex `v` are
    // `cell_ids[cell_offsets[v]..cell_offsets[v + 1]]`.
    cell_offsets: Vec<usize>,
    cell_ids: Vec<usize>,
}

impl Mesh {
    /// Build a mesh from its coordinates, elevation field and triangles.
    ///
    /// Fails if the elevation field is not aligned with the points, if an
    /// elevation is not finite, or if a triangle references a missing vertex.
    pub fn new(
        points: Vec<DVec3>,
        elevation: Vec<f64>,
        triangles: Vec<[VertexId; 3]>,
    ) -> Result<Self, LecError> {
        let len = points.len();
        if elevation.len() != len {
            return Err(LecError::ElevationLength {
                points: len,
                elevations: elevation.len(),
            });
        }
        if let Some((vertex, &value)) = elevation.iter().enumerate().find(|(_, z)| !z.is_finite())
        {
            return Err(LecError::NonFiniteElevation { vertex, value });
        }
        for (cell, tri) in triangles.iter().enumerate() {
            if let Some(&vertex) = tri.iter().find(|&&v| v >= len) {
                return Err(LecError::InvalidCell { cell, vertex, len });
            }
        }

        let (cell_offsets, cell_ids) = build_incidence(len, &triangles);
        Ok(Self {
            points,
            elevation,
            triangles,
            cell_offsets,
            cell_ids,
        })
    }

    /// Build a mesh whose elevation field is the `z` coordinate of each point.
    pub fn from_points(points: Vec<DVec3>, triangles: Vec<[VertexId; 3]>) -> Result<Self, LecError> {
        let elevation = points.iter().map(|p| p.z).collect();
        Self::new(points, elevation, triangles)
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `v` is a valid vertex id.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        v < self.points.len()
    }

    /// Return `Ok(())` if `v` is a valid vertex id.
    pub fn check_vertex(&self, v: VertexId) -> Result<(), LecError> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(LecError::InvalidVertex {
                vertex: v,
                len: self.len(),
            })
        }
    }

    /// Coordinates of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[inline]
    pub fn point(&self, v: VertexId) -> DVec3 {
        self.points[v]
    }

    /// Elevation of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[inline]
    pub fn elevation(&self, v: VertexId) -> f64 {
        self.elevation[v]
    }

    /// All vertex coordinates.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// The whole elevation field.
    pub fn elevations(&self) -> &[f64] {
        &self.elevation
    }

    /// All triangles.
    pub fn triangles(&self) -> &[[VertexId; 3]] {
        &self.triangles
    }

    /// Indices of the triangles that contain `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    pub fn incident_cells(&self, v: VertexId) -> &[usize] {
        &self.cell_ids[self.cell_offsets[v]..self.cell_offsets[v + 1]]
    }

    /// Every corner of every triangle containing `v`, including `v` itself.
    ///
    /// Vertices shared by several triangles are yielded once per triangle.
    pub fn cell_corners(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incident_cells(v)
            .iter()
            .flat_map(|&c| self.triangles[c].iter().copied())
    }

    /// Vertices whose elevation is at or above `level`, in ascending order.
    pub fn vertices_at_or_above(&self, level: f64) -> Vec<VertexId> {
        self.elevation
            .iter()
            .enumerate()
            .filter(|&(_, &z)| z >= level)
            .map(|(v, _)| v)
            .collect()
    }
}

/// Build the compressed vertex→triangle table. A degenerate triangle that
/// repeats a vertex is listed once for that vertex.
fn build_incidence(len: usize, triangles: &[[VertexId; 3]]) -> (Vec<usize>, Vec<usize>) {
    let distinct = |tri: &[VertexId; 3], i: usize| !tri[..i].contains(&tri[i]);

    let mut offsets = vec![0usize; len + 1];
    for tri in triangles {
        for i in 0..3 {
            if distinct(tri, i) {
                offsets[tri[i] + 1] += 1;
            }
        }
    }
    for v in 0..len {
        offsets[v + 1] += offsets[v];
    }

    let mut fill = offsets.clone();
    let mut ids = vec![0usize; offsets[len]];
    for (cell, tri) in triangles.iter().enumerate() {
        for i in 0..3 {
            if distinct(tri, i) {
                let v = tri[i];
                ids[fill[v]] = cell;
                fill[v] += 1;
            }
        }
    }
    (offsets, ids)
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;

    #[derive(serde::Serialize)]
    struct MeshRef<'a> {
        points: &'a [DVec3],
        elevation: &'a [f64],
        triangles: &'a [[VertexId; 3]],
    }

    #[derive(serde::Deserialize)]
    struct MeshData {
        points: Vec<DVec3>,
        elevation: Vec<f64>,
        triangles: Vec<[VertexId; 3]>,
    }

    impl serde::Serialize for Mesh {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let data = MeshRef {
                points: &self.points,
                elevation: &self.elevation,
                triangles: &self.triangles,
            };
            serde::Serialize::serialize(&data, serializer)
        }
    }

    // The incidence table is rebuilt rather than trusted from the input.
    impl<'de> serde::Deserialize<'de> for Mesh {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let data = <MeshData as serde::Deserialize>::deserialize(deserializer)?;
            Mesh::new(data.points, data.elevation, data.triangles)
                .map_err(serde::de::Error::custom)
        }
    }
}
