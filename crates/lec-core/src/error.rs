//! The [`LecError`] type shared by every crate in the workspace.

use std::fmt;

use crate::mesh::VertexId;

/// Broad classification of a [`LecError`].
///
/// Callers driving many independent searches use this to decide whether a
/// failure is worth reporting per start vertex or should abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed something the API does not accept.
    PreconditionViolation,
    /// A custom cost or neighbor strategy produced an unusable value, or a
    /// configuration value is malformed.
    Configuration,
    /// The search frontier outgrew its configured limit.
    ResourceExhaustion,
}

/// Errors produced while building meshes, configuring models or searching.
#[derive(Debug, Clone, PartialEq)]
pub enum LecError {
    /// A vertex id does not index into the mesh.
    InvalidVertex { vertex: VertexId, len: usize },
    /// A triangle references a vertex that does not exist.
    InvalidCell {
        cell: usize,
        vertex: VertexId,
        len: usize,
    },
    /// The elevation field is not aligned with the vertex array.
    ElevationLength { points: usize, elevations: usize },
    /// An elevation value is NaN or infinite.
    NonFiniteElevation { vertex: VertexId, value: f64 },
    /// A search was started with a negative fuel budget.
    NegativeFuel(i32),
    /// A run was configured with a fuel budget that is zero or negative.
    NonPositiveFuel(i32),
    /// A cache was configured to hold nothing.
    ZeroCacheCapacity(&'static str),
    /// A cost strategy returned a negative step cost.
    NegativeCost {
        from: VertexId,
        to: VertexId,
        cost: i32,
    },
    /// A neighbor strategy returned a vertex outside the mesh.
    InvalidNeighbor {
        vertex: VertexId,
        neighbor: VertexId,
        len: usize,
    },
    /// A configuration value is out of its accepted range.
    InvalidConfig(String),
    /// The frontier held more entries than allowed.
    FrontierExhausted { start: VertexId, limit: usize },
}

impl LecError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidVertex { .. }
            | Self::InvalidCell { .. }
            | Self::ElevationLength { .. }
            | Self::NonFiniteElevation { .. }
            | Self::NegativeFuel(_)
            | Self::NonPositiveFuel(_)
            | Self::ZeroCacheCapacity(_) => ErrorKind::PreconditionViolation,
            Self::NegativeCost { .. } | Self::InvalidNeighbor { .. } | Self::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            Self::FrontierExhausted { .. } => ErrorKind::ResourceExhaustion,
        }
    }
}

impl fmt::Display for LecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVertex { vertex, len } => {
                write!(f, "vertex {vertex} out of range for mesh of {len} vertices")
            }
            Self::InvalidCell { cell, vertex, len } => write!(
                f,
                "triangle {cell} references vertex {vertex}, mesh has {len} vertices"
            ),
            Self::ElevationLength { points, elevations } => write!(
                f,
                "elevation field has {elevations} values for {points} vertices"
            ),
            Self::NonFiniteElevation { vertex, value } => {
                write!(f, "vertex {vertex} has non-finite elevation {value}")
            }
            Self::NegativeFuel(fuel) => write!(f, "fuel budget {fuel} is negative"),
            Self::NonPositiveFuel(fuel) => write!(f, "fuel budget {fuel} must be positive"),
            Self::ZeroCacheCapacity(cache) => write!(f, "{cache} cache capacity must be non-zero"),
            Self::NegativeCost { from, to, cost } => {
                write!(f, "cost strategy returned {cost} for step {from} -> {to}")
            }
            Self::InvalidNeighbor {
                vertex,
                neighbor,
                len,
            } => write!(
                f,
                "neighbor strategy returned vertex {neighbor} for {vertex}, mesh has {len} vertices"
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::FrontierExhausted { start, limit } => write!(
                f,
                "search from {start} exceeded the frontier limit of {limit} entries"
            ),
        }
    }
}

impl std::error::Error for LecError {}
