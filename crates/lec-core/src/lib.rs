//! **lec-core**: core types for least-effort accessibility on terrain meshes.
//!
//! This crate provides the immutable [`Mesh`] shared by every search and the
//! [`LecError`] type used across the *lec* workspace.

pub mod error;
pub mod mesh;

pub use error::{ErrorKind, LecError};
pub use glam::DVec3;
pub use mesh::{Mesh, VertexId};
