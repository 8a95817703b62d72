//! Accessibility fields for whole meshes.
//!
//! Selects the start vertices above sea level, runs one [`lec_paths`]
//! search per start in parallel, and collects the total leaf distances into
//! a per-vertex field aligned with the mesh.

pub mod config;
pub mod field;

pub use config::{FailurePolicy, LecConfig};
pub use field::{FieldReport, candidate_starts, compute_field, compute_field_with, write_back};
