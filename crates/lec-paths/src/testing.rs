//! Meshes shared by the unit tests.

use lec_core::{DVec3, Mesh};
use rand::RngExt;
use rand::rngs::StdRng;

/// Two triangles sharing the edge 1–2 on a 1 km square, elevations
/// `[0, 1, 0, 2]`.
///
/// ```text
/// 2 ---- 3
/// |  \   |
/// |   \  |
/// 0 ---- 1
/// ```
pub(crate) fn quad_mesh() -> Mesh {
    Mesh::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1000.0, 0.0, 0.0),
            DVec3::new(0.0, 1000.0, 0.0),
            DVec3::new(1000.0, 1000.0, 0.0),
        ],
        vec![0.0, 1.0, 0.0, 2.0],
        vec![[0, 1, 2], [1, 3, 2]],
    )
    .unwrap()
}

/// A `w` x `h` jittered grid, each quad split along a random diagonal, with
/// elevations between -20 and 60 so that some vertices are underwater.
pub(crate) fn random_mesh(rng: &mut StdRng, w: usize, h: usize) -> Mesh {
    let mut points = Vec::with_capacity(w * h);
    let mut z = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            points.push(DVec3::new(
                x as f64 * 100.0 + rng.random_range(-20.0..20.0),
                y as f64 * 100.0 + rng.random_range(-20.0..20.0),
                0.0,
            ));
            z.push(rng.random_range(-20.0..60.0));
        }
    }
    let mut tris = Vec::new();
    for y in 0..h - 1 {
        for x in 0..w - 1 {
            let a = y * w + x;
            let (b, c, d) = (a + 1, a + w, a + w + 1);
            if rng.random_range(0..2) == 0 {
                tris.push([a, b, d]);
                tris.push([a, d, c]);
            } else {
                tris.push([a, b, c]);
                tris.push([b, d, c]);
            }
        }
    }
    Mesh::new(points, z, tris).unwrap()
}
