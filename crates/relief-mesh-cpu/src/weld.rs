//! Vertex welding: triangle soup to an indexed vertex/index buffer.

use hashbrown::HashMap;
use relief_geom::Vec3;

use crate::polygonize::Triangle;

/// Indexed mesh with every distinct vertex position stored once.
///
/// Invariants: no two vertices compare equal under exact float
/// equality, and every index is a valid position in `vertices`.
#[derive(Clone, Debug, Default)]
pub struct WeldedMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl WeldedMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Deduplicates triangle vertices under exact floating-point equality.
///
/// Exactness is the deliberate policy: the polygonizer interpolates a
/// shared edge to bit-identical positions from either side, so no
/// tolerance is needed, and a naive tolerance merge would make the
/// result depend on encounter order. Keys are the coordinate bit
/// patterns, which also gives f32 positions a hash.
///
/// Index assignment follows triangle read order; with a parallel
/// producer upstream the numbering varies run to run, while the welded
/// geometry does not.
pub fn weld_triangles(triangles: &[Triangle]) -> WeldedMesh {
    let mut by_position: HashMap<[u32; 3], u32> = HashMap::with_capacity(triangles.len());
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(triangles.len() * 3);

    for tri in triangles {
        for v in tri.vertices() {
            let next = vertices.len() as u32;
            let idx = *by_position.entry(v.to_bits()).or_insert_with(|| {
                vertices.push(v);
                next
            });
            indices.push(idx);
        }
    }

    log::trace!(
        "welded {} triangles into {} unique vertices",
        triangles.len(),
        vertices.len()
    );

    WeldedMesh { vertices, indices }
}
