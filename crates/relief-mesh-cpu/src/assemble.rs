//! Final mesh assembly: UVs, normals, and bounds for a welded mesh.

use relief_field::FieldDims;
use relief_geom::{Aabb, Vec2, Vec3};

use crate::polygonize::Triangle;
use crate::weld::WeldedMesh;

/// The finished indexed mesh handed to the host (renderer, collider, …).
#[derive(Clone, Debug, Default)]
pub struct TerrainMeshCpu {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub bounds: Aabb,
}

impl TerrainMeshCpu {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Packages a welded mesh with derived per-vertex attributes.
///
/// UVs are a planar top-down projection, `(x / dims.x, z / dims.z)`;
/// y is ignored, which is fine for height-field terrain. Normals are
/// per-face normals accumulated area-weighted per vertex and
/// normalized; the table winding makes them point from solid toward
/// empty space.
pub fn assemble_mesh(welded: WeldedMesh, dims: FieldDims) -> TerrainMeshCpu {
    let dims = dims.sanitized();
    let uvs = welded
        .vertices
        .iter()
        .map(|v| Vec2::new(v.x / dims.x as f32, v.z / dims.z as f32))
        .collect();

    let mut normals = vec![Vec3::ZERO; welded.vertices.len()];
    for tri in welded.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = Triangle::new(
            welded.vertices[i0],
            welded.vertices[i1],
            welded.vertices[i2],
        )
        .face_normal();
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }
    for n in &mut normals {
        *n = n.normalized();
    }

    let bounds = Aabb::from_points(welded.vertices.iter().copied());

    TerrainMeshCpu {
        vertices: welded.vertices,
        indices: welded.indices,
        uvs,
        normals,
        bounds,
    }
}
