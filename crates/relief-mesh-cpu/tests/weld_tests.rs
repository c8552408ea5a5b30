use relief_field::FieldDims;
use relief_geom::{Vec2, Vec3};
use relief_mesh_cpu::{Triangle, WeldedMesh, assemble_mesh, weld_triangles};
use std::collections::{BTreeMap, BTreeSet};

fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
    Triangle::new(
        Vec3::new(a[0], a[1], a[2]),
        Vec3::new(b[0], b[1], b[2]),
        Vec3::new(c[0], c[1], c[2]),
    )
}

fn vertex_keys(mesh: &WeldedMesh) -> BTreeSet<[u32; 3]> {
    mesh.vertices.iter().map(|v| v.to_bits()).collect()
}

/// Triangles as vertex-key triples, in emitted orientation, as a multiset.
fn connectivity(mesh: &WeldedMesh) -> BTreeMap<[[u32; 3]; 3], usize> {
    let mut out = BTreeMap::new();
    for t in mesh.indices.chunks_exact(3) {
        let keys = [
            mesh.vertices[t[0] as usize].to_bits(),
            mesh.vertices[t[1] as usize].to_bits(),
            mesh.vertices[t[2] as usize].to_bits(),
        ];
        *out.entry(keys).or_insert(0) += 1;
    }
    out
}

#[test]
fn shared_edge_vertices_are_merged() {
    let tris = [
        tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        tri([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mesh = weld_triangles(&tris);
    assert_eq!(mesh.vertices.len(), 4);
    assert_eq!(mesh.indices.len(), 6);
    assert_eq!(mesh.triangle_count(), 2);
}

#[test]
fn indices_follow_read_order() {
    let tris = [tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0])];
    let mesh = weld_triangles(&tris);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.vertices[0], Vec3::new(0.0, 0.0, 0.0));
}

#[test]
fn no_duplicate_positions_and_indices_in_range() {
    let tris: Vec<Triangle> = (0..8)
        .map(|i| {
            let f = i as f32 * 0.25;
            tri([f, 0.0, 0.0], [f + 0.5, 0.5, 0.0], [f, 1.0, 0.5])
        })
        .collect();
    let mesh = weld_triangles(&tris);
    assert_eq!(vertex_keys(&mesh).len(), mesh.vertices.len());
    assert!(
        mesh.indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len())
    );
}

#[test]
fn weld_is_order_independent_up_to_relabeling() {
    let tris: Vec<Triangle> = (0..6)
        .map(|i| {
            let f = i as f32 * 0.5;
            tri([f, 0.0, 0.0], [f + 1.0, 0.0, 0.0], [f + 0.5, 1.0, 0.0])
        })
        .collect();
    let mut reversed = tris.clone();
    reversed.reverse();

    let a = weld_triangles(&tris);
    let b = weld_triangles(&reversed);
    assert_eq!(a.vertices.len(), b.vertices.len());
    assert_eq!(vertex_keys(&a), vertex_keys(&b));
    assert_eq!(connectivity(&a), connectivity(&b));
}

#[test]
fn weld_of_empty_input_is_empty() {
    let mesh = weld_triangles(&[]);
    assert!(mesh.vertices.is_empty());
    assert!(mesh.indices.is_empty());
}

#[test]
fn exact_equality_keeps_nearby_but_distinct_positions() {
    let eps = f32::EPSILON;
    let tris = [
        tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        tri([0.0, 0.0, eps], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let mesh = weld_triangles(&tris);
    // Not bit-equal, so not merged: that is the contract.
    assert_eq!(mesh.vertices.len(), 4);
}

#[test]
fn assemble_derives_planar_uvs_and_bounds() {
    let tris = [
        tri([0.0, 0.0, 0.0], [4.0, 2.0, 0.0], [0.0, 1.0, 8.0]),
        tri([4.0, 2.0, 0.0], [4.0, 0.0, 8.0], [0.0, 1.0, 8.0]),
    ];
    let dims = FieldDims::new(4, 4, 8);
    let mesh = assemble_mesh(weld_triangles(&tris), dims);
    assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    assert_eq!(mesh.normals.len(), mesh.vertices.len());
    for (v, uv) in mesh.vertices.iter().zip(&mesh.uvs) {
        assert_eq!(*uv, Vec2::new(v.x / 4.0, v.z / 8.0));
    }
    assert_eq!(mesh.bounds.min, Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(mesh.bounds.max, Vec3::new(4.0, 2.0, 8.0));
}

#[test]
fn assemble_normals_are_unit_and_outward() {
    // The single-solid-corner triangle from the polygonizer: corner 0 is
    // the solid one, so the face must point away from it along +(1,1,1).
    let tris = [tri([0.0, 0.0, 0.5], [0.5, 0.0, 0.0], [0.0, 0.5, 0.0])];
    let mesh = assemble_mesh(weld_triangles(&tris), FieldDims::new(2, 2, 2));
    let expect = Vec3::new(1.0, 1.0, 1.0).normalized();
    for n in &mesh.normals {
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((*n - expect).length() < 1e-5);
    }
}
