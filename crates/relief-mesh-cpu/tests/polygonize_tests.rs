use relief_field::{DensityField, FieldDims};
use relief_geom::Vec3;
use relief_mesh_cpu::tables::{EDGE_TABLE, TRI_TABLE};
use relief_mesh_cpu::{Cube, MAX_CELL_TRIANGLES, Triangle};

fn polygonise(cube: &Cube, isolevel: f32) -> Vec<Triangle> {
    let mut out = [Triangle::default(); MAX_CELL_TRIANGLES];
    let n = cube.polygonise(isolevel, &mut out);
    out[..n].to_vec()
}

fn key_set(tris: &[Triangle]) -> std::collections::BTreeSet<[u32; 3]> {
    tris.iter()
        .flat_map(|t| t.vertices())
        .map(Vec3::to_bits)
        .collect()
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).length() <= eps
}

#[test]
fn tables_are_consistent() {
    // The trivial configurations cross no edges.
    assert_eq!(EDGE_TABLE[0], 0);
    assert_eq!(EDGE_TABLE[255], 0);
    for (i, row) in TRI_TABLE.iter().enumerate() {
        // Complementary configurations cross the same edges.
        assert_eq!(EDGE_TABLE[i], EDGE_TABLE[255 - i]);
        let len = row.iter().position(|&e| e == -1).unwrap_or(row.len());
        // Whole triangles only, at most five.
        assert_eq!(len % 3, 0);
        assert!(len <= 3 * MAX_CELL_TRIANGLES);
        for &e in &row[..len] {
            assert!((0..12).contains(&e));
            // Every edge a triangle references is flagged as crossed.
            assert_ne!(EDGE_TABLE[i] & (1 << e), 0, "config {i} edge {e}");
        }
        for &e in &row[len..] {
            assert_eq!(e, -1);
        }
    }
}

#[test]
fn uniform_cubes_emit_nothing() {
    for v in [0.0, 0.2, 0.5, 0.9, 1.0] {
        let cube = Cube::new([0, 0, 0], [v; 8]);
        assert!(polygonise(&cube, 0.5).is_empty(), "uniform value {v}");
    }
}

#[test]
fn solid_and_empty_extremes_detected() {
    assert!(Cube::new([0, 0, 0], [1.0; 8]).is_all_solid());
    assert!(Cube::new([0, 0, 0], [0.0; 8]).is_all_empty());
    let mut values = [1.0; 8];
    values[3] = 0.999;
    assert!(!Cube::new([0, 0, 0], values).is_all_solid());
}

#[test]
fn single_solid_corner_yields_one_triangle_at_edge_midpoints() {
    // Corner 0 at density 1, rest 0: the 1.0 -> 0.0 jump crosses 0.5 at
    // exactly the midpoint of the three edges incident to corner 0.
    let mut values = [0.0; 8];
    values[0] = 1.0;
    let tris = polygonise(&Cube::new([0, 0, 0], values), 0.5);
    assert_eq!(tris.len(), 1);
    let expect = [
        Vec3::new(0.0, 0.0, 0.5),
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(0.0, 0.5, 0.0),
    ];
    let got = key_set(&tris);
    assert_eq!(got, expect.iter().map(|v| v.to_bits()).collect());
}

#[test]
fn single_solid_corner_seven_is_symmetric() {
    let mut values = [0.0; 8];
    values[6] = 1.0; // corner at (1, 1, 1)
    let tris = polygonise(&Cube::new([0, 0, 0], values), 0.5);
    assert_eq!(tris.len(), 1);
    let expect = [
        Vec3::new(0.5, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 0.5),
        Vec3::new(1.0, 0.5, 1.0),
    ];
    assert_eq!(key_set(&tris), expect.iter().map(|v| v.to_bits()).collect());
}

#[test]
fn offset_translates_output_into_field_space() {
    let mut values = [0.0; 8];
    values[0] = 1.0;
    let at_origin = polygonise(&Cube::new([0, 0, 0], values), 0.5);
    let shifted = polygonise(&Cube::new([2, 3, 4], values), 0.5);
    assert_eq!(at_origin.len(), shifted.len());
    let delta = Vec3::new(2.0, 3.0, 4.0);
    for (a, b) in at_origin.iter().zip(&shifted) {
        for (va, vb) in a.vertices().iter().zip(b.vertices()) {
            assert!(vec3_approx_eq(*va + delta, vb, 1e-6));
        }
    }
}

#[test]
fn interpolation_tracks_density_gradient() {
    // Corner 0 at 1.0 against 0.25 elsewhere: t = (0.5 - 1.0) / (0.25 - 1.0)
    // = 2/3 along each incident edge.
    let mut values = [0.25; 8];
    values[0] = 1.0;
    let tris = polygonise(&Cube::new([0, 0, 0], values), 0.5);
    assert_eq!(tris.len(), 1);
    let t = 2.0 / 3.0;
    let expect = [
        Vec3::new(0.0, 0.0, t),
        Vec3::new(t, 0.0, 0.0),
        Vec3::new(0.0, t, 0.0),
    ];
    for want in expect {
        assert!(
            tris[0]
                .vertices()
                .iter()
                .any(|v| vec3_approx_eq(*v, want, 1e-6)),
            "missing vertex near {want:?}"
        );
    }
}

#[test]
fn shared_face_vertices_are_bit_identical_across_cells() {
    // Two adjacent cells agreeing on their shared x = 1 face. Vertices
    // interpolated on that face's edges must come out bit-for-bit equal
    // from both sides even though the cells traverse some of those edges
    // in opposite directions.
    let a = Cube::new([0, 0, 0], [0.9, 0.8, 0.3, 0.6, 0.7, 0.55, 0.2, 0.45]);
    let b = Cube::new([1, 0, 0], [0.6, 0.3, 0.1, 0.8, 0.45, 0.2, 0.35, 0.7]);

    let face_keys = |tris: &[Triangle]| -> std::collections::BTreeSet<[u32; 3]> {
        tris.iter()
            .flat_map(|t| t.vertices())
            .filter(|v| v.x == 1.0)
            .map(Vec3::to_bits)
            .collect()
    };

    let ka = face_keys(&polygonise(&a, 0.5));
    let kb = face_keys(&polygonise(&b, 0.5));
    assert!(!ka.is_empty());
    assert_eq!(ka, kb);
}

#[test]
fn from_field_applies_open_boundary() {
    let field = DensityField::from_fn(FieldDims::new(2, 2, 2), |_, _, _| 1.0);
    let cube = Cube::from_field(&field, 1, 1, 1);
    assert_eq!(cube.values[0], 1.0);
    assert!(cube.values[1..].iter().all(|&v| v == 0.0));
    // The surface gets truncated at the field edge rather than erroring.
    assert_eq!(polygonise(&cube, 0.5).len(), 1);
}
