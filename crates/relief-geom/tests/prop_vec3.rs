use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use relief_geom::{Aabb, Vec3};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Cross orthogonality: a·(a×b) = 0 and b·(a×b) = 0
    #[test]
    fn vec3_cross_orthogonal(a in arb_vec3(), b in arb_vec3()) {
        let c = a.cross(b);
        let scale = a.length() * b.length() * c.length();
        prop_assert!(a.dot(c).abs() <= 1e-3 + 1e-5 * scale);
        prop_assert!(b.dot(c).abs() <= 1e-3 + 1e-5 * scale);
    }

    // Lerp at t stays on the segment between components
    #[test]
    fn vec3_lerp_within_bounds(a in arb_vec3(), b in arb_vec3(), t in 0.0f32..=1.0) {
        let l = a.lerp(b, t);
        let (lo, hi) = (a.min(b), a.max(b));
        let slack = 1e-2 + 1e-4 * (hi - lo).length();
        prop_assert!(l.x >= lo.x - slack && l.x <= hi.x + slack);
        prop_assert!(l.y >= lo.y - slack && l.y <= hi.y + slack);
        prop_assert!(l.z >= lo.z - slack && l.z <= hi.z + slack);
    }

    // Bit keys agree with exact equality
    #[test]
    fn vec3_bit_key_matches_equality(a in arb_vec3(), b in arb_vec3()) {
        prop_assert_eq!(a.to_bits() == b.to_bits(), a == b);
    }

    // Every input point is contained in the box built from the points
    #[test]
    fn aabb_contains_inputs(pts in prop::collection::vec(arb_vec3(), 1..16)) {
        let bb = Aabb::from_points(pts.iter().copied());
        for p in &pts {
            prop_assert!(p.x >= bb.min.x && p.x <= bb.max.x);
            prop_assert!(p.y >= bb.min.y && p.y <= bb.max.y);
            prop_assert!(p.z >= bb.min.z && p.z <= bb.max.z);
        }
    }

    // Normalized non-zero vectors have unit length
    #[test]
    fn vec3_normalized_unit(a in arb_vec3()) {
        prop_assume!(a.length() > 1e-3);
        prop_assert!(approx(a.normalized().length(), 1.0, 1e-4));
    }

    // (a + b)·c = a·c + b·c
    #[test]
    fn vec3_dot_distributive(a in arb_vec3(), b in arb_vec3(), c in arb_vec3()) {
        let left = (a + b).dot(c);
        let right = a.dot(c) + b.dot(c);
        prop_assert!(approx_abs_rel(left, right, 1e-6, 1e-5));
    }
}
