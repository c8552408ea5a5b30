//! Per-cell isosurface polygonization.

use relief_field::{CORNER_OFFSETS, DensityField};
use relief_geom::Vec3;

use crate::tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// A single marching-cubes cell never emits more than 5 triangles.
pub const MAX_CELL_TRIANGLES: usize = 5;

/// One output triangle, in field-local coordinates (the cell's integer
/// offset is already applied).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Unnormalized face normal; magnitude is twice the triangle area,
    /// which is exactly the weight wanted for normal accumulation.
    #[inline]
    pub fn face_normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }
}

/// One cell's 8 corner densities plus its integer offset in the field.
/// Ephemeral: built per cell and consumed by [`Cube::polygonise`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    pub offset: [i32; 3],
    pub values: [f32; 8],
}

impl Cube {
    #[inline]
    pub const fn new(offset: [i32; 3], values: [f32; 8]) -> Self {
        Self { offset, values }
    }

    /// Reads the cell at (x, y, z) from the field, corners past the
    /// boundary substituting density 0.
    #[inline]
    pub fn from_field(field: &DensityField, x: i32, y: i32, z: i32) -> Self {
        Self::new([x, y, z], field.cell_corners(x, y, z))
    }

    /// Exactly at the fully-solid extreme. Together with
    /// [`Cube::is_all_empty`] this lets callers skip polygonization for
    /// the two trivial configurations; the table lookup would emit zero
    /// triangles for them anyway.
    #[inline]
    pub fn is_all_solid(&self) -> bool {
        self.values == [1.0; 8]
    }

    /// Exactly at the fully-empty extreme.
    #[inline]
    pub fn is_all_empty(&self) -> bool {
        self.values == [0.0; 8]
    }

    /// Triangulates the isosurface crossing this cell. Writes up to
    /// [`MAX_CELL_TRIANGLES`] triangles into `out`, translated by the
    /// cell offset, and returns how many were written.
    pub fn polygonise(&self, isolevel: f32, out: &mut [Triangle; MAX_CELL_TRIANGLES]) -> usize {
        let mut index = 0usize;
        for (i, &v) in self.values.iter().enumerate() {
            if v < isolevel {
                index |= 1 << i;
            }
        }

        let crossed = EDGE_TABLE[index];
        if crossed == 0 {
            return 0;
        }

        let base = Vec3::new(
            self.offset[0] as f32,
            self.offset[1] as f32,
            self.offset[2] as f32,
        );

        let mut edge_points = [Vec3::ZERO; 12];
        for (e, &[c0, c1]) in EDGE_CORNERS.iter().enumerate() {
            if crossed & (1 << e) != 0 {
                edge_points[e] = interp_edge(
                    base + corner_pos(c0),
                    base + corner_pos(c1),
                    self.values[c0],
                    self.values[c1],
                    isolevel,
                );
            }
        }

        let row = &TRI_TABLE[index];
        let mut count = 0usize;
        while row[count * 3] != -1 {
            out[count] = Triangle::new(
                edge_points[row[count * 3] as usize],
                edge_points[row[count * 3 + 1] as usize],
                edge_points[row[count * 3 + 2] as usize],
            );
            count += 1;
        }
        count
    }
}

#[inline]
fn corner_pos(corner: usize) -> Vec3 {
    let [x, y, z] = CORNER_OFFSETS[corner];
    Vec3::new(x as f32, y as f32, z as f32)
}

/// Where the isosurface crosses the edge between two corner positions
/// (already in field coordinates). Falls back to the edge midpoint when
/// the corner densities coincide, so a crossed edge can never divide by
/// zero.
///
/// Endpoints are put in a canonical order first: the two cells sharing
/// an edge traverse it in opposite directions for some edges, and only
/// order-independent arithmetic makes their interpolated vertices
/// bit-identical, which the exact-equality welder relies on.
#[inline]
fn interp_edge(mut p0: Vec3, mut p1: Vec3, mut d0: f32, mut d1: f32, isolevel: f32) -> Vec3 {
    if (p1.x, p1.y, p1.z) < (p0.x, p0.y, p0.z) {
        core::mem::swap(&mut p0, &mut p1);
        core::mem::swap(&mut d0, &mut d1);
    }
    let delta = d1 - d0;
    if delta.abs() <= f32::EPSILON {
        return p0.lerp(p1, 0.5);
    }
    p0.lerp(p1, (isolevel - d0) / delta)
}
