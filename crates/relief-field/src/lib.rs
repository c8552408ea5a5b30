//! 3D scalar density grid derived from a 2D height field.
//!
//! Each (x, z) column is filled from the bottom up with
//! `clamp01(surface - y)` where `surface = height * dims.y`, so density
//! is 1 well below the surface, 0 well above it, and fractional in the
//! single cell the surface crosses.
#![forbid(unsafe_code)]

use relief_noise::HeightField;

/// Corner offsets of one cell in the canonical winding: the bottom ring
/// (0,0,0) (0,0,1) (1,0,1) (1,0,0), then the same ring at y+1. The
/// marching-cubes tables index corners and edges in this order.
pub const CORNER_OFFSETS: [[i32; 3]; 8] = [
    [0, 0, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 0, 0],
    [0, 1, 0],
    [0, 1, 1],
    [1, 1, 1],
    [1, 1, 0],
];

/// Extent of a density field in samples per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl FieldDims {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Clamps every axis to at least one sample.
    #[inline]
    pub fn sanitized(self) -> Self {
        Self::new(self.x.max(1), self.y.max(1), self.z.max(1))
    }

    /// Extent of the interior cell grid: cells span x and z sample pairs,
    /// while the top y layer polygonizes against the open boundary above.
    #[inline]
    pub fn cell_extent(self) -> (usize, usize, usize) {
        (self.x.saturating_sub(1), self.y, self.z.saturating_sub(1))
    }

    #[inline]
    pub fn cell_count(self) -> usize {
        let (cx, cy, cz) = self.cell_extent();
        cx * cy * cz
    }
}

/// 3D grid of occupancy values in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct DensityField {
    dims: FieldDims,
    data: Vec<f32>,
}

impl DensityField {
    /// Builds the field from a height field: per column, density falls
    /// off linearly from the surface height and clamps to [0, 1].
    pub fn from_height_field(heights: &HeightField, dims: FieldDims) -> Self {
        let dims = dims.sanitized();
        Self::from_fn(dims, |x, y, z| {
            let surface = heights.value(x, z) * dims.y as f32;
            (surface - y as f32).clamp(0.0, 1.0)
        })
    }

    /// Builds a field by sampling `f` at every (x, y, z). Mainly for
    /// synthetic fields in tests and tools.
    pub fn from_fn<F: Fn(usize, usize, usize) -> f32>(dims: FieldDims, f: F) -> Self {
        let dims = dims.sanitized();
        let mut data = vec![0.0f32; dims.x * dims.y * dims.z];
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    data[x + dims.x * (y + dims.y * z)] = f(x, y, z);
                }
            }
        }
        Self { dims, data }
    }

    #[inline]
    pub fn dims(&self) -> FieldDims {
        self.dims
    }

    /// Density at a sample point. Reads outside the grid return 0: the
    /// field boundary is open (empty), which truncates the surface at the
    /// sampled volume's edge instead of failing. Cross-field stitching is
    /// deliberately out of scope.
    #[inline]
    pub fn density(&self, x: i32, y: i32, z: i32) -> f32 {
        if x < 0 || y < 0 || z < 0 {
            return 0.0;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.dims.x || y >= self.dims.y || z >= self.dims.z {
            return 0.0;
        }
        self.data[x + self.dims.x * (y + self.dims.y * z)]
    }

    /// The 8 corner densities of the cell at (x, y, z), in the
    /// [`CORNER_OFFSETS`] winding, with open-boundary reads for corners
    /// past the field's edge.
    #[inline]
    pub fn cell_corners(&self, x: i32, y: i32, z: i32) -> [f32; 8] {
        CORNER_OFFSETS.map(|[dx, dy, dz]| self.density(x + dx, y + dy, z + dz))
    }
}
