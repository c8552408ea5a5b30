//! Fractal height-field generation and height banding.
//!
//! Produces a seeded, deterministic 2D height field in [0, 1] by summing
//! octaves of smooth noise, plus the region color mapping that turns the
//! same field into one color per column.
#![forbid(unsafe_code)]

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relief_geom::Vec2;

/// Substituted for `scale <= 0` so sampling never divides by zero.
const MIN_SCALE: f32 = 1e-4;

/// Seed of the smooth primitive itself. Fixed so that the primitive is a
/// pure function of its sample coordinates; all per-seed variation flows
/// through the octave offsets instead.
const PRIMITIVE_SEED: i32 = 1337;

/// Octave offsets are drawn uniformly from this half-open range.
const OFFSET_RANGE: core::ops::Range<i32> = -100_000..100_000;

/// Fractal noise parameters. Immutable for the duration of a generation
/// run; out-of-range values are corrected by [`NoiseParams::sanitized`]
/// rather than rejected.
#[derive(Clone, Copy, Debug)]
pub struct NoiseParams {
    pub seed: i32,
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub offset: Vec2,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 100.0,
            octaves: 16,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Vec2::ZERO,
        }
    }
}

impl NoiseParams {
    /// Clamps invalid fields to the nearest usable value. Generation
    /// always produces a full grid; it never fails on bad parameters.
    pub fn sanitized(self) -> Self {
        Self {
            scale: if self.scale <= 0.0 {
                MIN_SCALE
            } else {
                self.scale
            },
            lacunarity: self.lacunarity.max(1.0),
            ..self
        }
    }
}

/// 2D grid of heights in [0, 1], one per (x, z) column.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    depth: usize,
    data: Vec<f32>,
}

impl HeightField {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Height of the column at (x, z). Reads past the grid clamp to the
    /// nearest edge column.
    #[inline]
    pub fn value(&self, x: usize, z: usize) -> f32 {
        let x = x.min(self.width - 1);
        let z = z.min(self.depth - 1);
        self.data[x + z * self.width]
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.data
    }
}

/// Generates a `width` x `depth` height field from fractal noise.
///
/// Deterministic per (seed, params): the octave offsets come from a
/// `StdRng` seeded with `params.seed`, drawn in a fixed order (x then y
/// per octave), and the smooth primitive uses a constant internal seed.
/// The raw octave sum is normalized to [0, 1] against the global min/max
/// of the whole grid; a flat raw field (e.g. `octaves == 0`) normalizes
/// to all zeros.
pub fn generate_height_field(width: usize, depth: usize, params: &NoiseParams) -> HeightField {
    let width = width.max(1);
    let depth = depth.max(1);
    let p = params.sanitized();

    let mut prng = StdRng::seed_from_u64(p.seed as u32 as u64);
    let octave_offsets: Vec<Vec2> = (0..p.octaves)
        .map(|_| {
            let ox = prng.gen_range(OFFSET_RANGE) as f32;
            let oy = prng.gen_range(OFFSET_RANGE) as f32;
            Vec2::new(ox, oy) + p.offset
        })
        .collect();

    let mut primitive = FastNoiseLite::with_seed(PRIMITIVE_SEED);
    primitive.set_noise_type(Some(NoiseType::Perlin));
    primitive.set_frequency(Some(1.0));

    let half_w = width as f32 / 2.0;
    let half_d = depth as f32 / 2.0;

    let mut data = vec![0.0f32; width * depth];
    let mut min_height = f32::MAX;
    let mut max_height = f32::MIN;

    for z in 0..depth {
        for x in 0..width {
            let mut amplitude = 1.0f32;
            let mut frequency = 1.0f32;
            let mut height = 0.0f32;

            for off in &octave_offsets {
                let sx = (x as f32 - half_w) / p.scale * frequency + off.x;
                let sz = (z as f32 - half_d) / p.scale * frequency + off.y;
                height += primitive.get_noise_2d(sx, sz) * amplitude;
                amplitude *= p.persistence;
                frequency *= p.lacunarity;
            }

            min_height = min_height.min(height);
            max_height = max_height.max(height);
            data[x + z * width] = height;
        }
    }

    // Global remap to [0, 1]; a flat raw field stays flat at 0.
    if max_height > min_height {
        let span = max_height - min_height;
        for v in &mut data {
            *v = (*v - min_height) / span;
        }
    } else {
        data.fill(0.0);
    }

    log::debug!(
        "height field {}x{} seed={} octaves={}",
        width,
        depth,
        p.seed,
        p.octaves
    );

    HeightField { width, depth, data }
}

/// One height band: columns with height <= `threshold` take `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBand {
    pub threshold: f32,
    pub color: [u8; 4],
}

/// Maps each column of the height field to the color of the first band
/// whose threshold is >= the column height, scanning bands in the order
/// supplied. Callers provide bands in ascending threshold order; the
/// ordering is their contract and is not validated here. Columns above
/// every band stay transparent black.
pub fn band_colors(field: &HeightField, bands: &[ColorBand]) -> Vec<[u8; 4]> {
    let mut colors = vec![[0u8; 4]; field.width() * field.depth()];
    for z in 0..field.depth() {
        for x in 0..field.width() {
            let height = field.value(x, z);
            for band in bands {
                if height <= band.threshold {
                    colors[x + z * field.width()] = band.color;
                    break;
                }
            }
        }
    }
    colors
}
