//! TOML generation config for the CLI host.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use relief_field::FieldDims;
use relief_geom::Vec2;
use relief_noise::{ColorBand, NoiseParams};
use relief_runtime::{DEFAULT_BATCH_SIZE, GenParams};

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainConfig {
    #[serde(default)]
    pub dims: DimsConfig,
    #[serde(default)]
    pub noise: NoiseConfig,
    #[serde(default = "default_isolevel")]
    pub isolevel: f32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dims: DimsConfig::default(),
            noise: NoiseConfig::default(),
            isolevel: default_isolevel(),
            batch_size: default_batch_size(),
            regions: Vec::new(),
        }
    }
}

fn default_isolevel() -> f32 {
    0.5
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct DimsConfig {
    #[serde(default = "default_dim_x")]
    pub x: usize,
    #[serde(default = "default_dim_y")]
    pub y: usize,
    #[serde(default = "default_dim_z")]
    pub z: usize,
}
fn default_dim_x() -> usize {
    64
}
fn default_dim_y() -> usize {
    32
}
fn default_dim_z() -> usize {
    64
}
impl Default for DimsConfig {
    fn default() -> Self {
        Self {
            x: default_dim_x(),
            y: default_dim_y(),
            z: default_dim_z(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct NoiseConfig {
    #[serde(default)]
    pub seed: i32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default)]
    pub offset: [f32; 2],
}
fn default_scale() -> f32 {
    100.0
}
fn default_octaves() -> u32 {
    16
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: default_scale(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            offset: [0.0, 0.0],
        }
    }
}

/// One height band, lowest thresholds first (e.g. water, sand, grass).
#[derive(Clone, Debug, Deserialize)]
pub struct RegionConfig {
    #[serde(default)]
    #[allow(dead_code)]
    pub name: Option<String>,
    pub height: f32,
    pub color: [u8; 3],
}

impl TerrainConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        let cfg: TerrainConfig = toml::from_str(&s)?;
        Ok(cfg)
    }

    pub fn to_gen_params(&self) -> GenParams {
        GenParams {
            dims: FieldDims::new(self.dims.x, self.dims.y, self.dims.z),
            isolevel: self.isolevel,
            noise: NoiseParams {
                seed: self.noise.seed,
                scale: self.noise.scale,
                octaves: self.noise.octaves,
                persistence: self.noise.persistence,
                lacunarity: self.noise.lacunarity,
                offset: Vec2::new(self.noise.offset[0], self.noise.offset[1]),
            },
            bands: self
                .regions
                .iter()
                .map(|r| ColorBand {
                    threshold: r.height,
                    color: [r.color[0], r.color[1], r.color[2], 255],
                })
                .collect(),
            batch_size: self.batch_size,
        }
    }
}
