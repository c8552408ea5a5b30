//! Parallel cell fan-out and the end-to-end terrain generation pipeline.
//!
//! Cells are independent, so meshing is a parallel-for over the flat
//! cell index range: batches of cells go to rayon tasks, each task owns
//! a local triangle buffer and hands it to a channel, and the collector
//! drains everything after the fork-join barrier. Welding and assembly
//! run single-threaded on the complete stream.
#![forbid(unsafe_code)]

use std::time::Instant;

use crossbeam_channel::unbounded;
use relief_field::{DensityField, FieldDims};
use relief_mesh_cpu::{
    Cube, MAX_CELL_TRIANGLES, TerrainMeshCpu, Triangle, assemble_mesh, weld_triangles,
};
use relief_noise::{ColorBand, NoiseParams, band_colors, generate_height_field};

/// Cells handed to one worker task at a time.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Everything one generation run needs. Read-only once the run starts;
/// regenerate-on-change is the caller's job (re-invoke [`generate`]).
#[derive(Clone, Debug)]
pub struct GenParams {
    pub dims: FieldDims,
    pub isolevel: f32,
    pub noise: NoiseParams,
    pub bands: Vec<ColorBand>,
    pub batch_size: usize,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            dims: FieldDims::new(64, 32, 64),
            isolevel: 0.5,
            noise: NoiseParams::default(),
            bands: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Per-stage wall-clock timings and counters for one run.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenMetrics {
    pub t_noise_ms: u32,
    pub t_field_ms: u32,
    pub t_mesh_ms: u32,
    pub t_weld_ms: u32,
    pub cells: usize,
    pub triangles: usize,
}

/// Output of one generation run. The mesh is the long-lived product;
/// colors are the per-column band map for the host's texturing.
#[derive(Clone, Debug)]
pub struct GeneratedTerrain {
    pub mesh: TerrainMeshCpu,
    pub colors: Vec<[u8; 4]>,
    pub metrics: GenMetrics,
}

/// Extracts the isosurface of the whole field as an unordered triangle
/// soup.
///
/// The flat cell range is split into `batch_size` chunks; each rayon
/// task polygonizes its cells and sends its local buffer through the
/// channel. `rayon::scope` joins every task before the drain below
/// starts, so the welder always sees the complete stream. The triangle
/// *set* is deterministic for a given field and isolevel; the order the
/// batches arrive in is not.
pub fn mesh_density_field(
    field: &DensityField,
    isolevel: f32,
    batch_size: usize,
) -> Vec<Triangle> {
    let (cx, cy, cz) = field.dims().cell_extent();
    let total = cx * cy * cz;
    if total == 0 {
        return Vec::new();
    }
    let batch_size = batch_size.max(1);

    let (tx, rx) = unbounded::<Vec<Triangle>>();

    rayon::scope(|s| {
        for start in (0..total).step_by(batch_size) {
            let tx = tx.clone();
            s.spawn(move |_| {
                let end = (start + batch_size).min(total);
                let mut local = Vec::new();
                let mut out = [Triangle::default(); MAX_CELL_TRIANGLES];
                for idx in start..end {
                    let x = (idx % cx) as i32;
                    let y = ((idx / cx) % cy) as i32;
                    let z = (idx / (cx * cy)) as i32;
                    let cube = Cube::from_field(field, x, y, z);
                    // The two extreme configurations emit nothing; skip
                    // the table walk for them.
                    if cube.is_all_solid() || cube.is_all_empty() {
                        continue;
                    }
                    let n = cube.polygonise(isolevel, &mut out);
                    local.extend_from_slice(&out[..n]);
                }
                if !local.is_empty() {
                    let _ = tx.send(local);
                }
            });
        }
    });
    drop(tx);

    let mut triangles = Vec::new();
    while let Ok(batch) = rx.recv() {
        triangles.extend(batch);
    }
    triangles
}

/// Runs the whole pipeline: noise, density, parallel polygonization,
/// weld, assembly, and column banding.
pub fn generate(params: &GenParams) -> GeneratedTerrain {
    let dims = params.dims.sanitized();

    let t0 = Instant::now();
    let heights = generate_height_field(dims.x, dims.z, &params.noise);
    let t_noise = t0.elapsed();

    let t1 = Instant::now();
    let field = DensityField::from_height_field(&heights, dims);
    let t_field = t1.elapsed();

    let t2 = Instant::now();
    let triangles = mesh_density_field(&field, params.isolevel, params.batch_size);
    let t_mesh = t2.elapsed();

    let t3 = Instant::now();
    let mesh = assemble_mesh(weld_triangles(&triangles), dims);
    let t_weld = t3.elapsed();

    let colors = band_colors(&heights, &params.bands);

    let metrics = GenMetrics {
        t_noise_ms: t_noise.as_millis() as u32,
        t_field_ms: t_field.as_millis() as u32,
        t_mesh_ms: t_mesh.as_millis() as u32,
        t_weld_ms: t_weld.as_millis() as u32,
        cells: dims.cell_count(),
        triangles: triangles.len(),
    };
    log::debug!(
        "generated {}x{}x{}: {} cells -> {} tris -> {} verts (noise {}ms, field {}ms, mesh {}ms, weld {}ms)",
        dims.x,
        dims.y,
        dims.z,
        metrics.cells,
        metrics.triangles,
        mesh.vertices.len(),
        metrics.t_noise_ms,
        metrics.t_field_ms,
        metrics.t_mesh_ms,
        metrics.t_weld_ms
    );

    GeneratedTerrain {
        mesh,
        colors,
        metrics,
    }
}
