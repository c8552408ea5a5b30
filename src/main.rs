use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

mod config;

use config::TerrainConfig;

/// Procedural marching-cubes terrain mesher.
#[derive(Parser, Debug)]
#[command(name = "relief", version, about)]
struct Args {
    /// TOML generation config (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the noise seed
    #[arg(long)]
    seed: Option<i32>,

    /// Override the field dimensions, e.g. 64x32x64
    #[arg(long)]
    dims: Option<String>,

    /// Override the isosurface threshold
    #[arg(long)]
    isolevel: Option<f32>,

    /// Worker thread count (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn parse_dims(s: &str) -> Result<(usize, usize, usize), Box<dyn Error>> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 3 {
        return Err(format!("expected WxHxD dimensions, got {s:?}").into());
    }
    Ok((parts[0].parse()?, parts[1].parse()?, parts[2].parse()?))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => TerrainConfig::load_from_path(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.noise.seed = seed;
    }
    if let Some(dims) = &args.dims {
        let (x, y, z) = parse_dims(dims)?;
        cfg.dims.x = x;
        cfg.dims.y = y;
        cfg.dims.z = z;
    }
    if let Some(isolevel) = args.isolevel {
        cfg.isolevel = isolevel;
    }
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("relief-mesh-{i}"))
            .build_global()?;
    }

    let params = cfg.to_gen_params();
    log::info!(
        "generating {}x{}x{} seed={} octaves={} isolevel={}",
        params.dims.x,
        params.dims.y,
        params.dims.z,
        params.noise.seed,
        params.noise.octaves,
        params.isolevel
    );

    let terrain = relief_runtime::generate(&params);
    let mesh = &terrain.mesh;
    let m = &terrain.metrics;

    log::info!(
        "mesh: {} vertices, {} triangles, bounds [{:.2} {:.2} {:.2}] .. [{:.2} {:.2} {:.2}]",
        mesh.vertices.len(),
        mesh.triangle_count(),
        mesh.bounds.min.x,
        mesh.bounds.min.y,
        mesh.bounds.min.z,
        mesh.bounds.max.x,
        mesh.bounds.max.y,
        mesh.bounds.max.z,
    );
    log::info!(
        "stages: noise {}ms, field {}ms, mesh {}ms ({} cells), weld {}ms",
        m.t_noise_ms,
        m.t_field_ms,
        m.t_mesh_ms,
        m.cells,
        m.t_weld_ms,
    );

    println!(
        "{} vertices, {} triangles from {} cells",
        mesh.vertices.len(),
        mesh.triangle_count(),
        m.cells
    );
    Ok(())
}
