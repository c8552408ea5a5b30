//! CPU isosurface extraction: marching-cubes tables, per-cell
//! polygonizer, vertex welder, and mesh assembler.
#![forbid(unsafe_code)]

pub mod tables;

mod assemble;
mod polygonize;
mod weld;

pub use assemble::{TerrainMeshCpu, assemble_mesh};
pub use polygonize::{Cube, MAX_CELL_TRIANGLES, Triangle};
pub use weld::{WeldedMesh, weld_triangles};
