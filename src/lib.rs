#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! Streams, generates and meshes an effectively infinite voxel terrain around a
//! moving viewer.
//!
//! ## Key Modules
//!
//! * `core` - shared-ownership primitives used throughout the crate
//! * `engine_state` - the chunk grid, terrain, meshing, worker pool and graphics boundary
//!
//! ## Architecture
//!
//! Every frame the `ChunkGrid` evicts far chunks, creates and generates near ones on
//! a worker pool, meshes the drawable ones against their neighbours, and publishes the
//! meshes through a `GraphicsContext` on the calling thread. Drawing goes through a
//! `Renderer`, nearest chunk first. Both graphics traits have a `wgpu` implementation
//! and a headless one.
//!
//! ## Usage
//!
//! ```ignore
//! let mut world: ChunkGrid<HeadlessMesh> = ChunkGrid::new(WorldConfig::default());
//! let mut context = HeadlessContext::default();
//! world.update(viewer, &mut context)?;
//! world.render(viewer, &|_: &Aabb| true, &mut FrameRecorder::default());
//! ```

use cgmath::{Point3, Vector3};
use log::{error, info};
use web_time::Instant;

pub mod core;
pub mod engine_state;

pub use engine_state::{
    config::WorldConfig,
    error::{ConfigError, DispatchError, TaskFailure, WorldError},
    rendering::{
        headless::{FrameRecorder, HeadlessContext, HeadlessMesh},
        meshing::ChunkMesh,
        Aabb, GraphicsContext, Renderer, Vertex, VisibilityTest,
    },
    task_management::WorkDispatcher,
    voxels::{
        block::{block_side::BlockSide, block_type::BlockType, Block},
        chunk::{block_grid::BlockGrid, neighbourhood::Neighbourhood, Chunk, ChunkStatus, ColumnCoordinate},
        chunk_grid::{ChunkGrid, UpdateReport},
        terrain::{ChunkGenerator, TerrainGenerator},
    },
    EngineState, FrameReport,
};

/// Frames flown by the demo.
const DEMO_FRAMES: usize = 64;
/// Blocks the demo viewer travels along +X each frame.
const DEMO_SPEED: f32 = 6.0;
/// Height the demo viewer flies at.
const DEMO_ALTITUDE: f32 = 240.0;

/// Runs the headless streaming demo.
///
/// Reads an optional JSON `WorldConfig` path from the first argument, then flies a
/// viewer in a straight line, logging what each frame streamed and drew.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return;
            }
        },
        None => WorldConfig::default(),
    };
    info!("World config: {config:?}");

    let view_extent = ((config.draw_radius + 1) * 16) as f32;
    let mut engine = EngineState::new(
        config,
        HeadlessContext::default(),
        Point3::new(8.0, DEMO_ALTITUDE, 8.0),
    );
    let mut recorder = FrameRecorder::default();

    let start = Instant::now();
    for frame in 0..DEMO_FRAMES {
        let viewer = engine.viewer();
        let view_box = Aabb::new(
            Point3::new(viewer.x - view_extent, 0.0, viewer.z - view_extent),
            Point3::new(viewer.x + view_extent, 256.0, viewer.z + view_extent),
        );

        recorder.clear();
        match engine.process_frame(&view_box, &mut recorder) {
            Ok(report) => info!(
                "Frame {frame}: {:?}, drew {} chunk(s) / {} vertices",
                report.update,
                report.drawn,
                recorder.vertices
            ),
            Err(err) => error!("Frame {frame}: {err}"),
        }

        engine.move_viewer(Vector3::new(DEMO_SPEED, 0.0, 0.0));
    }

    info!(
        "Flew {DEMO_FRAMES} frames in {:?}: {} chunk(s) loaded, {} mesh upload(s)",
        start.elapsed(),
        engine.world.len(),
        engine.context.uploads
    );
}
