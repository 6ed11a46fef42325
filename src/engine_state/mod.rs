//! # Engine State Module
//!
//! The streaming voxel world and the systems that feed it.
//!
//! ## Key Components
//!
//! * `EngineState` - drives the world one frame at a time around a moving viewer
//! * `config` - world configuration loaded from JSON
//! * `error` - recoverable errors from streaming, the worker pool and config loading
//! * `rendering` - meshing and the graphics boundary chunks are published through
//! * `task_management` - the worker pool that generates and meshes chunks
//! * `voxels` - blocks, chunks, terrain and the chunk grid

use cgmath::{Point3, Vector3};

use rendering::{GraphicsContext, Renderer, VisibilityTest};
use voxels::chunk_grid::{ChunkGrid, UpdateReport};

pub mod config;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

use config::WorldConfig;
use error::WorldError;

/// Per-frame outcome of `EngineState::process_frame`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub update: UpdateReport,
    /// Chunks submitted to the renderer
    pub drawn: usize,
}

/// The world plus the graphics context it publishes into, driven from one thread.
pub struct EngineState<C>
where
    C: GraphicsContext,
{
    /// The streaming chunk grid
    pub world: ChunkGrid<C::MeshBuffer>,
    /// Graphics context receiving published meshes
    pub context: C,
    viewer: Point3<f32>,
    initialized: bool,
}

impl<C> EngineState<C>
where
    C: GraphicsContext,
{
    pub fn new(config: WorldConfig, context: C, viewer: Point3<f32>) -> Self {
        EngineState {
            world: ChunkGrid::new(config),
            context,
            viewer,
            initialized: false,
        }
    }

    pub fn viewer(&self) -> Point3<f32> {
        self.viewer
    }

    /// Moves the viewer; the world follows on the next frame.
    pub fn move_viewer(&mut self, delta: Vector3<f32>) {
        self.viewer += delta;
    }

    /// Streams the world to the viewer, then draws it.
    pub fn process_frame<V, R>(&mut self, visibility: &V, renderer: &mut R) -> Result<FrameReport, WorldError>
    where
        V: VisibilityTest + ?Sized,
        R: Renderer<C::MeshBuffer> + ?Sized,
    {
        let update = if self.initialized {
            self.world.update(self.viewer, &mut self.context)?
        } else {
            self.initialized = true;
            self.world.init(self.viewer, &mut self.context)?
        };
        let drawn = self.world.render(self.viewer, visibility, renderer);
        Ok(FrameReport { update, drawn })
    }
}
