//! Shared collaborators for the integration tests.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use cgmath::{Matrix4, Point3};
use voxel_world::{
    Block, BlockGrid, BlockType, ChunkGenerator, ColumnCoordinate, GraphicsContext, Renderer, Vertex, WorldConfig,
};

/// Solid rock below this height, air above.
pub const FLAT_HEIGHT: usize = 64;

pub fn config(draw_radius: i32) -> WorldConfig {
    WorldConfig {
        draw_radius,
        worker_count: Some(4),
        ..WorldConfig::default()
    }
}

/// Viewer standing in the middle of a column.
pub fn viewer_in(column: ColumnCoordinate) -> Point3<f32> {
    let origin = column.origin();
    Point3::new(origin.x as f32 + 8.0, 200.0, origin.z as f32 + 8.0)
}

/// Flat rock terrain, identical in every column.
pub struct FlatGenerator;

impl ChunkGenerator for FlatGenerator {
    fn generate(&self, origin: Point3<i32>) -> BlockGrid {
        let mut grid = BlockGrid::new(origin);
        for x in 0..16 {
            for y in 0..FLAT_HEIGHT {
                for z in 0..16 {
                    grid.set(x, y, z, Block::new(BlockType::ROCK));
                }
            }
        }
        grid
    }
}

/// Flat terrain that panics once when asked for one particular column.
pub struct FailOnceGenerator {
    pub column: ColumnCoordinate,
    pub tripped: AtomicBool,
}

impl FailOnceGenerator {
    pub fn new(column: ColumnCoordinate) -> Self {
        FailOnceGenerator {
            column,
            tripped: AtomicBool::new(false),
        }
    }
}

impl ChunkGenerator for FailOnceGenerator {
    fn generate(&self, origin: Point3<i32>) -> BlockGrid {
        if origin == self.column.origin() && !self.tripped.swap(true, Ordering::SeqCst) {
            panic!("terrain source unavailable at {origin:?}");
        }
        FlatGenerator.generate(origin)
    }
}

/// Mesh handle that counts itself in a shared live counter until dropped.
#[derive(Debug)]
pub struct TrackedBuffer {
    pub vertex_count: usize,
    live: Arc<AtomicUsize>,
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct TrackingContext {
    pub uploads: usize,
    pub live: Arc<AtomicUsize>,
}

impl TrackingContext {
    pub fn live_buffers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl GraphicsContext for TrackingContext {
    type MeshBuffer = TrackedBuffer;

    fn upload_mesh(&mut self, _model: Matrix4<f32>, vertices: &[Vertex]) -> TrackedBuffer {
        self.uploads += 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        TrackedBuffer {
            vertex_count: vertices.len(),
            live: Arc::clone(&self.live),
        }
    }
}

/// Records the world translation of every draw in submission order.
#[derive(Default)]
pub struct RecordingRenderer {
    pub origins: Vec<Point3<f32>>,
}

impl Renderer<TrackedBuffer> for RecordingRenderer {
    fn draw(&mut self, model: Matrix4<f32>, _buffer: &TrackedBuffer) {
        self.origins.push(Point3::new(model.w.x, model.w.y, model.w.z));
    }
}
