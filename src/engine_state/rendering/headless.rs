//! CPU-only graphics collaborators, for running the world without a GPU.

use cgmath::{Matrix4, Vector4};

use super::{GraphicsContext, Renderer, Vertex};

/// Stand-in for uploaded GPU resources: remembers only the size of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessMesh {
    pub vertex_count: usize,
}

/// A `GraphicsContext` that keeps nothing but upload statistics.
#[derive(Debug, Default)]
pub struct HeadlessContext {
    pub uploads: usize,
    pub uploaded_vertices: usize,
}

impl GraphicsContext for HeadlessContext {
    type MeshBuffer = HeadlessMesh;

    fn upload_mesh(&mut self, _model: Matrix4<f32>, vertices: &[Vertex]) -> HeadlessMesh {
        self.uploads += 1;
        self.uploaded_vertices += vertices.len();
        HeadlessMesh {
            vertex_count: vertices.len(),
        }
    }
}

/// A `Renderer` that records what a frame would have drawn.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    /// World-space translation of each drawn chunk, in submission order
    pub origins: Vec<[f32; 3]>,
    pub vertices: usize,
}

impl FrameRecorder {
    pub fn draw_calls(&self) -> usize {
        self.origins.len()
    }

    pub fn clear(&mut self) {
        self.origins.clear();
        self.vertices = 0;
    }
}

impl Renderer<HeadlessMesh> for FrameRecorder {
    fn draw(&mut self, model: Matrix4<f32>, buffer: &HeadlessMesh) {
        let translation: Vector4<f32> = model.w;
        self.origins.push([translation.x, translation.y, translation.z]);
        self.vertices += buffer.vertex_count;
    }
}
