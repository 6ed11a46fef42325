//! Rendering boundary for the voxel world.
//!
//! The world never talks to a graphics API directly. It hands finished meshes to a
//! `GraphicsContext` when a chunk is published, and later asks a `Renderer` to draw
//! the handle it got back. Both run on the single thread that owns graphics state.
//!
//! - `meshing`: turns block grids into culled triangle lists
//! - `vertex`: the vertex format shared by meshing and the GPU layout
//! - `aabb`: bounding boxes and the per-frame visibility test
//! - `gpu`: the `wgpu` implementation of both traits
//! - `headless`: CPU-only implementations that just keep statistics

use cgmath::Matrix4;

mod aabb;
pub mod gpu;
pub mod headless;
pub mod meshing;
mod vertex;

pub use aabb::{Aabb, VisibilityTest};
pub use vertex::Vertex;

/// Owner of graphics-resource creation.
///
/// Called exactly once per chunk, when its mesh is published.
pub trait GraphicsContext {
    /// Handle to the uploaded mesh. Dropping it releases the resources.
    type MeshBuffer: Send + Sync + 'static;

    /// Uploads a chunk's vertices together with its model transform.
    fn upload_mesh(&mut self, model: Matrix4<f32>, vertices: &[Vertex]) -> Self::MeshBuffer;
}

/// Submits draws of previously uploaded chunk meshes.
pub trait Renderer<B> {
    fn draw(&mut self, model: Matrix4<f32>, buffer: &B);
}
