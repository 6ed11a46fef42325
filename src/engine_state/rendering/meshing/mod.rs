//! Mesh generation for voxel chunks.
//!
//! Converts a chunk's block grid into a flat list of triangles, culling every
//! face hidden by an adjacent visible block.
//!
//! # Architecture
//! - `face`: unit-cube face templates and their expansion into vertices
//! - `chunk_mesh`: the culling pass over one chunk and its neighbourhood
//!
//! Meshes are not indexed: each face is six vertices, two triangles.

mod chunk_mesh;
mod face;

pub use chunk_mesh::{estimate_face_count, ChunkMesh};
pub use face::{Face, VERTICES_PER_FACE};
