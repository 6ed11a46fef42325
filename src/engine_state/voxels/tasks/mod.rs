//! # Voxel Task System
//!
//! Per-chunk work items run on the worker pool during a streaming update.
//! Each item owns a handle to exactly one chunk and locks only that chunk;
//! everything else it needs (the generator, neighbour grids) is shared read-only.

pub mod chunk_generation_task;
pub mod chunk_mesh_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
pub use chunk_mesh_generation_task::ChunkMeshGenerationTask;
