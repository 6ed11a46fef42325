//! # Voxel World
//!
//! Block data, chunks, terrain and the streaming grid that ties them together.
//!
//! ## Architecture
//!
//! * **Block**: block types and the immutable catalog of their properties
//! * **Chunk**: a 16x256x16 column of blocks and its lifecycle from allocation to drawable
//! * **Terrain**: the deterministic generator that fills a chunk from its origin
//! * **ChunkGrid**: the sparse column map that streams chunks around the viewer
//! * **Tasks**: the per-chunk work items the grid runs on the worker pool
//!
//! ## Data Flow
//!
//! 1. The grid creates chunks near the viewer and positions them
//! 2. Generation tasks fill their blocks in parallel
//! 3. Mesh tasks build each drawable chunk's mesh against its neighbours' blocks
//! 4. The grid publishes the meshes on the controller thread
//! 5. Complete chunks are drawn nearest first
//!
//! ## Thread Safety
//!
//! * Each chunk sits behind its own lock; a task only ever locks the chunk it works on
//! * Generated block grids are immutable and shared by `Arc` with neighbouring mesh tasks
//! * The map itself is only touched by the controller thread, between batches

pub mod block;
pub mod chunk;
pub mod chunk_grid;
pub mod tasks;
pub mod terrain;
