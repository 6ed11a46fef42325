//! # Chunk Mesh Generation Task
//!
//! Builds the culled mesh of one chunk against the block grids of its loaded
//! neighbours. The neighbour grids are resolved on the controller thread before
//! the batch starts, so the task never touches another chunk's lock.

use crate::{
    core::MtResource,
    engine_state::voxels::chunk::{neighbourhood::NeighbourGrids, Chunk, ColumnCoordinate},
};

/// Meshes one `BlocksGenerated` chunk.
pub struct ChunkMeshGenerationTask<B: Send + Sync + 'static> {
    /// The column being meshed
    pub column: ColumnCoordinate,
    chunk: MtResource<Chunk<B>>,
    neighbours: NeighbourGrids,
}

impl<B: Send + Sync + 'static> ChunkMeshGenerationTask<B> {
    pub fn new(column: ColumnCoordinate, chunk: MtResource<Chunk<B>>, neighbours: NeighbourGrids) -> Self {
        ChunkMeshGenerationTask {
            column,
            chunk,
            neighbours,
        }
    }

    /// Number of loaded neighbours this chunk is meshed against.
    pub fn neighbour_count(&self) -> usize {
        self.neighbours.len()
    }

    pub fn process(&self) {
        // The borrowed view lives only for this call.
        let neighbourhood = self.neighbours.borrow();
        self.chunk.get_mut().generate_mesh(&neighbourhood);
    }
}
