//! # Chunk Generation Task
//!
//! Fills a freshly positioned chunk with terrain.

use std::sync::Arc;

use crate::{
    core::MtResource,
    engine_state::voxels::{
        chunk::{Chunk, ColumnCoordinate},
        terrain::ChunkGenerator,
    },
};

/// Generates the blocks of one `Positioned` chunk.
pub struct ChunkGenerationTask<B: Send + Sync + 'static> {
    /// The column being generated
    pub column: ColumnCoordinate,
    chunk: MtResource<Chunk<B>>,
    generator: Arc<dyn ChunkGenerator>,
}

impl<B: Send + Sync + 'static> ChunkGenerationTask<B> {
    pub fn new(column: ColumnCoordinate, chunk: MtResource<Chunk<B>>, generator: Arc<dyn ChunkGenerator>) -> Self {
        ChunkGenerationTask {
            column,
            chunk,
            generator,
        }
    }

    /// Runs the generator into the chunk, holding only this chunk's write lock.
    pub fn process(&self) {
        self.chunk.get_mut().generate_blocks(self.generator.as_ref());
    }
}
