/// Lifecycle stage of a chunk.
///
/// Stages only ever advance, one at a time, in declaration order; the derived
/// ordering follows that sequence so `status >= ChunkStatus::BlocksGenerated`
/// reads as "has blocks".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkStatus {
    /// Allocated, no position yet
    Uninitialized,
    /// World origin and bounding box assigned
    Positioned,
    /// Block grid filled by the terrain generator
    BlocksGenerated,
    /// CPU-side vertex buffer built
    MeshGenerated,
    /// Mesh handed to the graphics context; drawable
    Complete,
}

impl ChunkStatus {
    /// The stage a chunk must be in before advancing to `self`.
    pub fn predecessor(self) -> Option<ChunkStatus> {
        match self {
            ChunkStatus::Uninitialized => None,
            ChunkStatus::Positioned => Some(ChunkStatus::Uninitialized),
            ChunkStatus::BlocksGenerated => Some(ChunkStatus::Positioned),
            ChunkStatus::MeshGenerated => Some(ChunkStatus::BlocksGenerated),
            ChunkStatus::Complete => Some(ChunkStatus::MeshGenerated),
        }
    }
}
