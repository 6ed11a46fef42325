//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one 16x256x16 column of blocks, its
//! derived mesh, and the lifecycle that carries it from allocation to drawable.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --set_position--> Positioned --generate_blocks--> BlocksGenerated
//!   --generate_mesh--> MeshGenerated --publish--> Complete
//! ```
//!
//! Each transition requires the chunk to be in the immediately preceding stage.
//! Calling one out of order is a programming error and panics; a chunk is never
//! left half-advanced.
//!
//! ## Data Ownership
//!
//! The block grid is shared behind an `Arc` once generated, so neighbouring
//! chunks' meshing tasks can read it without locking this chunk. The CPU-side
//! vertex data lives only until publish; afterwards the chunk holds the graphics
//! handle returned by the `GraphicsContext`, and dropping the chunk drops it.

use std::sync::Arc;

use cgmath::{Matrix4, Point3, Vector3};

use crate::engine_state::rendering::{meshing::ChunkMesh, Aabb, GraphicsContext, Renderer};

use super::terrain::ChunkGenerator;

pub mod block_grid;
mod column;
pub mod neighbourhood;
mod status;

use block_grid::BlockGrid;
pub use column::ColumnCoordinate;
use neighbourhood::Neighbourhood;
pub use status::ChunkStatus;

/// Width of a chunk in blocks.
pub const CHUNK_SIZE_X: usize = 16;
/// Height of a chunk in blocks; the whole world height.
pub const CHUNK_SIZE_Y: usize = 256;
/// Depth of a chunk in blocks.
pub const CHUNK_SIZE_Z: usize = 16;
/// The total number of blocks in a chunk.
pub const CHUNK_BLOCK_COUNT: usize = CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z;

/// Where a chunk sits in the world. Fixed once assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World-space position of local block (0, 0, 0)
    pub origin: Point3<i32>,
    /// World-space bounds, origin .. origin + chunk size
    pub aabb: Aabb,
}

impl Placement {
    fn new(origin: Point3<i32>) -> Self {
        let min = Point3::new(origin.x as f32, origin.y as f32, origin.z as f32);
        let size = Vector3::new(CHUNK_SIZE_X as f32, CHUNK_SIZE_Y as f32, CHUNK_SIZE_Z as f32);
        Placement {
            origin,
            aabb: Aabb::from_origin(min, size),
        }
    }
}

/// Per-stage data. Each variant carries exactly what that stage has produced.
enum ChunkStage<B> {
    Uninitialized,
    Positioned,
    BlocksGenerated {
        blocks: Arc<BlockGrid>,
    },
    MeshGenerated {
        blocks: Arc<BlockGrid>,
        mesh: ChunkMesh,
    },
    Complete {
        blocks: Arc<BlockGrid>,
        vertex_count: usize,
        buffer: B,
    },
}

impl<B> ChunkStage<B> {
    fn status(&self) -> ChunkStatus {
        match self {
            ChunkStage::Uninitialized => ChunkStatus::Uninitialized,
            ChunkStage::Positioned => ChunkStatus::Positioned,
            ChunkStage::BlocksGenerated { .. } => ChunkStatus::BlocksGenerated,
            ChunkStage::MeshGenerated { .. } => ChunkStatus::MeshGenerated,
            ChunkStage::Complete { .. } => ChunkStatus::Complete,
        }
    }
}

/// One chunk column of the world, generic over the graphics handle `B` it
/// receives when published.
pub struct Chunk<B> {
    placement: Option<Placement>,
    stage: ChunkStage<B>,
}

impl<B> Chunk<B> {
    /// Allocates an uninitialized chunk.
    pub fn new() -> Self {
        Chunk {
            placement: None,
            stage: ChunkStage::Uninitialized,
        }
    }

    pub fn status(&self) -> ChunkStatus {
        self.stage.status()
    }

    /// Panics unless the chunk is in the stage preceding `next`.
    fn checkpoint(&self, next: ChunkStatus) {
        let found = self.status();
        match next.predecessor() {
            Some(expected) if expected == found => {}
            Some(expected) => {
                panic!("chunk transition out of order: {next:?} requires {expected:?}, found {found:?}")
            }
            None => panic!("chunk transition out of order: nothing advances to {next:?}"),
        }
    }

    fn placement(&self) -> &Placement {
        match &self.placement {
            Some(placement) => placement,
            None => panic!("chunk at stage {:?} has no position", self.status()),
        }
    }

    /// Assigns the chunk's world origin and bounding box.
    ///
    /// # Panics
    /// Panics unless the chunk is `Uninitialized`.
    pub fn set_position(&mut self, origin: Point3<i32>) {
        self.checkpoint(ChunkStatus::Positioned);
        self.placement = Some(Placement::new(origin));
        self.stage = ChunkStage::Positioned;
    }

    /// Fills the block grid from `generator`.
    ///
    /// # Panics
    /// Panics unless the chunk is `Positioned`.
    pub fn generate_blocks(&mut self, generator: &dyn ChunkGenerator) {
        self.checkpoint(ChunkStatus::BlocksGenerated);
        let origin = self.placement().origin;
        let blocks = generator.generate(origin);
        assert!(
            blocks.origin() == origin,
            "generator produced a grid at {:?} for a chunk at {origin:?}",
            blocks.origin()
        );
        self.stage = ChunkStage::BlocksGenerated {
            blocks: Arc::new(blocks),
        };
    }

    /// Builds the culled vertex buffer against the given neighbours.
    ///
    /// # Panics
    /// Panics unless the chunk is `BlocksGenerated`, or if a neighbour in
    /// `neighbours` is not adjacent to this chunk.
    pub fn generate_mesh(&mut self, neighbours: &Neighbourhood<'_>) {
        self.checkpoint(ChunkStatus::MeshGenerated);
        neighbours.validate(self.placement().origin);
        let ChunkStage::BlocksGenerated { blocks } = &self.stage else {
            unreachable!("checkpoint guarantees BlocksGenerated");
        };
        let mesh = ChunkMesh::build(blocks, neighbours);
        let blocks = Arc::clone(blocks);
        self.stage = ChunkStage::MeshGenerated { blocks, mesh };
    }

    /// Hands the vertex buffer to the graphics context and keeps the returned handle.
    ///
    /// Must be called on the thread owning `context`.
    ///
    /// # Panics
    /// Panics unless the chunk is `MeshGenerated`.
    pub fn publish<G>(&mut self, context: &mut G)
    where
        G: GraphicsContext<MeshBuffer = B>,
    {
        self.checkpoint(ChunkStatus::Complete);
        let model = self.model_matrix();
        let ChunkStage::MeshGenerated { blocks, mesh } = &self.stage else {
            unreachable!("checkpoint guarantees MeshGenerated");
        };
        let buffer = context.upload_mesh(model, mesh.vertices());
        let vertex_count = mesh.vertex_count();
        let blocks = Arc::clone(blocks);
        // Dropping the MeshGenerated stage frees the CPU-side vertices.
        self.stage = ChunkStage::Complete {
            blocks,
            vertex_count,
            buffer,
        };
    }

    /// Submits this chunk to `renderer`. Does nothing unless the chunk is `Complete`.
    pub fn render<R>(&self, renderer: &mut R)
    where
        R: Renderer<B> + ?Sized,
    {
        if let ChunkStage::Complete { buffer, .. } = &self.stage {
            renderer.draw(self.model_matrix(), buffer);
        }
    }

    /// World-space origin, once positioned.
    pub fn origin(&self) -> Option<Point3<i32>> {
        self.placement.map(|placement| placement.origin)
    }

    /// World-space bounds, once positioned.
    pub fn aabb(&self) -> Option<Aabb> {
        self.placement.map(|placement| placement.aabb)
    }

    /// Translation from chunk-local to world space.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let origin = self.placement().origin;
        Matrix4::from_translation(Vector3::new(origin.x as f32, origin.y as f32, origin.z as f32))
    }

    /// The block grid, from `BlocksGenerated` on.
    pub fn blocks(&self) -> Option<&Arc<BlockGrid>> {
        match &self.stage {
            ChunkStage::BlocksGenerated { blocks }
            | ChunkStage::MeshGenerated { blocks, .. }
            | ChunkStage::Complete { blocks, .. } => Some(blocks),
            ChunkStage::Uninitialized | ChunkStage::Positioned => None,
        }
    }

    /// The built mesh, only while awaiting publish.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        match &self.stage {
            ChunkStage::MeshGenerated { mesh, .. } => Some(mesh),
            _ => None,
        }
    }

    /// The graphics handle, once `Complete`.
    pub fn mesh_buffer(&self) -> Option<&B> {
        match &self.stage {
            ChunkStage::Complete { buffer, .. } => Some(buffer),
            _ => None,
        }
    }

    /// Vertices in the chunk's mesh; zero before meshing.
    pub fn vertex_count(&self) -> usize {
        match &self.stage {
            ChunkStage::MeshGenerated { mesh, .. } => mesh.vertex_count(),
            ChunkStage::Complete { vertex_count, .. } => *vertex_count,
            _ => 0,
        }
    }

    pub fn face_count(&self) -> usize {
        self.vertex_count() / crate::engine_state::rendering::meshing::VERTICES_PER_FACE
    }
}

impl<B> Default for Chunk<B> {
    fn default() -> Self {
        Chunk::new()
    }
}

impl<B> std::fmt::Debug for Chunk<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("origin", &self.origin())
            .field("status", &self.status())
            .field("vertex_count", &self.vertex_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine_state::{
        rendering::Vertex,
        voxels::block::{block_type::BlockType, Block},
    };

    use super::*;

    /// Places a single rock block at local (0, 0, 0).
    struct SingleBlock;

    impl ChunkGenerator for SingleBlock {
        fn generate(&self, origin: Point3<i32>) -> BlockGrid {
            let mut grid = BlockGrid::new(origin);
            grid.set(0, 0, 0, Block::new(BlockType::ROCK));
            grid
        }
    }

    #[derive(Default)]
    struct CountingContext {
        uploads: usize,
    }

    impl GraphicsContext for CountingContext {
        type MeshBuffer = usize;

        fn upload_mesh(&mut self, _model: Matrix4<f32>, vertices: &[Vertex]) -> usize {
            self.uploads += 1;
            vertices.len()
        }
    }

    #[derive(Default)]
    struct DrawLog {
        draws: Vec<(Matrix4<f32>, usize)>,
    }

    impl Renderer<usize> for DrawLog {
        fn draw(&mut self, model: Matrix4<f32>, buffer: &usize) {
            self.draws.push((model, *buffer));
        }
    }

    fn advance_to_mesh(chunk: &mut Chunk<usize>) {
        chunk.set_position(Point3::new(32, 0, -16));
        chunk.generate_blocks(&SingleBlock);
        chunk.generate_mesh(&Neighbourhood::isolated());
    }

    #[test]
    fn full_lifecycle_reaches_complete() {
        let mut chunk = Chunk::<usize>::new();
        assert_eq!(chunk.status(), ChunkStatus::Uninitialized);
        assert!(chunk.origin().is_none());

        advance_to_mesh(&mut chunk);
        assert_eq!(chunk.status(), ChunkStatus::MeshGenerated);
        assert_eq!(chunk.face_count(), 6);

        let mut context = CountingContext::default();
        chunk.publish(&mut context);
        assert_eq!(chunk.status(), ChunkStatus::Complete);
        assert_eq!(context.uploads, 1);
        assert_eq!(chunk.mesh_buffer(), Some(&36));
        assert_eq!(chunk.vertex_count(), 36);
        assert!(chunk.mesh().is_none());
        assert!(chunk.blocks().is_some());
    }

    #[test]
    fn bounding_box_spans_the_column() {
        let mut chunk = Chunk::<usize>::new();
        chunk.set_position(Point3::new(-16, 0, 48));
        let aabb = chunk.aabb().unwrap();
        assert_eq!(aabb.min, Point3::new(-16.0, 0.0, 48.0));
        assert_eq!(aabb.max, Point3::new(0.0, 256.0, 64.0));
    }

    #[test]
    fn render_is_a_no_op_until_complete() {
        let mut chunk = Chunk::<usize>::new();
        let mut log = DrawLog::default();

        chunk.render(&mut log);
        advance_to_mesh(&mut chunk);
        chunk.render(&mut log);
        assert!(log.draws.is_empty());

        chunk.publish(&mut CountingContext::default());
        chunk.render(&mut log);
        assert_eq!(log.draws.len(), 1);
        assert_eq!(log.draws[0].0, Matrix4::from_translation(Vector3::new(32.0, 0.0, -16.0)));
    }

    #[test]
    #[should_panic(expected = "chunk transition out of order")]
    fn meshing_before_blocks_panics() {
        let mut chunk = Chunk::<usize>::new();
        chunk.set_position(Point3::new(0, 0, 0));
        chunk.generate_mesh(&Neighbourhood::isolated());
    }

    #[test]
    #[should_panic(expected = "chunk transition out of order")]
    fn positioning_twice_panics() {
        let mut chunk = Chunk::<usize>::new();
        chunk.set_position(Point3::new(0, 0, 0));
        chunk.set_position(Point3::new(16, 0, 0));
    }

    #[test]
    #[should_panic(expected = "chunk transition out of order")]
    fn publishing_twice_panics() {
        let mut chunk = Chunk::<usize>::new();
        advance_to_mesh(&mut chunk);
        let mut context = CountingContext::default();
        chunk.publish(&mut context);
        chunk.publish(&mut context);
    }

    #[test]
    #[should_panic(expected = "malformed neighbourhood")]
    fn meshing_against_a_distant_neighbour_panics() {
        let mut chunk = Chunk::<usize>::new();
        chunk.set_position(Point3::new(0, 0, 0));
        chunk.generate_blocks(&SingleBlock);
        let far = BlockGrid::new(Point3::new(64, 0, 0));
        chunk.generate_mesh(&Neighbourhood::planar(None, Some(&far), None, None));
    }
}
