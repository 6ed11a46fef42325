//! # Chunk Grid
//!
//! The streaming world: a sparse map from column to chunk around a moving viewer.
//!
//! ## Radii
//!
//! Three concentric squares (Chebyshev distance in columns) around the viewer's column:
//! - `draw_radius`: chunks are meshed, published and drawn
//! - `create_radius = draw_radius + 1`: chunks exist and have blocks, so every drawn
//!   chunk's neighbours are known when it is meshed
//! - `outer_radius = create_radius + 1`: anything further is evicted; the one-ring
//!   gap keeps chunks from thrashing when the viewer hovers on a column edge
//!
//! ## Update Phases
//!
//! 1. **free**: evict every chunk beyond `outer_radius`, whatever its stage
//! 2. **create**: allocate and position every missing column within `create_radius`
//! 3. **generate**: fill the new chunks' blocks on the worker pool, then join
//! 4. **mesh**: mesh every chunk within `draw_radius` still at `BlocksGenerated`, then join
//! 5. **publish**: hand each new mesh to the graphics context, on this thread
//!
//! The map is only ever changed on the controller thread, between batches. During a
//! batch each task write-locks its own chunk and nothing else.

use std::{
    collections::HashMap,
    sync::{Arc, RwLockReadGuard},
    thread::{self, ThreadId},
};

use cgmath::Point3;
use log::{debug, warn};
use web_time::Instant;

use crate::{
    core::MtResource,
    engine_state::{
        config::WorldConfig,
        error::{DispatchError, WorldError},
        rendering::{GraphicsContext, Renderer, VisibilityTest},
        task_management::WorkDispatcher,
        voxels::{
            block::{block_side::BlockSide, Block},
            chunk::{
                neighbourhood::NeighbourGrids, Chunk, ChunkStatus, ColumnCoordinate, CHUNK_SIZE_X, CHUNK_SIZE_Y,
                CHUNK_SIZE_Z,
            },
            tasks::{ChunkGenerationTask, ChunkMeshGenerationTask},
            terrain::{ChunkGenerator, TerrainGenerator},
        },
    },
};

/// In-plane sides consulted when meshing. The world is one chunk tall.
const PLANAR_SIDES: [BlockSide; 4] = [BlockSide::LEFT, BlockSide::RIGHT, BlockSide::FRONT, BlockSide::BACK];

/// What one `init` or `update` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Chunks removed for being beyond the outer radius
    pub evicted: usize,
    /// Chunks allocated and given blocks
    pub created: usize,
    /// Chunks meshed
    pub meshed: usize,
    /// Chunks handed to the graphics context
    pub published: usize,
}

impl UpdateReport {
    /// Whether the call changed nothing.
    pub fn is_idle(&self) -> bool {
        *self == UpdateReport::default()
    }
}

/// The streaming chunk map, generic over the graphics handle `B` of published chunks.
pub struct ChunkGrid<B: Send + Sync + 'static> {
    config: WorldConfig,
    chunks: HashMap<ColumnCoordinate, MtResource<Chunk<B>>>,
    generator: Arc<dyn ChunkGenerator>,
    dispatcher: WorkDispatcher,
    controller: ThreadId,
}

impl<B: Send + Sync + 'static> ChunkGrid<B> {
    /// Creates an empty grid generating noise terrain from `config`.
    ///
    /// The calling thread becomes the controller: every later `init` and `update`
    /// must come from it.
    pub fn new(config: WorldConfig) -> Self {
        let generator = Arc::new(TerrainGenerator::new(config.seed, config.water_level));
        Self::with_generator(config, generator)
    }

    /// Creates an empty grid using a custom chunk generator.
    pub fn with_generator(config: WorldConfig, generator: Arc<dyn ChunkGenerator>) -> Self {
        let dispatcher = WorkDispatcher::new(config.worker_count);
        ChunkGrid {
            config,
            chunks: HashMap::new(),
            generator,
            dispatcher,
            controller: thread::current().id(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Loads the world around the viewer without evicting anything.
    pub fn init<G>(&mut self, viewer: Point3<f32>, context: &mut G) -> Result<UpdateReport, WorldError>
    where
        G: GraphicsContext<MeshBuffer = B>,
    {
        self.assert_controller_thread();
        let centre = ColumnCoordinate::containing(viewer);
        self.build(centre, context, UpdateReport::default())
    }

    /// Streams the world to the viewer's position: evicts far chunks, then creates,
    /// generates, meshes and publishes near ones. Blocks until all of it is done.
    ///
    /// # Errors
    /// If a generation or meshing task panicked. The affected chunks are already
    /// evicted and will be recreated by the next call.
    ///
    /// # Panics
    /// Panics if called from a thread other than the one that created the grid.
    pub fn update<G>(&mut self, viewer: Point3<f32>, context: &mut G) -> Result<UpdateReport, WorldError>
    where
        G: GraphicsContext<MeshBuffer = B>,
    {
        self.assert_controller_thread();
        let start = Instant::now();
        let centre = ColumnCoordinate::containing(viewer);

        let report = UpdateReport {
            evicted: self.free(centre),
            ..UpdateReport::default()
        };
        let report = self.build(centre, context, report)?;

        debug!(
            "Update at column ({}, {}): {report:?}, {} chunk(s) loaded, {:?}",
            centre.x,
            centre.z,
            self.chunks.len(),
            start.elapsed()
        );
        Ok(report)
    }

    /// Draws every complete chunk that passes `visibility`, nearest first.
    ///
    /// Distance is measured in the XZ plane from the viewer to each chunk's centre.
    /// Returns the number of chunks submitted.
    pub fn render<V, R>(&self, viewer: Point3<f32>, visibility: &V, renderer: &mut R) -> usize
    where
        V: VisibilityTest + ?Sized,
        R: Renderer<B> + ?Sized,
    {
        let mut visible: Vec<(f32, RwLockReadGuard<'_, Chunk<B>>)> = self
            .chunks
            .values()
            .map(MtResource::get)
            .filter(|chunk| chunk.status() == ChunkStatus::Complete)
            .filter_map(|chunk| {
                let aabb = chunk.aabb()?;
                if !visibility.is_visible(&aabb) {
                    return None;
                }
                let centre = aabb.center();
                let (dx, dz) = (centre.x - viewer.x, centre.z - viewer.z);
                Some((dx * dx + dz * dz, chunk))
            })
            .collect();

        visible.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        for (_, chunk) in &visible {
            chunk.render(&mut *renderer);
        }
        visible.len()
    }

    /// The chunk containing a world position, if loaded.
    pub fn get_chunk(&self, position: Point3<f32>) -> Option<RwLockReadGuard<'_, Chunk<B>>> {
        self.chunk_at(ColumnCoordinate::containing(position))
    }

    /// The chunk of a column, if loaded.
    pub fn chunk_at(&self, column: ColumnCoordinate) -> Option<RwLockReadGuard<'_, Chunk<B>>> {
        self.chunks.get(&column).map(MtResource::get)
    }

    /// The block at a world block coordinate.
    ///
    /// `None` when the column is not loaded, its blocks are not generated yet, or
    /// the height is outside the world.
    pub fn get_block(&self, position: Point3<i32>) -> Option<Block> {
        if !(0..CHUNK_SIZE_Y as i32).contains(&position.y) {
            return None;
        }
        let chunk = self.chunk_at(ColumnCoordinate::containing_block(position))?;
        let blocks = chunk.blocks()?;
        Some(blocks.get(
            position.x.rem_euclid(CHUNK_SIZE_X as i32) as usize,
            position.y as usize,
            position.z.rem_euclid(CHUNK_SIZE_Z as i32) as usize,
        ))
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Every loaded column, in no particular order.
    pub fn columns(&self) -> impl Iterator<Item = ColumnCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    pub fn status_of(&self, column: ColumnCoordinate) -> Option<ChunkStatus> {
        self.chunk_at(column).map(|chunk| chunk.status())
    }

    pub fn count_with_status(&self, status: ChunkStatus) -> usize {
        self.chunks.values().filter(|chunk| chunk.get().status() == status).count()
    }

    fn assert_controller_thread(&self) {
        assert!(
            thread::current().id() == self.controller,
            "chunk grid driven from {:?}, but its controller thread is {:?}",
            thread::current().id(),
            self.controller
        );
    }

    /// Removes every chunk beyond the outer radius. Dropping a chunk releases its
    /// graphics handle.
    fn free(&mut self, centre: ColumnCoordinate) -> usize {
        let start = Instant::now();
        let outer_radius = self.config.outer_radius();
        let before = self.chunks.len();
        self.chunks.retain(|column, _| column.distance(centre) <= outer_radius);
        let evicted = before - self.chunks.len();
        if evicted > 0 {
            debug!("Evicted {evicted} chunk(s) in {:?}", start.elapsed());
        }
        evicted
    }

    fn build<G>(
        &mut self,
        centre: ColumnCoordinate,
        context: &mut G,
        mut report: UpdateReport,
    ) -> Result<UpdateReport, WorldError>
    where
        G: GraphicsContext<MeshBuffer = B>,
    {
        report.created = self.generate_missing(centre)?;

        // Chunks that meshed are published even when others in the batch failed.
        let (meshed, failure) = self.mesh_drawable(centre);
        report.meshed = meshed.len();
        report.published = self.publish(&meshed, context);

        match failure {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    /// Creates and generates every missing column within the create radius.
    fn generate_missing(&mut self, centre: ColumnCoordinate) -> Result<usize, WorldError> {
        let start = Instant::now();
        let tasks: Vec<ChunkGenerationTask<B>> = centre
            .within(self.config.create_radius())
            .filter(|column| !self.chunks.contains_key(column))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|column| {
                let mut chunk = Chunk::new();
                chunk.set_position(column.origin());
                let chunk = MtResource::new(chunk);
                self.chunks.insert(column, chunk.clone());
                ChunkGenerationTask::new(column, chunk, Arc::clone(&self.generator))
            })
            .collect();

        let columns: Vec<ColumnCoordinate> = tasks.iter().map(|task| task.column).collect();
        if columns.is_empty() {
            return Ok(0);
        }

        if let Err(source) = self.dispatcher.run_batch(tasks, ChunkGenerationTask::process) {
            let failed = self.evict_failed(&columns, &source);
            return Err(WorldError::BlockGeneration { columns: failed, source });
        }

        debug!("Generated blocks for {} chunk(s) in {:?}", columns.len(), start.elapsed());
        Ok(columns.len())
    }

    /// Meshes every drawable chunk still waiting for a mesh. Returns the columns that
    /// meshed successfully, alongside the error if any failed.
    fn mesh_drawable(&mut self, centre: ColumnCoordinate) -> (Vec<ColumnCoordinate>, Option<WorldError>) {
        let start = Instant::now();
        let tasks: Vec<ChunkMeshGenerationTask<B>> = centre
            .within(self.config.draw_radius)
            .filter_map(|column| {
                let chunk = self.chunks.get(&column)?;
                if chunk.get().status() != ChunkStatus::BlocksGenerated {
                    return None;
                }
                Some(ChunkMeshGenerationTask::new(column, chunk.clone(), self.neighbour_grids(column)))
            })
            .collect();

        let columns: Vec<ColumnCoordinate> = tasks.iter().map(|task| task.column).collect();
        if columns.is_empty() {
            return (columns, None);
        }

        match self.dispatcher.run_batch(tasks, ChunkMeshGenerationTask::process) {
            Ok(()) => {
                debug!("Meshed {} chunk(s) in {:?}", columns.len(), start.elapsed());
                (columns, None)
            }
            Err(source) => {
                let failed = self.evict_failed(&columns, &source);
                let succeeded = columns.into_iter().filter(|column| !failed.contains(column)).collect();
                (succeeded, Some(WorldError::MeshGeneration { columns: failed, source }))
            }
        }
    }

    /// Shares the block grids of a column's loaded in-plane neighbours.
    ///
    /// # Panics
    /// Panics if a loaded neighbour has no blocks yet; meshing against it would
    /// emit faces that later become hidden.
    fn neighbour_grids(&self, column: ColumnCoordinate) -> NeighbourGrids {
        let mut grids = NeighbourGrids::default();
        for side in PLANAR_SIDES {
            let Some(neighbour) = column.neighbour(side).and_then(|n| self.chunks.get(&n)) else {
                continue;
            };
            let neighbour = neighbour.get();
            match neighbour.blocks() {
                Some(blocks) => grids.insert(side, Arc::clone(blocks)),
                None => panic!(
                    "{side:?} neighbour of column ({}, {}) is {:?}, meshing needs at least BlocksGenerated",
                    column.x,
                    column.z,
                    neighbour.status()
                ),
            }
        }
        grids
    }

    /// Publishes freshly meshed chunks. Only ever runs on the controller thread.
    fn publish<G>(&mut self, columns: &[ColumnCoordinate], context: &mut G) -> usize
    where
        G: GraphicsContext<MeshBuffer = B>,
    {
        let start = Instant::now();
        let mut published = 0;
        for column in columns {
            if let Some(chunk) = self.chunks.get(column) {
                chunk.get_mut().publish(context);
                published += 1;
            }
        }
        if published > 0 {
            debug!("Published {published} chunk(s) in {:?}", start.elapsed());
        }
        published
    }

    /// Evicts the chunks named by a failed batch and returns their columns.
    fn evict_failed(&mut self, columns: &[ColumnCoordinate], error: &DispatchError) -> Vec<ColumnCoordinate> {
        let failed: Vec<ColumnCoordinate> = match error {
            DispatchError::TasksFailed { failures } => failures
                .iter()
                .filter_map(|failure| columns.get(failure.index).copied())
                .collect(),
            DispatchError::Disconnected => columns.to_vec(),
        };
        for column in &failed {
            self.chunks.remove(column);
        }
        warn!("Evicted {} chunk(s) after failed work: {error}", failed.len());
        failed
    }
}
