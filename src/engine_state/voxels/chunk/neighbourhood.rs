//! # Neighbourhood Module
//!
//! Transient views of the chunks adjacent to a chunk being meshed.
//!
//! A `Neighbourhood` borrows the block grids of up to six adjacent chunks for the
//! duration of a single `Chunk::generate_mesh` call. A missing entry means the
//! neighbouring column is not loaded; the mesh builder treats that boundary as exposed.
//! `NeighbourGrids` is the owned form handed to a worker task, from which the
//! borrowed view is built right before meshing.

use std::sync::Arc;

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::{block_grid::BlockGrid, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// Borrowed block grids of the chunks adjacent to one chunk, indexed by `BlockSide`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighbourhood<'a> {
    grids: [Option<&'a BlockGrid>; 6],
}

impl<'a> Neighbourhood<'a> {
    /// A neighbourhood with no loaded neighbours: every boundary is exposed.
    pub fn isolated() -> Self {
        Neighbourhood { grids: [None; 6] }
    }

    /// A neighbourhood in the single-layer world: only in-plane neighbours, never top or bottom.
    pub fn planar(
        left: Option<&'a BlockGrid>,
        right: Option<&'a BlockGrid>,
        front: Option<&'a BlockGrid>,
        back: Option<&'a BlockGrid>,
    ) -> Self {
        let mut grids = [None; 6];
        grids[BlockSide::LEFT as usize] = left;
        grids[BlockSide::RIGHT as usize] = right;
        grids[BlockSide::FRONT as usize] = front;
        grids[BlockSide::BACK as usize] = back;
        Neighbourhood { grids }
    }

    /// The neighbour across the given face, if loaded.
    pub fn get(&self, side: BlockSide) -> Option<&'a BlockGrid> {
        self.grids[side as usize]
    }

    /// Asserts that every present neighbour sits exactly one chunk away from `origin`
    /// on its side.
    ///
    /// # Panics
    /// Panics if any neighbour's origin does not match; meshing against the wrong
    /// grid would silently corrupt boundary faces.
    pub fn validate(&self, origin: Point3<i32>) {
        for side in BlockSide::all() {
            if let Some(grid) = self.get(side) {
                let expected = neighbour_origin(origin, side);
                assert!(
                    grid.origin() == expected,
                    "malformed neighbourhood: {side:?} neighbour of chunk at {origin:?} has origin {:?}, expected {expected:?}",
                    grid.origin()
                );
            }
        }
    }
}

/// World-space origin of the chunk adjacent to `origin` across `side`.
pub fn neighbour_origin(origin: Point3<i32>, side: BlockSide) -> Point3<i32> {
    let offset = side.offset();
    origin
        + Vector3::new(
            offset.x * CHUNK_SIZE_X as i32,
            offset.y * CHUNK_SIZE_Y as i32,
            offset.z * CHUNK_SIZE_Z as i32,
        )
}

/// Owned handles to adjacent block grids, moved into a meshing task.
#[derive(Clone, Debug, Default)]
pub struct NeighbourGrids {
    grids: [Option<Arc<BlockGrid>>; 6],
}

impl NeighbourGrids {
    /// Records the grid found across `side`.
    pub fn insert(&mut self, side: BlockSide, grid: Arc<BlockGrid>) {
        self.grids[side as usize] = Some(grid);
    }

    /// Borrows the held grids as a `Neighbourhood` for one meshing call.
    pub fn borrow(&self) -> Neighbourhood<'_> {
        let mut grids = [None; 6];
        for (slot, grid) in grids.iter_mut().zip(self.grids.iter()) {
            *slot = grid.as_deref();
        }
        Neighbourhood { grids }
    }

    /// Number of loaded neighbours.
    pub fn len(&self) -> usize {
        self.grids.iter().filter(|grid| grid.is_some()).count()
    }

    /// Whether no neighbour is loaded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_neighbourhood_never_has_vertical_neighbours() {
        let left = BlockGrid::new(Point3::new(-16, 0, 0));
        let neighbourhood = Neighbourhood::planar(Some(&left), None, None, None);
        assert!(neighbourhood.get(BlockSide::LEFT).is_some());
        assert!(neighbourhood.get(BlockSide::TOP).is_none());
        assert!(neighbourhood.get(BlockSide::BOTTOM).is_none());
        neighbourhood.validate(Point3::new(0, 0, 0));
    }

    #[test]
    #[should_panic(expected = "malformed neighbourhood")]
    fn misplaced_neighbour_is_rejected() {
        let wrong = BlockGrid::new(Point3::new(32, 0, 0));
        Neighbourhood::planar(None, Some(&wrong), None, None).validate(Point3::new(0, 0, 0));
    }

    #[test]
    fn owned_grids_borrow_into_matching_sides() {
        let mut owned = NeighbourGrids::default();
        owned.insert(BlockSide::FRONT, Arc::new(BlockGrid::new(Point3::new(0, 0, 16))));
        let neighbourhood = owned.borrow();
        assert_eq!(owned.len(), 1);
        assert_eq!(
            neighbourhood.get(BlockSide::FRONT).map(BlockGrid::origin),
            Some(Point3::new(0, 0, 16))
        );
        assert!(neighbourhood.get(BlockSide::BACK).is_none());
    }

    #[test]
    fn neighbour_origins_step_one_chunk() {
        let origin = Point3::new(16, 0, 32);
        assert_eq!(neighbour_origin(origin, BlockSide::LEFT), Point3::new(0, 0, 32));
        assert_eq!(neighbour_origin(origin, BlockSide::RIGHT), Point3::new(32, 0, 32));
        assert_eq!(neighbour_origin(origin, BlockSide::FRONT), Point3::new(16, 0, 48));
        assert_eq!(neighbour_origin(origin, BlockSide::BACK), Point3::new(16, 0, 16));
    }
}
