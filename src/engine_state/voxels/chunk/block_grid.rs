//! # Block Grid Module
//!
//! Fixed-size storage for the blocks of one chunk.
//!
//! ## Memory Layout
//!
//! Blocks are stored densely, one byte each, in X-major order (x, then y, then z).
//! Alongside the blocks a bit vector caches the catalog's `visible` flag for every
//! cell, so the mesh builder's neighbour checks never touch the catalog:
//! - `blocks`: `CHUNK_SIZE_X * CHUNK_SIZE_Y * CHUNK_SIZE_Z` entries
//! - `visible`: one bit per entry, kept in sync by `set`

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{CHUNK_BLOCK_COUNT, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z};

/// The block contents of one chunk, tagged with the chunk's world-space origin.
///
/// Once generated, a grid is shared read-only (behind an `Arc`) with the meshing
/// tasks of neighbouring chunks.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockGrid {
    origin: Point3<i32>,
    blocks: Vec<Block>,
    visible: BitVec,
}

impl BlockGrid {
    /// Creates a grid at `origin` filled with air.
    pub fn new(origin: Point3<i32>) -> Self {
        BlockGrid {
            origin,
            blocks: vec![Block::AIR; CHUNK_BLOCK_COUNT],
            visible: BitVec::repeat(false, CHUNK_BLOCK_COUNT),
        }
    }

    /// Creates a grid at `origin` filled with a single block type.
    pub fn filled(origin: Point3<i32>, block_type: BlockType) -> Self {
        let visible = block_type.properties().visible;
        BlockGrid {
            origin,
            blocks: vec![Block::new(block_type); CHUNK_BLOCK_COUNT],
            visible: BitVec::repeat(visible, CHUNK_BLOCK_COUNT),
        }
    }

    /// Linear index of a chunk-local cell.
    ///
    /// # Panics
    /// Panics in debug builds if the cell lies outside the chunk.
    #[inline]
    pub fn index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < CHUNK_SIZE_X && y < CHUNK_SIZE_Y && z < CHUNK_SIZE_Z);
        (x * CHUNK_SIZE_Y + y) * CHUNK_SIZE_Z + z
    }

    /// World-space position of the cell at local (0, 0, 0).
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// The block at a chunk-local cell.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[Self::index(x, y, z)]
    }

    /// Overwrites the block at a chunk-local cell, keeping the visibility cache in sync.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: Block) {
        let index = Self::index(x, y, z);
        self.blocks[index] = block;
        self.visible.set(index, block.properties().visible);
    }

    /// Whether the block at a chunk-local cell is visible.
    #[inline]
    pub fn is_visible(&self, x: usize, y: usize, z: usize) -> bool {
        self.visible[Self::index(x, y, z)]
    }

    /// All blocks in storage order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of visible blocks in the grid.
    pub fn visible_count(&self) -> usize {
        self.visible.count_ones()
    }
}

impl std::fmt::Debug for BlockGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockGrid")
            .field("origin", &self.origin)
            .field("visible_count", &self.visible_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_visibility_cache() {
        let mut grid = BlockGrid::new(Point3::new(0, 0, 0));
        assert_eq!(grid.visible_count(), 0);

        grid.set(3, 100, 7, Block::new(BlockType::ROCK));
        assert!(grid.is_visible(3, 100, 7));
        assert_eq!(grid.get(3, 100, 7).block_type(), BlockType::ROCK);
        assert_eq!(grid.visible_count(), 1);

        grid.set(3, 100, 7, Block::AIR);
        assert!(!grid.is_visible(3, 100, 7));
        assert_eq!(grid.visible_count(), 0);
    }

    #[test]
    fn indices_cover_the_grid_exactly_once() {
        let mut seen = vec![false; CHUNK_BLOCK_COUNT];
        for x in 0..CHUNK_SIZE_X {
            for y in 0..CHUNK_SIZE_Y {
                for z in 0..CHUNK_SIZE_Z {
                    let index = BlockGrid::index(x, y, z);
                    assert!(!seen[index]);
                    seen[index] = true;
                }
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn filled_grid_is_fully_visible() {
        let grid = BlockGrid::filled(Point3::new(16, 0, -32), BlockType::DIRT);
        assert_eq!(grid.visible_count(), CHUNK_BLOCK_COUNT);
        assert_eq!(grid.origin(), Point3::new(16, 0, -32));
    }
}
