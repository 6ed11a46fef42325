//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, the block catalog, and block face handling.

use block_type::{BlockType, Properties};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// A block carries only its type; properties are resolved through the block
/// catalog and never stored per instance.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute and the compact `BlockTypeSize` keep a chunk's
/// grid at one byte per block.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An air block.
    pub const AIR: Block = Block { block_type: 0 };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored type.
    pub fn block_type(&self) -> BlockType {
        BlockType::from_int(self.block_type)
    }

    /// Resolves this block's properties from the catalog.
    pub fn properties(&self) -> &'static Properties {
        self.block_type().properties()
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}
