//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! static catalog of their immutable properties.

use num_derive::FromPrimitive;

use super::block_side::BlockSide;
use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the compact `BlockTypeSize` values stored in each `Block`.
/// The `FromPrimitive` derive allows conversion back from those integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never rendered.
    AIR = 0,

    /// Grass-topped soil; the top face differs from the sides and bottom.
    GRASS = 1,

    /// Plain soil found beneath the grass layer.
    DIRT = 2,

    /// Bedrock-like stone below the soil.
    ROCK = 3,

    /// Sand.
    SAND = 4,

    /// Water filling low terrain up to the water level.
    WATER = 5,
}

impl BlockType {
    /// Every block type, in discriminant order.
    pub const ALL: [BlockType; 6] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::ROCK,
        BlockType::SAND,
        BlockType::WATER,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Panics
    /// Panics if the input value doesn't correspond to a valid `BlockType`.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        let btype_option = num::FromPrimitive::from_u8(btype);
        btype_option.unwrap_or_else(|| panic!("invalid block type discriminant {btype}"))
    }

    /// Looks up this type's entry in the block catalog.
    pub fn properties(self) -> &'static Properties {
        properties(self)
    }
}

/// Immutable visual and physical properties shared by every block of one type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Properties {
    /// Whether faces of this block are ever emitted, and whether it hides its neighbours' faces.
    pub visible: bool,
    /// Whether the block is physically solid.
    pub solid: bool,
    /// Texture array layer for each face, indexed by `BlockSide as usize`.
    pub textures: [u32; 6],
}

impl Properties {
    const fn uniform(texture: u32) -> Self {
        Properties {
            visible: true,
            solid: true,
            textures: [texture; 6],
        }
    }

    /// Texture layer used for the given face.
    pub fn texture(&self, side: BlockSide) -> u32 {
        self.textures[side as usize]
    }
}

/// Maps each block type to its properties.
///
/// Indexed by `BlockType as usize`. Texture order follows `BlockSide`:
/// [Front, Back, Left, Right, Top, Bottom]
static BLOCK_CATALOG: [Properties; 6] = [
    // AIR
    Properties {
        visible: false,
        solid: false,
        textures: [0; 6],
    },
    // GRASS (sides: 3, top: 2, bottom: 43)
    Properties {
        visible: true,
        solid: true,
        textures: [3, 3, 3, 3, 2, 43],
    },
    // DIRT
    Properties::uniform(43),
    // ROCK
    Properties::uniform(0),
    // SAND
    Properties::uniform(40),
    // WATER
    Properties::uniform(356),
];

/// Resolves the immutable properties of a block type.
pub fn properties(block_type: BlockType) -> &'static Properties {
    &BLOCK_CATALOG[block_type as usize]
}
