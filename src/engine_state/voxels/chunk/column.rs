use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::{CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// The (x, z) index of a chunk column. The world is a single chunk tall, so a
/// column identifies exactly one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnCoordinate {
    pub x: i32,
    pub z: i32,
}

impl ColumnCoordinate {
    pub const fn new(x: i32, z: i32) -> Self {
        ColumnCoordinate { x, z }
    }

    /// The column containing a world-space position.
    pub fn containing(position: Point3<f32>) -> Self {
        ColumnCoordinate {
            x: (position.x / CHUNK_SIZE_X as f32).floor() as i32,
            z: (position.z / CHUNK_SIZE_Z as f32).floor() as i32,
        }
    }

    /// The column containing a world-space block coordinate.
    pub fn containing_block(position: Point3<i32>) -> Self {
        ColumnCoordinate {
            x: position.x.div_euclid(CHUNK_SIZE_X as i32),
            z: position.z.div_euclid(CHUNK_SIZE_Z as i32),
        }
    }

    /// World-space origin of the chunk in this column.
    pub fn origin(self) -> Point3<i32> {
        Point3::new(self.x * CHUNK_SIZE_X as i32, 0, self.z * CHUNK_SIZE_Z as i32)
    }

    /// Square (Chebyshev) distance in columns.
    pub fn distance(self, other: ColumnCoordinate) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// The adjacent column across an in-plane side. `None` for top and bottom.
    pub fn neighbour(self, side: BlockSide) -> Option<ColumnCoordinate> {
        let offset = side.offset();
        if offset.y != 0 {
            return None;
        }
        Some(ColumnCoordinate::new(self.x + offset.x, self.z + offset.z))
    }

    /// Every column within `radius` of `self`, row by row.
    pub fn within(self, radius: i32) -> impl Iterator<Item = ColumnCoordinate> {
        (-radius..=radius)
            .flat_map(move |dx| (-radius..=radius).map(move |dz| ColumnCoordinate::new(self.x + dx, self.z + dz)))
    }
}
