//! # Terrain Generation
//!
//! Deterministic heightmap terrain. Each block column `(x, z)` gets two heights
//! from layered noise:
//!
//! - `top_soil`: grass surface, a broad base height with three octaves of detail
//! - `rock`: where stone starts, roughly fourteen blocks below the surface
//!
//! Every cell is then classified by its world height against those two values
//! and the global water level. The generator has no failure mode and no state
//! beyond its seed, so one instance is shared by all worker threads.

use cgmath::Point3;

use super::{
    block::{block_type::BlockType, Block},
    chunk::{block_grid::BlockGrid, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z},
};

mod noise_source;

pub use noise_source::NoiseSource;

/// Default water surface height in blocks.
pub const DEFAULT_WATER_LEVEL: i32 = 219;

/// Horizontal scale of one noise unit, in blocks.
const NOISE_SCALE: f64 = 16.0;
const SOIL_BASE_HEIGHT: f64 = 200.0;
const SOIL_DEPTH: f64 = 14.0;

/// Produces the block grid of a chunk from its world origin.
///
/// Implementations must be pure: the same origin always yields the same grid.
pub trait ChunkGenerator: Send + Sync {
    fn generate(&self, origin: Point3<i32>) -> BlockGrid;
}

/// Surface heights of one block column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHeights {
    pub top_soil: i32,
    pub rock: i32,
}

/// The noise-driven terrain generator.
#[derive(Clone, Copy, Debug)]
pub struct TerrainGenerator {
    noise: NoiseSource,
    water_level: i32,
}

impl TerrainGenerator {
    pub fn new(seed: u32, water_level: i32) -> Self {
        TerrainGenerator {
            noise: NoiseSource::new(seed),
            water_level,
        }
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Soil and rock heights at a world block column.
    pub fn heights(&self, world_x: i32, world_z: i32) -> ColumnHeights {
        let u = world_x as f64 / NOISE_SCALE;
        let v = world_z as f64 / NOISE_SCALE;
        let n = |x: f64, z: f64, layer: f64| self.noise.sample(x, z, layer);

        let top_soil = (SOIL_BASE_HEIGHT
            + 4.0 * n(u, v, 1.0)
            + 16.0 * n(u / 4.0, v / 4.0, 1.0)
            + 32.0 * n(u / 8.0, v / 8.0, 1.0)) as i32;

        let rock_noise = n(u, v, 2.0);
        let rock = (top_soil as f64 - SOIL_DEPTH + 2.0 * rock_noise + (18.0 * rock_noise).max(0.0)) as i32;

        ColumnHeights { top_soil, rock }
    }
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, origin: Point3<i32>) -> BlockGrid {
        let mut grid = BlockGrid::new(origin);
        for x in 0..CHUNK_SIZE_X {
            for z in 0..CHUNK_SIZE_Z {
                let heights = self.heights(origin.x + x as i32, origin.z + z as i32);
                for y in 0..CHUNK_SIZE_Y {
                    let block_type = classify(origin.y + y as i32, heights, self.water_level);
                    if block_type != BlockType::AIR {
                        grid.set(x, y, z, Block::new(block_type));
                    }
                }
            }
        }
        grid
    }
}

/// Block type at world height `y` of a column, first match wins:
/// rock at or below `rock`, grass at `top_soil`, dirt below it, water below
/// `water_level`, air above everything.
pub fn classify(y: i32, heights: ColumnHeights, water_level: i32) -> BlockType {
    if y <= heights.rock {
        BlockType::ROCK
    } else if y == heights.top_soil {
        BlockType::GRASS
    } else if y < heights.top_soil {
        BlockType::DIRT
    } else if y < water_level {
        BlockType::WATER
    } else {
        BlockType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_precedence() {
        let heights = ColumnHeights { top_soil: 210, rock: 196 };
        assert_eq!(classify(0, heights, 219), BlockType::ROCK);
        assert_eq!(classify(196, heights, 219), BlockType::ROCK);
        assert_eq!(classify(197, heights, 219), BlockType::DIRT);
        assert_eq!(classify(210, heights, 219), BlockType::GRASS);
        assert_eq!(classify(211, heights, 219), BlockType::WATER);
        assert_eq!(classify(218, heights, 219), BlockType::WATER);
        assert_eq!(classify(219, heights, 219), BlockType::AIR);
    }

    #[test]
    fn rock_wins_over_grass_when_they_meet() {
        let heights = ColumnHeights { top_soil: 205, rock: 205 };
        assert_eq!(classify(205, heights, 219), BlockType::ROCK);
    }

    #[test]
    fn heights_stay_in_their_bands() {
        let generator = TerrainGenerator::new(1234, DEFAULT_WATER_LEVEL);
        for x in (-300..300).step_by(37) {
            for z in (-300..300).step_by(41) {
                let heights = generator.heights(x, z);
                assert!((200..=252).contains(&heights.top_soil), "{heights:?}");
                assert!(heights.rock >= heights.top_soil - 14, "{heights:?}");
                assert!(heights.rock <= heights.top_soil + 6, "{heights:?}");
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let origin = Point3::new(-48, 0, 32);
        let a = TerrainGenerator::new(99, DEFAULT_WATER_LEVEL).generate(origin);
        let b = TerrainGenerator::new(99, DEFAULT_WATER_LEVEL).generate(origin);
        assert_eq!(a, b);
        assert_eq!(a.origin(), origin);
    }

    #[test]
    fn generated_columns_match_classification() {
        let generator = TerrainGenerator::new(5, DEFAULT_WATER_LEVEL);
        let origin = Point3::new(16, 0, -16);
        let grid = generator.generate(origin);
        for (x, z) in [(0, 0), (7, 3), (15, 15)] {
            let heights = generator.heights(origin.x + x as i32, origin.z + z as i32);
            for y in 0..CHUNK_SIZE_Y {
                assert_eq!(
                    grid.get(x, y, z).block_type(),
                    classify(y as i32, heights, DEFAULT_WATER_LEVEL)
                );
            }
            assert_eq!(grid.get(x, 0, z).block_type(), BlockType::ROCK);
            assert_eq!(grid.get(x, CHUNK_SIZE_Y - 1, z).block_type(), BlockType::AIR);
        }
    }
}
