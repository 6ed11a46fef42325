//! Face-culling checks against a brute-force count over randomized terrain.

use cgmath::Point3;
use voxel_world::{Block, BlockGrid, BlockSide, BlockType, Chunk, ChunkMesh, ChunkStatus, Neighbourhood};

const SOLID_TYPES: [BlockType; 5] = [
    BlockType::GRASS,
    BlockType::DIRT,
    BlockType::ROCK,
    BlockType::SAND,
    BlockType::WATER,
];

/// Fills the lowest `height` layers at random, so boundaries see plenty of mixed cells.
fn random_grid(rng: &mut fastrand::Rng, origin: Point3<i32>, height: usize, density: f32) -> BlockGrid {
    let mut grid = BlockGrid::new(origin);
    for x in 0..16 {
        for y in 0..height {
            for z in 0..16 {
                if rng.f32() < density {
                    let block_type = SOLID_TYPES[rng.usize(..SOLID_TYPES.len())];
                    grid.set(x, y, z, Block::new(block_type));
                }
            }
        }
    }
    grid
}

/// Looks up visibility at a world coordinate across a set of grids; `None` if no
/// grid covers it.
fn visible_at(grids: &[&BlockGrid], world: Point3<i32>) -> Option<bool> {
    grids.iter().find_map(|grid| {
        let origin = grid.origin();
        let local = [world.x - origin.x, world.y - origin.y, world.z - origin.z];
        let inside = (0..16).contains(&local[0]) && (0..256).contains(&local[1]) && (0..16).contains(&local[2]);
        inside.then(|| grid.is_visible(local[0] as usize, local[1] as usize, local[2] as usize))
    })
}

fn brute_force_faces(grid: &BlockGrid, neighbours: &[&BlockGrid]) -> usize {
    let mut all = vec![grid];
    all.extend_from_slice(neighbours);
    let origin = grid.origin();

    let mut faces = 0;
    for x in 0..16 {
        for y in 0..256 {
            for z in 0..16 {
                if !grid.is_visible(x, y, z) {
                    continue;
                }
                for side in BlockSide::all() {
                    let offset = side.offset();
                    let adjacent = Point3::new(
                        origin.x + x as i32 + offset.x,
                        origin.y + y as i32 + offset.y,
                        origin.z + z as i32 + offset.z,
                    );
                    if !visible_at(&all, adjacent).unwrap_or(false) {
                        faces += 1;
                    }
                }
            }
        }
    }
    faces
}

#[test]
fn random_grids_match_brute_force_with_and_without_neighbours() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);

    for round in 0..6 {
        let density = 0.2 + 0.12 * round as f32;
        let centre = random_grid(&mut rng, Point3::new(32, 0, -16), 12, density);
        let left = random_grid(&mut rng, Point3::new(16, 0, -16), 12, density);
        let right = random_grid(&mut rng, Point3::new(48, 0, -16), 12, density);
        let front = random_grid(&mut rng, Point3::new(32, 0, 0), 12, density);
        let back = random_grid(&mut rng, Point3::new(32, 0, -32), 12, density);

        // Drop a different subset of neighbours each round.
        let keep = |bit: usize| (round >> bit) & 1 == 0;
        let left = keep(0).then_some(&left);
        let right = keep(1).then_some(&right);
        let front = keep(2).then_some(&front);
        let back = (round % 3 != 0).then_some(&back);

        let neighbourhood = Neighbourhood::planar(left, right, front, back);
        let present: Vec<&BlockGrid> = [left, right, front, back].into_iter().flatten().collect();

        let mesh = ChunkMesh::build(&centre, &neighbourhood);
        assert_eq!(mesh.face_count(), brute_force_faces(&centre, &present), "round {round}");
        assert!(voxel_world::engine_state::rendering::meshing::estimate_face_count(&centre) >= mesh.face_count());
    }
}

#[test]
fn absent_neighbour_exposes_the_whole_boundary() {
    let full = BlockGrid::filled(Point3::new(0, 0, 0), BlockType::ROCK);

    let isolated = ChunkMesh::build(&full, &Neighbourhood::isolated());
    // Every outer face of a 16x256x16 box.
    assert_eq!(isolated.face_count(), 2 * (16 * 16) + 4 * (16 * 256));

    let left = BlockGrid::filled(Point3::new(-16, 0, 0), BlockType::DIRT);
    let right = BlockGrid::new(Point3::new(16, 0, 0));
    let mesh = ChunkMesh::build(&full, &Neighbourhood::planar(Some(&left), Some(&right), None, None));
    // The solid left neighbour hides that side; the air right neighbour hides nothing.
    assert_eq!(mesh.face_count(), 2 * (16 * 16) + 3 * (16 * 256));
}

#[test]
fn vertices_carry_catalog_textures_and_stay_in_the_chunk() {
    let mut rng = fastrand::Rng::with_seed(42);
    let grid = random_grid(&mut rng, Point3::new(0, 0, 0), 40, 0.5);
    let mesh = ChunkMesh::build(&grid, &Neighbourhood::isolated());
    assert!(!mesh.is_empty());

    for face in mesh.vertices().chunks(6) {
        let side = BlockSide::all()
            .into_iter()
            .find(|side| side.normal() == face[0].normal)
            .unwrap();
        // The owning cell is the minimum corner of the face pulled back along the normal.
        let min = |axis: usize| face.iter().map(|v| v.position[axis]).fold(f32::MAX, f32::min);
        let normal = side.normal();
        let cell = [0, 1, 2].map(|axis| (min(axis) - normal[axis].max(0.0)) as usize);
        let block = grid.get(cell[0], cell[1], cell[2]);

        assert!(block.properties().visible);
        for vertex in face {
            assert_eq!(vertex.texture_index, block.properties().texture(side));
            assert!(vertex.position.iter().zip([16.0, 256.0, 16.0]).all(|(&p, max)| (0.0..=max).contains(&p)));
        }
    }
}

#[test]
fn chunk_meshes_against_its_neighbourhood() {
    struct Column;

    impl voxel_world::ChunkGenerator for Column {
        fn generate(&self, origin: Point3<i32>) -> BlockGrid {
            let mut grid = BlockGrid::new(origin);
            grid.set(15, 5, 8, Block::new(BlockType::SAND));
            grid
        }
    }

    let mut right = BlockGrid::new(Point3::new(16, 0, 0));
    right.set(0, 5, 8, Block::new(BlockType::ROCK));

    let mut chunk: Chunk<()> = Chunk::new();
    chunk.set_position(Point3::new(0, 0, 0));
    chunk.generate_blocks(&Column);
    chunk.generate_mesh(&Neighbourhood::planar(None, Some(&right), None, None));

    assert_eq!(chunk.status(), ChunkStatus::MeshGenerated);
    assert_eq!(chunk.face_count(), 5);
}
