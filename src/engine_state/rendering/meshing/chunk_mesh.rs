//! Face-culling mesh builder for a single chunk.
//!
//! Every visible block contributes one face per side whose adjacent cell is not
//! visible. Adjacent cells across a chunk boundary are resolved through the
//! `Neighbourhood`; a boundary with no loaded neighbour is always exposed.

use crate::engine_state::{
    rendering::Vertex,
    voxels::{
        block::block_side::BlockSide,
        chunk::{block_grid::BlockGrid, neighbourhood::Neighbourhood, CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z},
    },
};

use super::face::{Face, VERTICES_PER_FACE};

/// The finished vertex data of one chunk, in chunk-local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    vertices: Vec<Vertex>,
}

impl ChunkMesh {
    /// Builds the culled mesh of `grid` against its neighbours.
    pub fn build(grid: &BlockGrid, neighbours: &Neighbourhood<'_>) -> Self {
        let mut vertices = Vec::with_capacity(estimate_face_count(grid) * VERTICES_PER_FACE);

        for_each_visible_cell(grid, |x, y, z| {
            let properties = grid.get(x, y, z).properties();
            for side in BlockSide::all() {
                if is_exposed(grid, neighbours, [x, y, z], side) {
                    Face::new([x, y, z], side, properties.texture(side)).push_vertices(&mut vertices);
                }
            }
        });

        ChunkMesh { vertices }
    }

    /// Vertices in emission order, six per face.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Upper bound on the faces `ChunkMesh::build` will emit for `grid`.
///
/// Treats every chunk boundary as exposed, so the result never falls below the
/// exact count whatever the neighbourhood. Only used to size the vertex buffer.
pub fn estimate_face_count(grid: &BlockGrid) -> usize {
    let mut count = 0;
    for_each_visible_cell(grid, |x, y, z| {
        count += BlockSide::all()
            .into_iter()
            .filter(|&side| is_exposed(grid, &Neighbourhood::isolated(), [x, y, z], side))
            .count();
    });
    count
}

fn for_each_visible_cell(grid: &BlockGrid, mut f: impl FnMut(usize, usize, usize)) {
    for x in 0..CHUNK_SIZE_X {
        for y in 0..CHUNK_SIZE_Y {
            for z in 0..CHUNK_SIZE_Z {
                if grid.is_visible(x, y, z) {
                    f(x, y, z);
                }
            }
        }
    }
}

/// Whether the face of `cell` on `side` borders a non-visible cell.
fn is_exposed(grid: &BlockGrid, neighbours: &Neighbourhood<'_>, cell: [usize; 3], side: BlockSide) -> bool {
    let offset = side.offset();
    let adjacent = [
        cell[0] as i32 + offset.x,
        cell[1] as i32 + offset.y,
        cell[2] as i32 + offset.z,
    ];
    let extents = [CHUNK_SIZE_X as i32, CHUNK_SIZE_Y as i32, CHUNK_SIZE_Z as i32];

    let inside = adjacent.iter().zip(extents).all(|(&c, extent)| (0..extent).contains(&c));
    if inside {
        return !grid.is_visible(adjacent[0] as usize, adjacent[1] as usize, adjacent[2] as usize);
    }

    match neighbours.get(side) {
        Some(neighbour) => {
            let [x, y, z] = [0, 1, 2].map(|axis| adjacent[axis].rem_euclid(extents[axis]) as usize);
            !neighbour.is_visible(x, y, z)
        }
        None => true,
    }
}
