use crate::engine_state::{rendering::Vertex, voxels::block::block_side::BlockSide};

/// Number of vertices emitted per block face: two triangles, no index buffer.
pub const VERTICES_PER_FACE: usize = 6;

/// A corner of a unit-cube face template: position and texture coordinate.
type TemplateCorner = ([f32; 3], [f32; 2]);

/// Unit-cube face templates, indexed by `BlockSide as usize`.
///
/// Each face is two counter-clockwise triangles when viewed from outside the cube.
const FACE_TEMPLATES: [[TemplateCorner; VERTICES_PER_FACE]; 6] = [
    // FRONT (+Z)
    [
        ([0.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 1.0, 1.0], [1.0, 1.0]),
        ([0.0, 1.0, 1.0], [0.0, 1.0]),
        ([0.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 0.0, 1.0], [1.0, 0.0]),
        ([1.0, 1.0, 1.0], [1.0, 1.0]),
    ],
    // BACK (-Z)
    [
        ([1.0, 0.0, 0.0], [0.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 1.0]),
        ([1.0, 1.0, 0.0], [0.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0]),
        ([0.0, 0.0, 0.0], [1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 1.0]),
    ],
    // LEFT (-X)
    [
        ([0.0, 0.0, 0.0], [0.0, 0.0]),
        ([0.0, 1.0, 1.0], [1.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 1.0]),
        ([0.0, 0.0, 0.0], [0.0, 0.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0]),
        ([0.0, 1.0, 1.0], [1.0, 1.0]),
    ],
    // RIGHT (+X)
    [
        ([1.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
        ([1.0, 1.0, 1.0], [0.0, 1.0]),
        ([1.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 0.0, 0.0], [1.0, 0.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
    ],
    // TOP (+Y)
    [
        ([0.0, 1.0, 1.0], [0.0, 0.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 1.0]),
        ([0.0, 1.0, 1.0], [0.0, 0.0]),
        ([1.0, 1.0, 1.0], [1.0, 0.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
    ],
    // BOTTOM (-Y)
    [
        ([1.0, 0.0, 1.0], [0.0, 0.0]),
        ([0.0, 0.0, 0.0], [1.0, 1.0]),
        ([1.0, 0.0, 0.0], [0.0, 1.0]),
        ([1.0, 0.0, 1.0], [0.0, 0.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0]),
        ([0.0, 0.0, 0.0], [1.0, 1.0]),
    ],
];

/// A single visible block face, before it is expanded into vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Chunk-local cell of the block owning this face
    pub cell: [usize; 3],
    /// Which side of the block this face represents
    pub block_side: BlockSide,
    /// Texture array layer for this face
    pub texture_index: u32,
}

impl Face {
    /// Creates a new face for the block at the given chunk-local cell.
    pub fn new(cell: [usize; 3], block_side: BlockSide, texture_index: u32) -> Self {
        Face {
            cell,
            block_side,
            texture_index,
        }
    }

    /// Appends this face's two triangles to `vertices`, translating the unit-cube
    /// template into the owning cell and tagging each vertex with the texture layer.
    pub fn push_vertices(&self, vertices: &mut Vec<Vertex>) {
        let normal = self.block_side.normal();
        let [x, y, z] = self.cell.map(|c| c as f32);
        vertices.extend(
            FACE_TEMPLATES[self.block_side as usize]
                .iter()
                .map(|&([px, py, pz], tex_coords)| {
                    Vertex::new([px + x, py + y, pz + z], normal, tex_coords, self.texture_index)
                }),
        );
    }
}
