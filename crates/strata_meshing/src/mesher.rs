//! # Chunk Mesher
//!
//! Full-grid face culling.
//!
//! For every non-empty voxel, each of the six neighbours is looked up
//! (inside the chunk directly, across the boundary through the caller's
//! `VoxelSource`) and a quad is emitted when the neighbour exposes it:
//!
//! | voxel     | face emitted when neighbour is | sub-mesh |
//! |-----------|--------------------------------|----------|
//! | water     | `Air`                          | water    |
//! | any other | not solid (`Nothing` included) | opaque   |

use std::sync::Arc;

use strata_core::{Chunk, Direction, VoxelCatalog, VoxelSource, VoxelType};

use crate::face::face_corners;
use crate::mesh::{MeshBuffer, MeshData};

/// Builds chunk meshes against a shared catalog.
#[derive(Clone, Debug)]
pub struct ChunkMesher {
    catalog: Arc<VoxelCatalog>,
}

impl Default for ChunkMesher {
    fn default() -> Self {
        Self::new(Arc::new(VoxelCatalog::default()))
    }
}

impl ChunkMesher {
    /// Creates a mesher.
    #[must_use]
    pub fn new(catalog: Arc<VoxelCatalog>) -> Self {
        Self { catalog }
    }

    /// Catalog used for solidity and UVs.
    #[must_use]
    pub fn catalog(&self) -> &VoxelCatalog {
        &self.catalog
    }

    /// Meshes `chunk`, resolving out-of-chunk neighbours through `source`.
    #[must_use]
    pub fn build<S: VoxelSource + ?Sized>(&self, chunk: &Chunk, source: &S) -> MeshData {
        let mut mesh = MeshData::default();

        for (index, &voxel) in chunk.voxels().iter().enumerate() {
            if voxel.is_empty() {
                continue;
            }
            let [x, y, z] = chunk.position_from_index(index);
            let water = self.catalog.is_water(voxel);

            for direction in Direction::ALL {
                let neighbour = neighbour(chunk, source, [x, y, z], direction);

                if water {
                    if neighbour == VoxelType::Air {
                        self.emit(&mut mesh.water, voxel, [x, y, z], direction);
                    }
                } else if !self.catalog.is_solid(neighbour) {
                    self.emit(&mut mesh.opaque, voxel, [x, y, z], direction);
                }
            }
        }

        debug_assert!(mesh.is_consistent(), "mesh index out of range for chunk {:?}", chunk.coord());
        mesh
    }

    fn emit(&self, buffer: &mut MeshBuffer, voxel: VoxelType, [x, y, z]: [usize; 3], direction: Direction) {
        buffer.push_face(
            face_corners(x, y, z, direction),
            self.catalog.face_uvs(voxel, direction),
        );
    }
}

/// Voxel adjacent to local `pos` on `direction`, crossing chunk borders.
fn neighbour<S: VoxelSource + ?Sized>(chunk: &Chunk, source: &S, pos: [usize; 3], direction: Direction) -> VoxelType {
    let [dx, dy, dz] = direction.offset();
    let (nx, ny, nz) = (pos[0] as i32 + dx, pos[1] as i32 + dy, pos[2] as i32 + dz);

    chunk.get_local(nx, ny, nz).unwrap_or_else(|| {
        let [wx, wy, wz] = chunk.local_to_world(pos[0], pos[1], pos[2]);
        source.voxel_at([wx + dx, wy + dy, wz + dz])
    })
}
