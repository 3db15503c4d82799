//! # Mesh Buffers
//!
//! Plain vertex/index data for one chunk, built fresh on every pass and
//! handed to the host renderer.

use bytemuck::{Pod, Zeroable};

/// Default material of the opaque sub-mesh.
pub const OPAQUE_MATERIAL: &str = "VoxelMat";

/// Default material of the water sub-mesh.
pub const WATER_MATERIAL: &str = "WaterVoxelMat";

// =============================================================================
// VERTEX FORMAT
// =============================================================================

/// Interleaved vertex for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ChunkVertex {
    /// Chunk-local position [x, y, z].
    pub position: [f32; 3],
    /// Atlas UV [u, v].
    pub uv: [f32; 2],
}

// =============================================================================
// MESH OUTPUT
// =============================================================================

/// One sub-mesh: positions, UVs and triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex UVs, parallel to `positions`.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, six indices per quad.
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Appends one quad as two triangles `(0, 1, 2)` and `(0, 2, 3)`.
    pub fn push_face(&mut self, corners: [[f32; 3]; 4], uvs: [[f32; 2]; 4]) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&corners);
        self.uvs.extend_from_slice(&uvs);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of quads.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if no face was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Checks that UVs match positions and every index is in range.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let count = self.positions.len();
        self.uvs.len() == count
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < count)
    }

    /// Interleaves positions and UVs for upload.
    #[must_use]
    pub fn vertices(&self) -> Vec<ChunkVertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .map(|(&position, &uv)| ChunkVertex { position, uv })
            .collect()
    }

    /// Removes all data, keeping allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
    }
}

/// Complete mesh of a chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Opaque and non-solid voxels other than water.
    pub opaque: MeshBuffer,
    /// Water surfaces.
    pub water: MeshBuffer,
}

impl MeshData {
    /// Total quads in both sub-meshes.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.opaque.face_count() + self.water.face_count()
    }

    /// True if neither sub-mesh has a face.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.water.is_empty()
    }

    /// True if both sub-meshes are internally consistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.opaque.is_consistent() && self.water.is_consistent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: [[f32; 3]; 4] = [[0.0; 3], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
    const UVS: [[f32; 2]; 4] = [[0.0; 2], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    #[test]
    fn test_push_face_offsets_indices() {
        let mut buffer = MeshBuffer::default();
        buffer.push_face(QUAD, UVS);
        buffer.push_face(QUAD, UVS);

        assert_eq!(buffer.face_count(), 2);
        assert_eq!(buffer.vertex_count(), 8);
        assert_eq!(buffer.triangle_count(), 4);
        assert_eq!(&buffer.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(buffer.is_consistent());
    }

    #[test]
    fn test_detects_dangling_index() {
        let mut buffer = MeshBuffer::default();
        buffer.push_face(QUAD, UVS);
        buffer.indices.extend_from_slice(&[0, 1, 4]);
        assert!(!buffer.is_consistent());
    }

    #[test]
    fn test_interleaved_vertices_are_pod() {
        let mut buffer = MeshBuffer::default();
        buffer.push_face(QUAD, UVS);

        let vertices = buffer.vertices();
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 4 * std::mem::size_of::<ChunkVertex>());
        assert_eq!(std::mem::size_of::<ChunkVertex>(), 20);
        assert_eq!(vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_mesh_data_totals() {
        let mut mesh = MeshData::default();
        assert!(mesh.is_empty());

        mesh.water.push_face(QUAD, UVS);
        assert_eq!(mesh.face_count(), 1);
        assert!(!mesh.is_empty());

        mesh.water.clear();
        assert!(mesh.is_empty());
    }
}
