//! Host Bridge - The world's only view of an entity/mesh runtime
//!
//! The streamer never renders. It creates one named entity per rendered
//! chunk, uploads mesh data and hands handles back to the host. Anything
//! able to hold entities and meshes (an engine scene, a test double) can
//! implement these traits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let host = HeadlessHost::new();
//! let mut streamer = WorldStreamer::new(&config, host)?;
//! streamer.recompute_around([0.0, 60.0, 0.0])?;
//! assert_eq!(streamer.host().entity_count(), streamer.proxy_count());
//! ```

use std::collections::HashMap;

use strata_core::ChunkCoord;
use strata_meshing::ChunkVertex;

/// One material's worth of mesh data.
#[derive(Clone, Copy, Debug)]
pub struct SubMesh<'a> {
    /// Interleaved vertices.
    pub vertices: &'a [ChunkVertex],
    /// Triangle list into `vertices`.
    pub indices: &'a [u32],
    /// Host material name.
    pub material: &'a str,
}

/// Scene entities.
pub trait EntityHost {
    /// Entity handle.
    type Entity;

    /// Creates a named entity at `translation`.
    fn create_entity(&mut self, name: &str, translation: [f32; 3]) -> Self::Entity;

    /// Destroys an entity.
    fn destroy_entity(&mut self, entity: Self::Entity);

    /// Moves an entity.
    fn set_translation(&mut self, entity: &Self::Entity, translation: [f32; 3]);

    /// Current translation, if the entity is alive.
    fn translation(&self, entity: &Self::Entity) -> Option<[f32; 3]>;
}

/// Mesh resources.
pub trait MeshHost {
    /// Mesh handle.
    type Mesh;

    /// Uploads a new mesh with one sub-mesh per entry.
    fn upload_mesh(&mut self, submeshes: &[SubMesh<'_>]) -> Self::Mesh;

    /// Replaces the contents of an existing mesh.
    fn replace_mesh(&mut self, mesh: &Self::Mesh, submeshes: &[SubMesh<'_>]);

    /// Frees a mesh.
    fn release_mesh(&mut self, mesh: Self::Mesh);
}

/// Entities that can display meshes.
pub trait RenderHost: EntityHost + MeshHost {
    /// Makes `entity` draw `mesh`.
    fn attach_mesh(&mut self, entity: &Self::Entity, mesh: &Self::Mesh);
}

/// Host-side objects of one rendered chunk.
#[derive(Debug)]
pub struct ChunkRenderProxy<E, M> {
    /// Chunk this proxy draws.
    pub coord: ChunkCoord,
    /// Entity placed at the chunk origin.
    pub entity: E,
    /// Mesh attached to `entity`.
    pub mesh: M,
}

/// Entity name of a chunk proxy.
#[must_use]
pub fn chunk_entity_name(coord: ChunkCoord) -> String {
    format!("chunk_{}_{}_{}", coord.x, coord.y, coord.z)
}

// =============================================================================
// HEADLESS HOST
// =============================================================================

/// Entity handle of [`HeadlessHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Mesh handle of [`HeadlessHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// A live entity in [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessEntity {
    /// Entity name.
    pub name: String,
    /// World translation.
    pub translation: [f32; 3],
    /// Attached mesh.
    pub mesh: Option<MeshId>,
}

/// Stored sub-mesh sizes of a mesh in [`HeadlessHost`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadlessMesh {
    /// `(material, vertex count, index count)` per sub-mesh.
    pub submeshes: Vec<(String, usize, usize)>,
}

impl HeadlessMesh {
    fn from_submeshes(submeshes: &[SubMesh<'_>]) -> Self {
        Self {
            submeshes: submeshes
                .iter()
                .map(|s| (s.material.to_string(), s.vertices.len(), s.indices.len()))
                .collect(),
        }
    }

    /// Total triangles over all sub-meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|(_, _, indices)| indices / 3).sum()
    }
}

/// In-memory host for tools and tests.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_id: u64,
    entities: HashMap<EntityId, HeadlessEntity>,
    meshes: HashMap<MeshId, HeadlessMesh>,
    uploads: u64,
    replacements: u64,
}

impl HeadlessHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Meshes uploaded so far.
    #[must_use]
    pub const fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Mesh replacements so far.
    #[must_use]
    pub const fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&HeadlessEntity> {
        self.entities.get(&id)
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn entity_named(&self, name: &str) -> Option<&HeadlessEntity> {
        self.entities.values().find(|e| e.name == name)
    }

    /// Looks up a mesh.
    #[must_use]
    pub fn mesh(&self, id: MeshId) -> Option<&HeadlessMesh> {
        self.meshes.get(&id)
    }

    /// Triangles over all live meshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.values().map(HeadlessMesh::triangle_count).sum()
    }
}

impl EntityHost for HeadlessHost {
    type Entity = EntityId;

    fn create_entity(&mut self, name: &str, translation: [f32; 3]) -> EntityId {
        let id = EntityId(self.next());
        self.entities.insert(
            id,
            HeadlessEntity {
                name: name.to_string(),
                translation,
                mesh: None,
            },
        );
        id
    }

    fn destroy_entity(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }

    fn set_translation(&mut self, entity: &EntityId, translation: [f32; 3]) {
        if let Some(e) = self.entities.get_mut(entity) {
            e.translation = translation;
        }
    }

    fn translation(&self, entity: &EntityId) -> Option<[f32; 3]> {
        self.entities.get(entity).map(|e| e.translation)
    }
}

impl MeshHost for HeadlessHost {
    type Mesh = MeshId;

    fn upload_mesh(&mut self, submeshes: &[SubMesh<'_>]) -> MeshId {
        let id = MeshId(self.next());
        self.meshes.insert(id, HeadlessMesh::from_submeshes(submeshes));
        self.uploads += 1;
        id
    }

    fn replace_mesh(&mut self, mesh: &MeshId, submeshes: &[SubMesh<'_>]) {
        if let Some(m) = self.meshes.get_mut(mesh) {
            *m = HeadlessMesh::from_submeshes(submeshes);
            self.replacements += 1;
        }
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }
}

impl RenderHost for HeadlessHost {
    fn attach_mesh(&mut self, entity: &EntityId, mesh: &MeshId) {
        if let Some(e) = self.entities.get_mut(entity) {
            e.mesh = Some(*mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: [ChunkVertex; 3] = [ChunkVertex {
        position: [0.0; 3],
        uv: [0.0; 2],
    }; 3];

    #[test]
    fn test_entity_lifecycle() {
        let mut host = HeadlessHost::new();
        let entity = host.create_entity("chunk_0_0_0", [0.0, 0.0, 16.0]);
        assert_eq!(host.translation(&entity), Some([0.0, 0.0, 16.0]));

        host.set_translation(&entity, [1.0, 2.0, 3.0]);
        assert_eq!(host.entity_named("chunk_0_0_0").map(|e| e.translation), Some([1.0, 2.0, 3.0]));

        host.destroy_entity(entity);
        assert_eq!(host.entity_count(), 0);
        assert_eq!(host.translation(&entity), None);
    }

    #[test]
    fn test_mesh_upload_and_replace() {
        let mut host = HeadlessHost::new();
        let sub = SubMesh {
            vertices: &TRI,
            indices: &[0, 1, 2],
            material: "VoxelMat",
        };
        let mesh = host.upload_mesh(&[sub]);
        assert_eq!(host.mesh(mesh).map(HeadlessMesh::triangle_count), Some(1));

        host.replace_mesh(&mesh, &[sub, sub]);
        assert_eq!(host.triangle_count(), 2);
        assert_eq!(host.uploads(), 1);
        assert_eq!(host.replacements(), 1);

        host.release_mesh(mesh);
        assert_eq!(host.mesh_count(), 0);
    }

    #[test]
    fn test_attach_records_mesh() {
        let mut host = HeadlessHost::new();
        let entity = host.create_entity("e", [0.0; 3]);
        let mesh = host.upload_mesh(&[]);
        host.attach_mesh(&entity, &mesh);
        assert_eq!(host.entity(entity).and_then(|e| e.mesh), Some(mesh));
        assert_ne!(entity.0, mesh.0, "handles share one id sequence");
    }

    #[test]
    fn test_entity_names_carry_coordinates() {
        assert_eq!(chunk_entity_name(ChunkCoord::new(-2, 0, 7)), "chunk_-2_0_7");
    }
}
