//! # World Streamer
//!
//! Owns the chunks and render proxies around a moving reference point.
//!
//! One pass of [`WorldStreamer::recompute_around`]:
//!
//! 1. Destroy proxies outside the render ring (radius `R`).
//! 2. Evict unmodified chunks outside the data ring (radius `R + 1`),
//!    together with any proxy they still own.
//! 3. Generate missing chunks of the data ring in parallel, then insert
//!    them nearest first. Existing proxies that share a face with a new
//!    chunk are rebuilt, since their boundary was meshed against nothing.
//! 4. Mesh missing proxies of the render ring in parallel against the
//!    complete data ring, then publish them to the host nearest first.
//!
//! Every parallel build is joined before its results are inserted or
//! published, so a pass only ever hands the host results it requested.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use strata_core::{Chunk, ChunkCoord, ChunkDims, StrataError, StrataResult, VoxelSource, VoxelType};
use strata_meshing::{ChunkMesher, ChunkVertex, MeshData};
use strata_procedural::TerrainGenerator;

use crate::config::WorldConfig;
use crate::host::{chunk_entity_name, ChunkRenderProxy, RenderHost, SubMesh};
use crate::store::VoxelWorld;
use crate::streaming::{
    center_chunk, remesh_targets, ring, ring_in_range, select_data_to_create, select_render_to_create,
    select_unneeded_data, select_unneeded_render, stale_neighbours,
};

/// Outcome of one streaming pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunk containing the reference position.
    pub center: ChunkCoord,
    /// Chunks generated.
    pub data_created: usize,
    /// Chunks evicted.
    pub data_evicted: usize,
    /// Proxies published.
    pub render_created: usize,
    /// Proxies destroyed.
    pub render_destroyed: usize,
    /// Existing proxies rebuilt against newly loaded neighbours.
    pub render_refreshed: usize,
    /// Modified chunks kept outside the data ring.
    pub retained_modified: usize,
}

/// Outcome of a voxel edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditReport {
    /// Edited chunk.
    pub coord: ChunkCoord,
    /// Local position inside `coord`.
    pub local: [usize; 3],
    /// Proxies rebuilt, the edited chunk last when it is rendered.
    pub remeshed: Vec<ChunkCoord>,
}

/// Cumulative counters over the streamer's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Streaming passes run.
    pub passes: u64,
    /// Chunks generated.
    pub chunks_generated: u64,
    /// Chunks evicted.
    pub chunks_evicted: u64,
    /// Meshes built for new proxies.
    pub meshes_built: u64,
    /// Meshes rebuilt for existing proxies.
    pub meshes_rebuilt: u64,
    /// Proxies destroyed.
    pub proxies_destroyed: u64,
    /// Edits applied.
    pub edits: u64,
}

/// A finished mesh with interleaved vertex buffers, ready for upload.
struct BuiltMesh {
    coord: ChunkCoord,
    mesh: MeshData,
    opaque: Vec<ChunkVertex>,
    water: Vec<ChunkVertex>,
}

impl BuiltMesh {
    fn new(coord: ChunkCoord, mesh: MeshData) -> Self {
        Self {
            coord,
            opaque: mesh.opaque.vertices(),
            water: mesh.water.vertices(),
            mesh,
        }
    }

    /// Opaque then water; both slots are always present.
    fn submeshes<'a>(&'a self, opaque_material: &'a str, water_material: &'a str) -> [SubMesh<'a>; 2] {
        [
            SubMesh {
                vertices: &self.opaque,
                indices: &self.mesh.opaque.indices,
                material: opaque_material,
            },
            SubMesh {
                vertices: &self.water,
                indices: &self.mesh.water.indices,
                material: water_material,
            },
        ]
    }
}

/// Streams chunk data and render proxies around a reference position.
pub struct WorldStreamer<H: RenderHost> {
    dims: ChunkDims,
    render_distance: u32,
    map_size: u32,
    seed_offset: [f64; 2],
    opaque_material: String,
    water_material: String,
    generator: TerrainGenerator,
    mesher: ChunkMesher,
    world: VoxelWorld,
    proxies: HashMap<ChunkCoord, ChunkRenderProxy<H::Entity, H::Mesh>>,
    host: H,
    center: Option<ChunkCoord>,
    stats: WorldStats,
}

impl<H: RenderHost> WorldStreamer<H> {
    /// Creates an empty streamer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: &WorldConfig, host: H) -> StrataResult<Self> {
        config.validate()?;
        let dims = config.dims();

        Ok(Self {
            dims,
            render_distance: config.world.render_distance,
            map_size: config.world.map_size_in_chunks,
            seed_offset: config.world.seed_offset,
            opaque_material: config.render.opaque_material.clone(),
            water_material: config.render.water_material.clone(),
            generator: config.build_generator()?,
            mesher: ChunkMesher::new(Arc::new(config.build_catalog()?)),
            world: VoxelWorld::new(dims),
            proxies: HashMap::new(),
            host,
            center: None,
            stats: WorldStats::default(),
        })
    }

    // =========================================================================
    // STREAMING
    // =========================================================================

    /// Runs one streaming pass around `position`.
    ///
    /// # Errors
    ///
    /// Returns `NonFinitePosition` if a component of `position` is NaN or
    /// infinite, and `PositionOutOfRange` if the data ring around it would
    /// leave the `i32` world grid. In both cases the world is left untouched.
    pub fn recompute_around(&mut self, position: [f32; 3]) -> StrataResult<StreamingReport> {
        if !position.iter().all(|v| v.is_finite()) {
            return Err(StrataError::NonFinitePosition(position));
        }
        if !ring_in_range(position, self.dims, self.render_distance + 1) {
            return Err(StrataError::PositionOutOfRange(position));
        }

        let center = center_chunk(position, self.dims);
        let data_needed = ring(center, self.render_distance + 1);
        let render_needed = ring(center, self.render_distance);
        let data_set: HashSet<ChunkCoord> = data_needed.iter().copied().collect();
        let render_set: HashSet<ChunkCoord> = render_needed.iter().copied().collect();

        let mut report = StreamingReport {
            center,
            ..StreamingReport::default()
        };

        for coord in select_unneeded_render(&render_set, &self.proxies) {
            if self.destroy_proxy(coord) {
                report.render_destroyed += 1;
            }
        }

        for coord in select_unneeded_data(&data_set, &self.world) {
            if self.destroy_proxy(coord) {
                report.render_destroyed += 1;
            }
            if self.world.remove(coord).is_some() {
                report.data_evicted += 1;
            }
        }
        report.retained_modified = self
            .world
            .chunks()
            .filter(|c| c.is_modified() && !data_set.contains(&c.coord()))
            .count();

        let data_creates = select_data_to_create(&data_needed, &self.world, position);
        (report.data_created, report.render_refreshed) = self.create_data(&data_creates);

        let render_creates = select_render_to_create(&render_needed, &self.proxies, position, self.dims);
        report.render_created = self.create_render(&render_creates);

        self.center = Some(center);
        self.stats.passes += 1;
        self.stats.chunks_evicted += report.data_evicted as u64;

        tracing::debug!(
            "Streaming pass at {:?}: +{} / -{} chunks, +{} / -{} proxies, {} refreshed, {} modified retained",
            center,
            report.data_created,
            report.data_evicted,
            report.render_created,
            report.render_destroyed,
            report.render_refreshed,
            report.retained_modified
        );

        Ok(report)
    }

    /// Preloads the `size` x `size` block of chunks starting at the world
    /// origin: data for all of them first, then meshes.
    pub fn generate_fixed_map(&mut self, size: u32) -> StreamingReport {
        let side = size as i32;
        let coords: Vec<ChunkCoord> = (0..side)
            .flat_map(|x| (0..side).map(move |z| ChunkCoord::new(x, 0, z)))
            .collect();

        let data: Vec<ChunkCoord> = coords.iter().copied().filter(|c| !self.world.contains(*c)).collect();
        let render: Vec<ChunkCoord> = coords.iter().copied().filter(|c| !self.proxies.contains_key(c)).collect();

        let (data_created, render_refreshed) = self.create_data(&data);
        let report = StreamingReport {
            data_created,
            render_refreshed,
            render_created: self.create_render(&render),
            ..StreamingReport::default()
        };

        tracing::info!(
            "Generated {}x{} map: {} chunks, {} proxies",
            size,
            size,
            report.data_created,
            report.render_created
        );
        report
    }

    /// Generates and inserts `coords`, in order, then rebuilds the proxies
    /// bordering them. Returns `(generated, rebuilt)`.
    fn create_data(&mut self, coords: &[ChunkCoord]) -> (usize, usize) {
        let (dims, seed_offset, generator) = (self.dims, self.seed_offset, &self.generator);

        let chunks: Vec<Chunk> = coords
            .par_iter()
            .map(|&coord| {
                let mut chunk = Chunk::new(coord, dims);
                generator.generate_chunk(&mut chunk, seed_offset);
                chunk
            })
            .collect();

        let count = chunks.len();
        for chunk in chunks {
            tracing::trace!("Generated chunk {:?}", chunk.coord());
            self.world.insert(chunk);
        }
        self.stats.chunks_generated += count as u64;

        let mut refreshed = 0;
        for coord in stale_neighbours(coords, &self.proxies) {
            if self.remesh(coord) {
                refreshed += 1;
            }
        }
        (count, refreshed)
    }

    /// Meshes `coords` against the loaded world and publishes them, in order.
    fn create_render(&mut self, coords: &[ChunkCoord]) -> usize {
        let (world, mesher) = (&self.world, &self.mesher);

        let built: Vec<BuiltMesh> = coords
            .par_iter()
            .filter_map(|&coord| {
                world
                    .get(coord)
                    .map(|chunk| BuiltMesh::new(coord, mesher.build(chunk, world)))
            })
            .collect();

        let count = built.len();
        for mesh in built {
            self.publish(&mesh);
        }
        self.stats.meshes_built += count as u64;
        count
    }

    fn publish(&mut self, built: &BuiltMesh) {
        let coord = built.coord;
        let origin = coord.origin(self.dims);
        let translation = [origin[0] as f32, origin[1] as f32, origin[2] as f32];

        let entity = self.host.create_entity(&chunk_entity_name(coord), translation);
        let mesh = self
            .host
            .upload_mesh(&built.submeshes(&self.opaque_material, &self.water_material));
        self.host.attach_mesh(&entity, &mesh);

        tracing::trace!("Published chunk {:?} ({} faces)", coord, built.mesh.face_count());
        self.proxies.insert(coord, ChunkRenderProxy { coord, entity, mesh });
    }

    /// Releases the proxy at `coord`, if any.
    fn destroy_proxy(&mut self, coord: ChunkCoord) -> bool {
        match self.proxies.remove(&coord) {
            Some(proxy) => {
                self.host.release_mesh(proxy.mesh);
                self.host.destroy_entity(proxy.entity);
                self.stats.proxies_destroyed += 1;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Writes `voxel` at a world position and remeshes affected proxies.
    ///
    /// Returns `None` when no chunk is loaded there; the edit is dropped.
    ///
    /// # Errors
    ///
    /// Returns `UnloadedVoxelWrite` when `voxel` is `Nothing`.
    pub fn set_voxel(&mut self, world: [i32; 3], voxel: VoxelType) -> StrataResult<Option<EditReport>> {
        let Some((coord, local)) = self.world.edit(world, voxel)? else {
            tracing::warn!("Dropped edit at {:?}: no chunk loaded", world);
            return Ok(None);
        };
        self.stats.edits += 1;

        let mut remeshed = Vec::new();
        for target in remesh_targets(coord, local, self.dims) {
            if self.remesh(target) {
                remeshed.push(target);
            }
        }

        Ok(Some(EditReport { coord, local, remeshed }))
    }

    /// Rebuilds the mesh of the proxy at `coord`.
    ///
    /// Returns false if `coord` has no proxy.
    pub fn remesh(&mut self, coord: ChunkCoord) -> bool {
        let (Some(chunk), Some(proxy)) = (self.world.get(coord), self.proxies.get(&coord)) else {
            return false;
        };

        let built = BuiltMesh::new(coord, self.mesher.build(chunk, &self.world));
        self.host
            .replace_mesh(&proxy.mesh, &built.submeshes(&self.opaque_material, &self.water_material));
        self.stats.meshes_rebuilt += 1;
        tracing::trace!("Remeshed chunk {:?}", coord);
        true
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Voxel at a world position; `Nothing` where no chunk is loaded.
    #[must_use]
    pub fn voxel_at(&self, world: [i32; 3]) -> VoxelType {
        self.world.voxel_at(world)
    }

    /// World Y of the highest solid voxel in a column, if any is loaded.
    #[must_use]
    pub fn ground_height(&self, x: i32, z: i32) -> Option<i32> {
        let column = ChunkCoord::from_world([x, 0, z], self.dims);
        let mut layers: Vec<&Chunk> = self
            .world
            .chunks()
            .filter(|c| c.coord().x == column.x && c.coord().z == column.z)
            .collect();
        layers.sort_unstable_by_key(|c| std::cmp::Reverse(c.coord().y));

        let catalog = self.mesher.catalog();
        layers.into_iter().find_map(|chunk| {
            let [lx, _, lz] = chunk.world_to_local([x, chunk.origin()[1], z])?;
            (0..self.dims.height)
                .rev()
                .find(|&y| catalog.is_solid(chunk.get(lx, y, lz)))
                .map(|y| chunk.origin()[1] + y as i32)
        })
    }

    /// Standing position above the ground at the centre of chunk (0, 0).
    #[must_use]
    pub fn spawn_point(&self) -> Option<[f32; 3]> {
        let centre = self.dims.size_i32() / 2;
        self.ground_height(centre, centre)
            .map(|y| [centre as f32 + 0.5, (y + 1) as f32, centre as f32 + 0.5])
    }

    /// Chunk dimensions.
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Render ring radius in chunks.
    #[must_use]
    pub const fn render_distance(&self) -> u32 {
        self.render_distance
    }

    /// Configured preload size in chunks.
    #[must_use]
    pub const fn map_size(&self) -> u32 {
        self.map_size
    }

    /// Centre chunk of the last pass.
    #[must_use]
    pub const fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Loaded chunk data.
    #[must_use]
    pub const fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_chunks(&self) -> usize {
        self.world.len()
    }

    /// Number of render proxies.
    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Render proxy at `coord`.
    #[must_use]
    pub fn proxy(&self, coord: ChunkCoord) -> Option<&ChunkRenderProxy<H::Entity, H::Mesh>> {
        self.proxies.get(&coord)
    }

    /// Coordinates of all render proxies, in no particular order.
    pub fn proxy_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.proxies.keys().copied()
    }

    /// Terrain generator.
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Chunk mesher.
    #[must_use]
    pub const fn mesher(&self) -> &ChunkMesher {
        &self.mesher
    }

    /// Host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Cumulative counters.
    #[must_use]
    pub const fn stats(&self) -> WorldStats {
        self.stats
    }
}
