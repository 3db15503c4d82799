//! # Terrain Generator
//!
//! Fills a chunk from noise. Generation runs in two passes:
//!
//! 1. Per column: pick the biome, compute the surface height, run the
//!    layer chain bottom-up, then the stone layer
//! 2. Per column again: plant trees, whose canopies reach into
//!    neighbouring columns and therefore need every column filled first
//!
//! Output depends only on the seed, the seed offset and the chunk
//! coordinate, so a chunk can be dropped and regenerated at any time.

use strata_core::Chunk;

use crate::biome::{BiomeSelector, BiomeSettings};
use crate::layers::{ColumnContext, LayerChain, StoneLayer, TreeLayer};
use crate::noise::{redistribute, remap_unit, PerlinNoise, WorldSeed};
use crate::warp::DomainWarp;

/// Default water line.
pub const DEFAULT_WATER_LEVEL: i32 = 50;

/// Chunk terrain generator.
///
/// Immutable after construction; share one instance between worker
/// threads.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    noise: PerlinNoise,
    chain: LayerChain,
    water_level: i32,
    biomes: BiomeSelector,
    stone: StoneLayer,
    trees: TreeLayer,
    warp: DomainWarp,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(WorldSeed::default(), DEFAULT_WATER_LEVEL)
    }
}

impl TerrainGenerator {
    /// Creates a generator with the built-in biome, stone, tree and warp
    /// parameters.
    #[must_use]
    pub fn new(seed: WorldSeed, water_level: i32) -> Self {
        Self {
            noise: PerlinNoise::new(seed),
            chain: LayerChain::new(water_level),
            water_level,
            biomes: BiomeSelector::default(),
            stone: StoneLayer::default(),
            trees: TreeLayer::default(),
            warp: DomainWarp::default(),
        }
    }

    /// Replaces the biome table.
    #[must_use]
    pub fn with_biomes(mut self, biomes: BiomeSelector) -> Self {
        self.biomes = biomes;
        self
    }

    /// Replaces the stone layer.
    #[must_use]
    pub const fn with_stone(mut self, stone: StoneLayer) -> Self {
        self.stone = stone;
        self
    }

    /// Replaces the tree layer.
    #[must_use]
    pub const fn with_trees(mut self, trees: TreeLayer) -> Self {
        self.trees = trees;
        self
    }

    /// Replaces the domain warp.
    #[must_use]
    pub const fn with_warp(mut self, warp: DomainWarp) -> Self {
        self.warp = warp;
        self
    }

    /// Shared noise source.
    #[must_use]
    pub const fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    /// Water line (world Y).
    #[must_use]
    pub const fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Biome table.
    #[must_use]
    pub const fn biomes(&self) -> &BiomeSelector {
        &self.biomes
    }

    /// Surface height of a world column for a given chunk height.
    #[must_use]
    pub fn surface_height(&self, world_x: i32, world_z: i32, chunk_height: usize, seed_offset: [f64; 2]) -> i32 {
        let (x, z) = (f64::from(world_x), f64::from(world_z));
        let biome = self.biomes.select(&self.noise, x, z, seed_offset);
        self.biome_surface_height(biome, x, z, chunk_height, seed_offset)
    }

    fn biome_surface_height(
        &self,
        biome: &BiomeSettings,
        x: f64,
        z: f64,
        chunk_height: usize,
        seed_offset: [f64; 2],
    ) -> i32 {
        let settings = biome.noise.with_world_offset(seed_offset);
        let raw = if biome.domain_warping {
            self.warp.sample(&self.noise, x, z, settings)
        } else {
            self.noise.octave_sample(x, z, settings)
        };
        let height = remap_unit(redistribute(raw, settings), 0.0, chunk_height as f64);
        height.floor() as i32
    }

    /// Populates every voxel of `chunk`.
    pub fn generate_chunk(&self, chunk: &mut Chunk, seed_offset: [f64; 2]) {
        let dims = chunk.dims();
        let origin = chunk.origin();
        let mut columns = Vec::with_capacity(dims.size_xz * dims.size_xz);

        for z in 0..dims.size_xz {
            for x in 0..dims.size_xz {
                let world_x = f64::from(origin[0]) + x as f64;
                let world_z = f64::from(origin[2]) + z as f64;

                let biome = self.biomes.select(&self.noise, world_x, world_z, seed_offset);
                let ctx = ColumnContext {
                    surface_height: self.biome_surface_height(biome, world_x, world_z, dims.height, seed_offset),
                    surface_voxel: biome.surface,
                    subsurface_voxel: biome.subsurface,
                    seed_offset,
                };

                for y in origin[1]..origin[1] + dims.height_i32() {
                    self.chain.handle(chunk, x, y, z, &ctx);
                }
                self.stone.apply(&self.noise, chunk, x, z, &ctx);

                columns.push((x, z, ctx, biome.trees));
            }
        }

        for (x, z, ctx, trees) in &columns {
            if *trees {
                self.trees.apply(&self.noise, chunk, *x, *z, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{StoneSettings, TreeSettings};
    use strata_core::{ChunkCoord, ChunkDims, VoxelType};

    fn dims() -> ChunkDims {
        ChunkDims::new(16, 100)
    }

    #[test]
    fn test_generation_determinism() {
        let generator = TerrainGenerator::new(WorldSeed::new(12345), 50);

        let mut a = Chunk::new(ChunkCoord::new(3, 0, -2), dims());
        let mut b = Chunk::new(ChunkCoord::new(3, 0, -2), dims());
        generator.generate_chunk(&mut a, [10.0, 20.0]);
        generator.generate_chunk(&mut b, [10.0, 20.0]);

        assert_eq!(a.voxels(), b.voxels(), "Same chunk should generate identically");
    }

    #[test]
    fn test_seed_offset_changes_terrain() {
        let generator = TerrainGenerator::default();

        let mut a = Chunk::new(ChunkCoord::default(), dims());
        let mut b = Chunk::new(ChunkCoord::default(), dims());
        generator.generate_chunk(&mut a, [0.0, 0.0]);
        generator.generate_chunk(&mut b, [5000.0, -5000.0]);

        assert_ne!(a.voxels(), b.voxels(), "Seed offset should move the sampling window");
    }

    #[test]
    fn test_column_matches_surface_height() {
        let generator = TerrainGenerator::default()
            .with_stone(StoneLayer::new(StoneSettings { threshold: 2.0, ..StoneSettings::default() }))
            .with_trees(TreeLayer::new(TreeSettings { enabled: false, ..TreeSettings::default() }).unwrap());

        let mut chunk = Chunk::new(ChunkCoord::default(), dims());
        generator.generate_chunk(&mut chunk, [0.0, 0.0]);

        for (x, z) in [(0, 0), (8, 8), (15, 3)] {
            let surface = generator.surface_height(x, z, 100, [0.0, 0.0]);
            println!("column ({x}, {z}) surface = {surface}");

            if (0..100).contains(&surface) {
                let top = chunk.get(x as usize, surface as usize, z as usize);
                assert!(
                    matches!(top, VoxelType::Grass | VoxelType::Sand),
                    "surface voxel at ({x}, {z}) was {top:?}"
                );
            }
            if surface + 1 < 100 && surface + 1 > 50 {
                assert_eq!(chunk.get(x as usize, (surface + 1) as usize, z as usize), VoxelType::Air);
            }
        }
    }

    #[test]
    fn test_chunk_above_water_line_holds_no_water() {
        let generator = TerrainGenerator::default();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 2, 0), dims());
        generator.generate_chunk(&mut chunk, [0.0, 0.0]);

        assert_eq!(chunk.count(VoxelType::Water), 0);
    }

    #[test]
    fn test_never_writes_nothing() {
        let generator = TerrainGenerator::default();
        let mut chunk = Chunk::new(ChunkCoord::new(-1, 0, 1), dims());
        generator.generate_chunk(&mut chunk, [0.0, 0.0]);

        assert_eq!(chunk.count(VoxelType::Nothing), 0);
    }
}
