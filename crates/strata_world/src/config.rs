//! # World Configuration
//!
//! Loaded once at startup from TOML. Every section and field has a default,
//! so an empty file describes the stock world:
//!
//! ```toml
//! [world]
//! chunk_size = 16
//! chunk_height = 100
//! render_distance = 8
//! water_level = 50
//! seed_offset = [0.0, 0.0]
//!
//! [[terrain.biomes]]
//! name = "grassland"
//! surface = "grass"
//! subsurface = "dirt"
//!
//! [render]
//! opaque_material = "VoxelMat"
//! water_material = "WaterVoxelMat"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_core::{CatalogOverride, ChunkDims, StrataError, StrataResult, VoxelCatalog};
use strata_meshing::{OPAQUE_MATERIAL, WATER_MATERIAL};
use strata_procedural::{
    BiomeSelector, BiomeSettings, DomainWarp, NoiseSettings, StoneLayer, StoneSettings,
    TerrainGenerator, TreeLayer, TreeSettings, WarpSettings, WorldSeed,
};

/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: u32 = 64;

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World geometry and streaming.
    pub world: WorldSection,
    /// Terrain generation.
    pub terrain: TerrainSection,
    /// Host materials.
    pub render: RenderSection,
    /// Texture atlas.
    pub catalog: CatalogSection,
}

/// `[world]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSection {
    /// Chunk width and depth in voxels.
    pub chunk_size: usize,
    /// Chunk height in voxels.
    pub chunk_height: usize,
    /// Render ring radius in chunks; data is kept one chunk further.
    pub render_distance: u32,
    /// Side of the square preloaded by `generate_fixed_map`, in chunks.
    pub map_size_in_chunks: u32,
    /// Noise permutation seed.
    pub seed: WorldSeed,
    /// Per-world noise sampling offset.
    pub seed_offset: [f64; 2],
    /// Highest water voxel (world Y).
    pub water_level: i32,
    /// Seconds between streaming checks.
    pub detection_interval: f32,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            chunk_height: 100,
            render_distance: 8,
            map_size_in_chunks: 6,
            seed: WorldSeed::default(),
            seed_offset: [0.0, 0.0],
            water_level: 50,
            detection_interval: 1.0,
        }
    }
}

/// `[terrain]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSection {
    /// Biome table; at least one entry.
    pub biomes: Vec<BiomeSettings>,
    /// Temperature channel used to pick biomes.
    pub temperature: NoiseSettings,
    /// Stone layer.
    pub stone: StoneSettings,
    /// Tree layer.
    pub trees: TreeSettings,
    /// Domain warp channels.
    pub warp: WarpSettings,
}

impl Default for TerrainSection {
    fn default() -> Self {
        Self {
            biomes: vec![BiomeSettings::default()],
            temperature: BiomeSelector::default_temperature(),
            stone: StoneSettings::default(),
            trees: TreeSettings::default(),
            warp: WarpSettings::default(),
        }
    }
}

/// `[render]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Material of the opaque sub-mesh.
    pub opaque_material: String,
    /// Material of the water sub-mesh.
    pub water_material: String,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            opaque_material: OPAQUE_MATERIAL.to_string(),
            water_material: WATER_MATERIAL.to_string(),
        }
    }
}

/// `[catalog]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Atlas tile size in UV units.
    pub tile_size: [f32; 2],
    /// UV inset per tile corner.
    pub texture_offset: f32,
    /// Per-voxel replacements of the built-in table.
    pub overrides: Vec<CatalogOverride>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            tile_size: VoxelCatalog::DEFAULT_TILE_SIZE,
            texture_offset: VoxelCatalog::DEFAULT_TEXTURE_OFFSET,
            overrides: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML and `InvalidConfig` for
    /// inconsistent values.
    pub fn from_toml_str(text: &str) -> StrataResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| StrataError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> StrataResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if a value has no TOML representation.
    pub fn to_toml_string(&self) -> StrataResult<String> {
        toml::to_string_pretty(self).map_err(|e| StrataError::ConfigParse(e.to_string()))
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> StrataResult<()> {
        let world = &self.world;
        if world.chunk_size == 0 || world.chunk_height == 0 {
            return Err(StrataError::InvalidConfig(format!(
                "chunk dimensions must be non-zero, got {}x{}",
                world.chunk_size, world.chunk_height
            )));
        }
        if i32::try_from(world.chunk_size).is_err() || i32::try_from(world.chunk_height).is_err() {
            return Err(StrataError::InvalidConfig("chunk dimensions do not fit in i32".to_string()));
        }
        if world.render_distance > MAX_RENDER_DISTANCE {
            return Err(StrataError::InvalidConfig(format!(
                "render distance {} exceeds {MAX_RENDER_DISTANCE}",
                world.render_distance
            )));
        }
        if !world.seed_offset.iter().all(|v| v.is_finite()) {
            return Err(StrataError::InvalidConfig("seed offset must be finite".to_string()));
        }
        if !(world.detection_interval.is_finite() && world.detection_interval >= 0.0) {
            return Err(StrataError::InvalidConfig(format!(
                "detection interval must be a non-negative number of seconds, got {}",
                world.detection_interval
            )));
        }
        if self.render.opaque_material.is_empty() || self.render.water_material.is_empty() {
            return Err(StrataError::InvalidConfig("material names must not be empty".to_string()));
        }

        // Building the parts runs their own validation.
        self.build_catalog()?;
        self.build_generator()?;

        let trees = &self.terrain.trees;
        if trees.enabled && TreeLayer::clearance(trees.trunk_height) as usize >= world.chunk_height {
            return Err(StrataError::InvalidConfig(format!(
                "trees with trunk height {} do not fit in chunks {} voxels high",
                trees.trunk_height, world.chunk_height
            )));
        }
        Ok(())
    }

    /// Chunk dimensions.
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.world.chunk_size, self.world.chunk_height)
    }

    /// Builds the voxel catalog.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a bad atlas layout or override.
    pub fn build_catalog(&self) -> StrataResult<VoxelCatalog> {
        VoxelCatalog::with_overrides(
            self.catalog.tile_size,
            self.catalog.texture_offset,
            &self.catalog.overrides,
        )
    }

    /// Builds the terrain generator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for invalid noise, biome, tree or warp settings.
    pub fn build_generator(&self) -> StrataResult<TerrainGenerator> {
        let terrain = &self.terrain;
        self.terrain.stone.noise.validate("stone")?;

        Ok(TerrainGenerator::new(self.world.seed, self.world.water_level)
            .with_biomes(BiomeSelector::new(terrain.temperature, terrain.biomes.clone())?)
            .with_stone(StoneLayer::new(terrain.stone))
            .with_trees(TreeLayer::new(terrain.trees)?)
            .with_warp(DomainWarp::new(terrain.warp)?))
    }
}
