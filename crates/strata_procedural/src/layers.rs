//! # Terrain Layers
//!
//! Per-voxel layer assignment.
//!
//! ## Primary chain
//!
//! Handlers are tried in order and the first one that claims a voxel
//! writes it:
//!
//! 1. `Water`: `surface < y <= level`, plus a sand beach under the first
//!    water voxel
//! 2. `Air`: `y > surface`
//! 3. `Surface`: `y == surface`
//! 4. `Underground`: `y < surface`
//!
//! The chain must run bottom-up within a column: the beach write replaces
//! the surface voxel written one step earlier.
//!
//! ## Column passes
//!
//! `StoneLayer` and `TreeLayer` run once per column after the chain has
//! filled it, and overwrite chain output unconditionally.

use serde::{Deserialize, Serialize};
use strata_core::{Chunk, StrataError, StrataResult, VoxelType};

use crate::noise::{NoiseSettings, PerlinNoise};

/// Per-column inputs shared by every layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnContext {
    /// World Y of the surface voxel.
    pub surface_height: i32,
    /// Voxel written at the surface.
    pub surface_voxel: VoxelType,
    /// Voxel written below the surface.
    pub subsurface_voxel: VoxelType,
    /// Per-world sampling offset.
    pub seed_offset: [f64; 2],
}

/// One handler of the primary chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerHandler {
    /// Fills `(surface, level]` with water.
    Water {
        /// Highest water voxel (world Y).
        level: i32,
    },
    /// Everything above the surface.
    Air,
    /// The surface voxel itself.
    Surface,
    /// Everything below the surface.
    Underground,
}

impl LayerHandler {
    /// Tries to claim the voxel at local `(x, z)` and world `y`.
    ///
    /// Returns true if this handler wrote the voxel.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `z` or the local Y are outside the chunk.
    pub fn handle(self, chunk: &mut Chunk, x: usize, y: i32, z: usize, ctx: &ColumnContext) -> bool {
        let surface = ctx.surface_height;
        let voxel = match self {
            Self::Water { level } if y > surface && y <= level => VoxelType::Water,
            Self::Air if y > surface => VoxelType::Air,
            Self::Surface if y == surface => ctx.surface_voxel,
            Self::Underground if y < surface => ctx.subsurface_voxel,
            _ => return false,
        };

        let origin_y = chunk.origin()[1];
        chunk.set(x, local_y(y, origin_y), z, voxel);

        if matches!(self, Self::Water { .. }) && y == surface + 1 {
            let beach = surface - origin_y;
            if beach >= 0 {
                chunk.set(x, beach as usize, z, VoxelType::Sand);
            }
        }
        true
    }
}

/// Ordered chain of handlers; first match wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerChain {
    handlers: Vec<LayerHandler>,
}

impl LayerChain {
    /// Standard chain: water, air, surface, underground.
    #[must_use]
    pub fn new(water_level: i32) -> Self {
        Self::from_handlers(vec![
            LayerHandler::Water { level: water_level },
            LayerHandler::Air,
            LayerHandler::Surface,
            LayerHandler::Underground,
        ])
    }

    /// Chain with a custom handler order.
    #[must_use]
    pub fn from_handlers(handlers: Vec<LayerHandler>) -> Self {
        Self { handlers }
    }

    /// Handlers in evaluation order.
    #[must_use]
    pub fn handlers(&self) -> &[LayerHandler] {
        &self.handlers
    }

    /// Runs the chain for one voxel; false if no handler claimed it.
    pub fn handle(&self, chunk: &mut Chunk, x: usize, y: i32, z: usize, ctx: &ColumnContext) -> bool {
        self.handlers.iter().any(|handler| handler.handle(chunk, x, y, z, ctx))
    }
}

/// Stone layer parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoneSettings {
    /// Noise value above which a column turns to stone.
    pub threshold: f64,
    /// Stone noise channel (its world offset is replaced by the seed offset).
    pub noise: NoiseSettings,
}

impl Default for StoneSettings {
    fn default() -> Self {
        Self {
            threshold: 0.56,
            noise: NoiseSettings {
                zoom: 0.16,
                octaves: 2,
                offset: [10.0, 50.0],
                world_offset: [0.0, 0.0],
                persistence: 2.3,
                redistribution_modifier: 0.9,
                exponent: 1.0,
            },
        }
    }
}

/// Stamps stone columns over the chain output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StoneLayer {
    settings: StoneSettings,
}

impl StoneLayer {
    /// Creates a stone layer.
    #[must_use]
    pub const fn new(settings: StoneSettings) -> Self {
        Self { settings }
    }

    /// Parameters.
    #[must_use]
    pub const fn settings(&self) -> &StoneSettings {
        &self.settings
    }

    /// Applies the layer to local column `(x, z)`.
    ///
    /// Writes stone from the chunk's bottom up to the surface (clipped to
    /// the chunk top). Returns true if the column was stamped.
    pub fn apply(&self, noise: &PerlinNoise, chunk: &mut Chunk, x: usize, z: usize, ctx: &ColumnContext) -> bool {
        let origin = chunk.origin();
        if origin[1] > ctx.surface_height {
            return false;
        }

        let settings = self.settings.noise.with_world_offset(ctx.seed_offset);
        let world_x = f64::from(origin[0]) + x as f64;
        let world_z = f64::from(origin[2]) + z as f64;
        if noise.octave_sample(world_x, world_z, settings) <= self.settings.threshold {
            return false;
        }

        let top = ctx.surface_height.min(origin[1] + chunk.dims().height_i32() - 1);
        for y in origin[1]..=top {
            chunk.set(x, local_y(y, origin[1]), z, VoxelType::Stone);
        }
        true
    }
}

/// Tree layer parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Whether trees are planted at all.
    pub enabled: bool,
    /// Noise value a column must exceed to hold a tree.
    pub threshold: f64,
    /// Trunk height in voxels.
    pub trunk_height: u32,
    /// Voxel used for the canopy.
    pub leaf: VoxelType,
    /// Tree noise channel (its world offset is replaced by the seed offset).
    pub noise: NoiseSettings,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.68,
            trunk_height: 4,
            leaf: VoxelType::LeafSolid,
            noise: NoiseSettings {
                zoom: 0.37,
                octaves: 1,
                offset: [-221.3, 417.7],
                world_offset: [0.0, 0.0],
                persistence: 0.5,
                redistribution_modifier: 1.0,
                exponent: 1.0,
            },
        }
    }
}

/// Plants trees on grass columns at local maxima of the tree noise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TreeLayer {
    settings: TreeSettings,
}

impl TreeLayer {
    /// Canopy radius around the trunk.
    pub const CANOPY_RADIUS: i32 = 2;

    /// Tallest accepted trunk, in voxels.
    pub const MAX_TRUNK_HEIGHT: u32 = 256;

    /// Voxels a tree occupies above its surface voxel, canopy included.
    #[must_use]
    pub const fn clearance(trunk_height: u32) -> u32 {
        trunk_height.saturating_add(2)
    }

    /// Creates a tree layer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a trunk height outside
    /// `1..=MAX_TRUNK_HEIGHT`, a canopy voxel that is not a leaf, or an
    /// invalid noise channel.
    pub fn new(settings: TreeSettings) -> StrataResult<Self> {
        if settings.trunk_height == 0 || settings.trunk_height > Self::MAX_TRUNK_HEIGHT {
            return Err(StrataError::InvalidConfig(format!(
                "tree trunk height must be in 1..={}, got {}",
                Self::MAX_TRUNK_HEIGHT,
                settings.trunk_height
            )));
        }
        if !matches!(settings.leaf, VoxelType::LeafSolid | VoxelType::LeafTransparent) {
            return Err(StrataError::InvalidConfig(format!(
                "tree canopy must be a leaf voxel, got {:?}",
                settings.leaf
            )));
        }
        settings.noise.validate("trees")?;
        Ok(Self { settings })
    }

    /// Parameters.
    #[must_use]
    pub const fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    fn tree_noise(&self, noise: &PerlinNoise, world_x: i32, world_z: i32, seed_offset: [f64; 2]) -> f64 {
        let settings = self.settings.noise.with_world_offset(seed_offset);
        noise.octave_sample(f64::from(world_x), f64::from(world_z), settings)
    }

    /// Whether a world column would hold a trunk, ignoring the terrain.
    ///
    /// True when the tree noise is above the threshold and strictly above
    /// all eight neighbouring columns, so trunks are never adjacent.
    #[must_use]
    pub fn is_tree_site(&self, noise: &PerlinNoise, world_x: i32, world_z: i32, seed_offset: [f64; 2]) -> bool {
        if !self.settings.enabled {
            return false;
        }
        let value = self.tree_noise(noise, world_x, world_z, seed_offset);
        if value <= self.settings.threshold {
            return false;
        }
        (-1..=1).all(|dz: i32| {
            (-1..=1).all(|dx: i32| {
                (dx == 0 && dz == 0)
                    || self.tree_noise(noise, world_x + dx, world_z + dz, seed_offset) < value
            })
        })
    }

    /// Applies the layer to local column `(x, z)`; true if a tree was planted.
    pub fn apply(&self, noise: &PerlinNoise, chunk: &mut Chunk, x: usize, z: usize, ctx: &ColumnContext) -> bool {
        let dims = chunk.dims();
        let origin = chunk.origin();
        let radius = Self::CANOPY_RADIUS;
        let (lx, lz) = (x as i32, z as i32);

        // Canopy must fit horizontally.
        if lx < radius || lz < radius || lx + radius >= dims.size_i32() || lz + radius >= dims.size_i32() {
            return false;
        }

        // Trunk base through canopy top must fit vertically.
        let surface = ctx.surface_height - origin[1];
        let trunk = self.settings.trunk_height as i32;
        if surface < 0 || surface + Self::clearance(self.settings.trunk_height) as i32 >= dims.height_i32() {
            return false;
        }
        if chunk.get(x, surface as usize, z) != VoxelType::Grass {
            return false;
        }
        if !self.is_tree_site(noise, origin[0] + lx, origin[2] + lz, ctx.seed_offset) {
            return false;
        }

        let base = surface + 1;
        for y in base..base + trunk {
            if chunk.get(x, y as usize, z) != VoxelType::Air {
                return false;
            }
        }
        for y in base..base + trunk {
            chunk.set(x, y as usize, z, VoxelType::Wood);
        }

        let canopy_bottom = base + trunk - 2;
        let canopy_top = base + trunk + 1;
        for y in canopy_bottom..=canopy_top {
            let r = if y == canopy_top { 1 } else { radius };
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dz * dz > r * r + 1 {
                        continue;
                    }
                    let (cx, cz) = ((lx + dx) as usize, (lz + dz) as usize);
                    if chunk.get(cx, y as usize, cz) == VoxelType::Air {
                        chunk.set(cx, y as usize, cz, self.settings.leaf);
                    }
                }
            }
        }
        true
    }
}

#[inline]
fn local_y(world_y: i32, origin_y: i32) -> usize {
    (world_y - origin_y) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::WorldSeed;
    use strata_core::{ChunkCoord, ChunkDims};

    fn chunk() -> Chunk {
        Chunk::new(ChunkCoord::default(), ChunkDims::new(16, 100))
    }

    fn ctx(surface_height: i32) -> ColumnContext {
        ColumnContext {
            surface_height,
            surface_voxel: VoxelType::Grass,
            subsurface_voxel: VoxelType::Dirt,
            seed_offset: [0.0, 0.0],
        }
    }

    fn fill_column(chain: &LayerChain, chunk: &mut Chunk, ctx: &ColumnContext) {
        for y in 0..100 {
            assert!(chain.handle(chunk, 3, y, 4, ctx), "nothing claimed y = {y}");
        }
    }

    #[test]
    fn test_dry_column() {
        let chain = LayerChain::new(50);
        let mut chunk = chunk();
        fill_column(&chain, &mut chunk, &ctx(60));

        assert_eq!(chunk.get(3, 59, 4), VoxelType::Dirt);
        assert_eq!(chunk.get(3, 60, 4), VoxelType::Grass);
        assert_eq!(chunk.get(3, 61, 4), VoxelType::Air);
        assert_eq!(chunk.get(3, 0, 4), VoxelType::Dirt);
    }

    #[test]
    fn test_flooded_column_gets_beach() {
        let chain = LayerChain::new(50);
        let mut chunk = chunk();
        fill_column(&chain, &mut chunk, &ctx(40));

        assert_eq!(chunk.get(3, 39, 4), VoxelType::Dirt);
        assert_eq!(chunk.get(3, 40, 4), VoxelType::Sand, "first water voxel should back-fill sand");
        assert_eq!(chunk.get(3, 41, 4), VoxelType::Water);
        assert_eq!(chunk.get(3, 50, 4), VoxelType::Water);
        assert_eq!(chunk.get(3, 51, 4), VoxelType::Air);
    }

    #[test]
    fn test_surface_at_water_level_stays_grass() {
        let chain = LayerChain::new(50);
        let mut chunk = chunk();
        fill_column(&chain, &mut chunk, &ctx(50));

        assert_eq!(chunk.get(3, 50, 4), VoxelType::Grass);
        assert_eq!(chunk.get(3, 51, 4), VoxelType::Air);
        assert_eq!(chunk.count(VoxelType::Water), 0);
    }

    #[test]
    fn test_first_match_wins() {
        // Air placed first shadows the water handler entirely.
        let chain = LayerChain::from_handlers(vec![
            LayerHandler::Air,
            LayerHandler::Water { level: 50 },
            LayerHandler::Surface,
            LayerHandler::Underground,
        ]);
        let mut chunk = chunk();
        fill_column(&chain, &mut chunk, &ctx(40));

        assert_eq!(chunk.get(3, 45, 4), VoxelType::Air);
        assert_eq!(chunk.get(3, 40, 4), VoxelType::Grass);
    }

    #[test]
    fn test_unclaimed_voxel_reports_false() {
        let chain = LayerChain::from_handlers(vec![LayerHandler::Surface]);
        let mut chunk = chunk();
        assert!(!chain.handle(&mut chunk, 0, 10, 0, &ctx(20)));
        assert!(chain.handle(&mut chunk, 0, 20, 0, &ctx(20)));
    }

    #[test]
    fn test_stone_skipped_above_surface() {
        let noise = PerlinNoise::new(WorldSeed::default());
        let layer = StoneLayer::new(StoneSettings { threshold: -1.0, ..StoneSettings::default() });
        let mut high = Chunk::new(ChunkCoord::new(0, 1, 0), ChunkDims::new(16, 100));

        assert!(!layer.apply(&noise, &mut high, 0, 0, &ctx(60)));
        assert_eq!(high.count(VoxelType::Stone), 0);
    }

    #[test]
    fn test_stone_stamps_up_to_surface() {
        let noise = PerlinNoise::new(WorldSeed::default());
        let layer = StoneLayer::new(StoneSettings { threshold: -1.0, ..StoneSettings::default() });
        let chain = LayerChain::new(50);
        let mut chunk = chunk();
        let ctx = ctx(60);
        fill_column(&chain, &mut chunk, &ctx);

        assert!(layer.apply(&noise, &mut chunk, 3, 4, &ctx));
        for y in 0..=60 {
            assert_eq!(chunk.get(3, y, 4), VoxelType::Stone, "y = {y}");
        }
        assert_eq!(chunk.get(3, 61, 4), VoxelType::Air);
    }

    #[test]
    fn test_stone_clipped_to_chunk_top() {
        let noise = PerlinNoise::new(WorldSeed::default());
        let layer = StoneLayer::new(StoneSettings { threshold: -1.0, ..StoneSettings::default() });
        let mut chunk = chunk();

        assert!(layer.apply(&noise, &mut chunk, 0, 0, &ctx(250)));
        assert_eq!(chunk.get(0, 99, 0), VoxelType::Stone);
    }

    #[test]
    fn test_stone_above_threshold_only() {
        let noise = PerlinNoise::new(WorldSeed::default());
        let layer = StoneLayer::new(StoneSettings { threshold: 2.0, ..StoneSettings::default() });
        let mut chunk = chunk();
        assert!(!layer.apply(&noise, &mut chunk, 0, 0, &ctx(60)));
    }

    #[test]
    fn test_tree_layer_rejects_bad_settings() {
        let zero = TreeSettings { trunk_height: 0, ..TreeSettings::default() };
        assert!(TreeLayer::new(zero).is_err());

        let tallest = TreeSettings { trunk_height: TreeLayer::MAX_TRUNK_HEIGHT, ..TreeSettings::default() };
        assert!(TreeLayer::new(tallest).is_ok());
        for trunk_height in [TreeLayer::MAX_TRUNK_HEIGHT + 1, u32::MAX] {
            let settings = TreeSettings { trunk_height, ..TreeSettings::default() };
            assert!(matches!(TreeLayer::new(settings), Err(StrataError::InvalidConfig(_))));
        }

        let stone = TreeSettings { leaf: VoxelType::Stone, ..TreeSettings::default() };
        assert!(TreeLayer::new(stone).is_err());
    }

    #[test]
    fn test_tree_sites_are_never_adjacent() {
        let noise = PerlinNoise::new(WorldSeed::new(99));
        let layer = TreeLayer::new(TreeSettings { threshold: 0.0, ..TreeSettings::default() }).unwrap();

        let mut sites = Vec::new();
        for z in 0..48 {
            for x in 0..48 {
                if layer.is_tree_site(&noise, x, z, [0.0, 0.0]) {
                    sites.push((x, z));
                }
            }
        }
        println!("tree sites: {}", sites.len());

        for &(ax, az) in &sites {
            for &(bx, bz) in &sites {
                if (ax, az) != (bx, bz) {
                    let gap = (ax - bx).abs().max((az - bz).abs());
                    assert!(gap > 1, "trunks at ({ax}, {az}) and ({bx}, {bz}) touch");
                }
            }
        }
    }

    #[test]
    fn test_disabled_trees_plant_nothing() {
        let noise = PerlinNoise::new(WorldSeed::new(99));
        let layer = TreeLayer::new(TreeSettings { enabled: false, threshold: -1.0, ..TreeSettings::default() }).unwrap();
        assert!(!(0..16).any(|x| layer.is_tree_site(&noise, x, x, [0.0, 0.0])));
    }

    #[test]
    fn test_planted_tree_shape() {
        let noise = PerlinNoise::new(WorldSeed::new(99));
        let layer = TreeLayer::new(TreeSettings { threshold: 0.0, ..TreeSettings::default() }).unwrap();
        let chain = LayerChain::new(50);
        let ctx = ctx(60);

        // Find an interior column that is a tree site.
        let site = (2..14)
            .flat_map(|z| (2..14).map(move |x| (x, z)))
            .find(|&(x, z)| layer.is_tree_site(&noise, x, z, ctx.seed_offset));
        let Some((x, z)) = site else {
            println!("no tree site in sample area, nothing to check");
            return;
        };

        let mut chunk = chunk();
        for y in 0..100 {
            chain.handle(&mut chunk, x as usize, y, z as usize, &ctx);
        }
        assert!(layer.apply(&noise, &mut chunk, x as usize, z as usize, &ctx));

        for y in 61..65 {
            assert_eq!(chunk.get(x as usize, y, z as usize), VoxelType::Wood, "trunk at y = {y}");
        }
        assert_eq!(chunk.get(x as usize, 66, z as usize), VoxelType::LeafSolid, "canopy top");
        assert!(chunk.count(VoxelType::LeafSolid) > 20);
    }
}
