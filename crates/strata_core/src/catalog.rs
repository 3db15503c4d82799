//! # Voxel Catalog
//!
//! Static table mapping every voxel type to its texture atlas tiles and
//! meshing flags.
//!
//! The atlas is a grid of equally sized tiles addressed by integer
//! `(column, row)` coordinates. UVs handed to the mesher are inset by a
//! small texture offset so neighbouring tiles never bleed into a face.
//!
//! The catalog is built once at startup and only read afterwards; share it
//! behind an `Arc` between the generator, mesher and streaming threads.

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{StrataError, StrataResult};
use crate::voxel::VoxelType;

/// Atlas tile coordinate (column, row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Atlas column.
    pub x: u16,
    /// Atlas row.
    pub y: u16,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Catalog data for one voxel type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Tile used for the +Y face.
    pub up: TileCoord,
    /// Tile used for the -Y face.
    pub down: TileCoord,
    /// Tile used for the four side faces.
    pub side: TileCoord,
    /// Whether this voxel hides the faces of its neighbours.
    pub solid: bool,
    /// Whether this voxel is meshed into the water sub-mesh.
    pub water: bool,
}

impl CatalogEntry {
    /// An opaque voxel with distinct top, bottom and side tiles.
    #[must_use]
    pub const fn solid(up: TileCoord, down: TileCoord, side: TileCoord) -> Self {
        Self { up, down, side, solid: true, water: false }
    }

    /// An opaque voxel using the same tile on every face.
    #[must_use]
    pub const fn uniform(tile: TileCoord) -> Self {
        Self::solid(tile, tile, tile)
    }

    /// A voxel that does not occlude its neighbours.
    #[must_use]
    pub const fn transparent(tile: TileCoord) -> Self {
        Self { up: tile, down: tile, side: tile, solid: false, water: false }
    }

    /// The water voxel.
    #[must_use]
    pub const fn water(tile: TileCoord) -> Self {
        Self { up: tile, down: tile, side: tile, solid: false, water: true }
    }

    /// Returns the tile for a face direction.
    #[inline]
    #[must_use]
    pub const fn tile(&self, direction: Direction) -> TileCoord {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            _ => self.side,
        }
    }
}

/// Config-level replacement of one catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOverride {
    /// Voxel type to replace.
    pub voxel: VoxelType,
    /// Tile for the +Y face.
    pub up: TileCoord,
    /// Tile for the -Y face.
    pub down: TileCoord,
    /// Tile for the side faces.
    pub side: TileCoord,
    /// Whether the voxel occludes neighbours.
    pub solid: bool,
}

/// Voxel type → atlas tiles and flags.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelCatalog {
    entries: [CatalogEntry; VoxelType::COUNT],
    tile_size: [f32; 2],
    texture_offset: f32,
}

impl Default for VoxelCatalog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TILE_SIZE, Self::DEFAULT_TEXTURE_OFFSET)
    }
}

impl VoxelCatalog {
    /// Default tile size: a 10x10 atlas.
    pub const DEFAULT_TILE_SIZE: [f32; 2] = [0.1, 0.1];

    /// Default UV inset against atlas bleeding.
    pub const DEFAULT_TEXTURE_OFFSET: f32 = 0.001;

    /// Built-in tile layout, first atlas row.
    const BUILTIN: [CatalogEntry; VoxelType::COUNT] = [
        CatalogEntry::transparent(TileCoord::new(0, 0)), // air
        CatalogEntry::uniform(TileCoord::new(2, 0)),     // dirt
        CatalogEntry::solid(TileCoord::new(0, 0), TileCoord::new(2, 0), TileCoord::new(1, 0)),
        CatalogEntry::uniform(TileCoord::new(3, 0)),     // sand
        CatalogEntry::uniform(TileCoord::new(4, 0)),     // stone
        CatalogEntry::water(TileCoord::new(5, 0)),
        CatalogEntry::solid(TileCoord::new(7, 0), TileCoord::new(7, 0), TileCoord::new(6, 0)),
        CatalogEntry::uniform(TileCoord::new(8, 0)),     // leaf, solid
        CatalogEntry::transparent(TileCoord::new(9, 0)), // leaf, transparent
        CatalogEntry::transparent(TileCoord::new(0, 0)), // nothing
    ];

    /// Creates the built-in catalog with the given atlas geometry.
    #[must_use]
    pub const fn new(tile_size: [f32; 2], texture_offset: f32) -> Self {
        Self {
            entries: Self::BUILTIN,
            tile_size,
            texture_offset,
        }
    }

    /// Creates a catalog from atlas geometry plus per-voxel replacements.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` when the tile size is not positive, the
    /// texture offset would flip a tile, or an override targets `Nothing`
    /// or makes water solid.
    pub fn with_overrides(
        tile_size: [f32; 2],
        texture_offset: f32,
        overrides: &[CatalogOverride],
    ) -> StrataResult<Self> {
        if !tile_size.iter().all(|s| s.is_finite() && *s > 0.0) {
            return Err(StrataError::InvalidConfig(format!(
                "atlas tile size must be positive, got {tile_size:?}"
            )));
        }
        if !(texture_offset.is_finite() && texture_offset >= 0.0 && texture_offset * 2.0 < tile_size[0].min(tile_size[1])) {
            return Err(StrataError::InvalidConfig(format!(
                "texture offset {texture_offset} does not fit tile size {tile_size:?}"
            )));
        }

        let mut catalog = Self::new(tile_size, texture_offset);
        for entry in overrides {
            match entry.voxel {
                VoxelType::Nothing => {
                    return Err(StrataError::InvalidConfig(
                        "the unloaded marker has no catalog entry".to_string(),
                    ));
                }
                VoxelType::Water if entry.solid => {
                    return Err(StrataError::InvalidConfig("water cannot be solid".to_string()));
                }
                voxel => {
                    catalog.entries[voxel.index()] = CatalogEntry {
                        up: entry.up,
                        down: entry.down,
                        side: entry.side,
                        solid: entry.solid,
                        water: voxel == VoxelType::Water,
                    };
                }
            }
        }
        Ok(catalog)
    }

    /// Returns the entry for a voxel type.
    #[inline]
    #[must_use]
    pub fn entry(&self, voxel: VoxelType) -> &CatalogEntry {
        &self.entries[voxel.index()]
    }

    /// Returns true if the voxel hides neighbouring faces.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, voxel: VoxelType) -> bool {
        self.entries[voxel.index()].solid
    }

    /// Returns true if the voxel belongs to the water sub-mesh.
    #[inline]
    #[must_use]
    pub fn is_water(&self, voxel: VoxelType) -> bool {
        self.entries[voxel.index()].water
    }

    /// Atlas tile size in UV units.
    #[must_use]
    pub const fn tile_size(&self) -> [f32; 2] {
        self.tile_size
    }

    /// UV inset applied to every tile corner.
    #[must_use]
    pub const fn texture_offset(&self) -> f32 {
        self.texture_offset
    }

    /// Returns the four UV corners of a face, matching the mesher's vertex order.
    #[must_use]
    pub fn face_uvs(&self, voxel: VoxelType, direction: Direction) -> [[f32; 2]; 4] {
        let tile = self.entry(voxel).tile(direction);
        let [sx, sy] = self.tile_size;
        let o = self.texture_offset;
        let u0 = sx * f32::from(tile.x);
        let v0 = sy * f32::from(tile.y);

        [
            [u0 + sx - o, v0 + o],
            [u0 + sx - o, v0 + sy - o],
            [u0 + o, v0 + sy - o],
            [u0 + o, v0 + o],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_solidity() {
        let catalog = VoxelCatalog::default();

        for voxel in [VoxelType::Dirt, VoxelType::Grass, VoxelType::Sand, VoxelType::Stone, VoxelType::Wood, VoxelType::LeafSolid] {
            assert!(catalog.is_solid(voxel), "{voxel:?} should be solid");
        }
        for voxel in [VoxelType::Air, VoxelType::Water, VoxelType::LeafTransparent, VoxelType::Nothing] {
            assert!(!catalog.is_solid(voxel), "{voxel:?} should not be solid");
        }
        assert!(catalog.is_water(VoxelType::Water));
        assert!(!catalog.is_water(VoxelType::Air));
    }

    #[test]
    fn test_grass_uses_distinct_faces() {
        let catalog = VoxelCatalog::default();
        let grass = catalog.entry(VoxelType::Grass);

        assert_ne!(grass.tile(Direction::Up), grass.tile(Direction::Left));
        assert_ne!(grass.tile(Direction::Down), grass.tile(Direction::Up));
        assert_eq!(grass.tile(Direction::Forward), grass.tile(Direction::Right));
    }

    #[test]
    fn test_face_uvs_stay_inside_tile() {
        let catalog = VoxelCatalog::default();
        let uvs = catalog.face_uvs(VoxelType::Stone, Direction::Left);

        // Stone is tile (4, 0) in a 0.1 atlas.
        for [u, v] in uvs {
            assert!(u > 0.4 && u < 0.5, "u {u} leaked out of the tile");
            assert!(v > 0.0 && v < 0.1, "v {v} leaked out of the tile");
        }
    }

    #[test]
    fn test_overrides_replace_entries() {
        let catalog = VoxelCatalog::with_overrides(
            [0.25, 0.25],
            0.002,
            &[CatalogOverride {
                voxel: VoxelType::LeafSolid,
                up: TileCoord::new(1, 1),
                down: TileCoord::new(1, 1),
                side: TileCoord::new(1, 1),
                solid: false,
            }],
        )
        .unwrap();

        assert!(!catalog.is_solid(VoxelType::LeafSolid));
        assert_eq!(catalog.entry(VoxelType::LeafSolid).up, TileCoord::new(1, 1));
        assert_eq!(catalog.tile_size(), [0.25, 0.25]);
    }

    #[test]
    fn test_overrides_reject_nothing_and_solid_water() {
        let nothing = CatalogOverride {
            voxel: VoxelType::Nothing,
            up: TileCoord::default(),
            down: TileCoord::default(),
            side: TileCoord::default(),
            solid: true,
        };
        assert!(VoxelCatalog::with_overrides([0.1, 0.1], 0.001, &[nothing]).is_err());

        let water = CatalogOverride {
            voxel: VoxelType::Water,
            up: TileCoord::default(),
            down: TileCoord::default(),
            side: TileCoord::default(),
            solid: true,
        };
        assert!(VoxelCatalog::with_overrides([0.1, 0.1], 0.001, &[water]).is_err());
    }

    #[test]
    fn test_rejects_offset_larger_than_tile() {
        let result = VoxelCatalog::with_overrides([0.1, 0.1], 0.06, &[]);
        assert!(matches!(result, Err(StrataError::InvalidConfig(_))));
    }
}
