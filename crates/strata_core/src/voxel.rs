//! Voxel type tags.

use serde::{Deserialize, Serialize};

/// The type stored in a single voxel cell.
///
/// `Nothing` is not a material: it is what world-level lookups return
/// where no chunk is loaded. It never appears inside a chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VoxelType {
    /// Empty space inside a loaded chunk.
    #[default]
    Air = 0,
    /// Dirt.
    Dirt = 1,
    /// Grass-topped dirt.
    Grass = 2,
    /// Sand.
    Sand = 3,
    /// Stone.
    Stone = 4,
    /// Water.
    Water = 5,
    /// Tree trunk.
    Wood = 6,
    /// Opaque leaves.
    LeafSolid = 7,
    /// See-through leaves.
    LeafTransparent = 8,
    /// No chunk loaded at this position.
    Nothing = 9,
}

impl VoxelType {
    /// Number of voxel types.
    pub const COUNT: usize = 10;

    /// Every voxel type, in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Air,
        Self::Dirt,
        Self::Grass,
        Self::Sand,
        Self::Stone,
        Self::Water,
        Self::Wood,
        Self::LeafSolid,
        Self::LeafTransparent,
        Self::Nothing,
    ];

    /// Returns the discriminant as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true for empty space in a loaded chunk.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true for the unloaded marker.
    #[inline]
    #[must_use]
    pub const fn is_nothing(self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Returns true if the mesher never emits faces for this type.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Air | Self::Nothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_discriminants() {
        for (i, voxel) in VoxelType::ALL.iter().enumerate() {
            assert_eq!(voxel.index(), i, "{voxel:?} out of order");
        }
    }

    #[test]
    fn test_nothing_is_not_air() {
        assert!(VoxelType::Nothing.is_nothing());
        assert!(!VoxelType::Nothing.is_air());
        assert!(VoxelType::Nothing.is_empty());
        assert!(VoxelType::Air.is_empty());
        assert!(!VoxelType::Water.is_empty());
    }
}
