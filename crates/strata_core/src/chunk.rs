//! # Chunk Store
//!
//! World data is organized into fixed-size chunks:
//! - `size_xz` voxels along X and Z
//! - `height` voxels along Y
//!
//! ## Layout
//!
//! Voxels live in one flat array indexed as
//! `x + size_xz * y + size_xz * height * z`.
//!
//! Chunks do not point back at the world that owns them. A chunk carries
//! its own `ChunkCoord`, which is the key under which the world stores it;
//! cross-chunk lookups go through a `VoxelSource` passed in by the caller.

use crate::voxel::VoxelType;

/// Chunk dimensions shared by every chunk of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDims {
    /// Width and depth in voxels.
    pub size_xz: usize,
    /// Height in voxels.
    pub height: usize,
}

impl ChunkDims {
    /// Creates chunk dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub const fn new(size_xz: usize, height: usize) -> Self {
        assert!(size_xz > 0 && height > 0, "chunk dimensions must be non-zero");
        Self { size_xz, height }
    }

    /// Total voxels per chunk.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> usize {
        self.size_xz * self.size_xz * self.height
    }

    /// Width/depth as a signed world distance.
    #[inline]
    #[must_use]
    pub const fn size_i32(self) -> i32 {
        self.size_xz as i32
    }

    /// Height as a signed world distance.
    #[inline]
    #[must_use]
    pub const fn height_i32(self) -> i32 {
        self.height as i32
    }
}

/// Chunk coordinate (identifies a chunk in the world grid).
///
/// Measured in chunks, not voxels: the chunk's world origin is
/// `(x * size_xz, y * height, z * size_xz)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks).
    pub x: i32,
    /// Y coordinate (in chunk layers).
    pub y: i32,
    /// Z coordinate (in chunks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts a world voxel position to the coordinate of its chunk.
    #[inline]
    #[must_use]
    pub const fn from_world(world: [i32; 3], dims: ChunkDims) -> Self {
        Self {
            x: world[0].div_euclid(dims.size_i32()),
            y: world[1].div_euclid(dims.height_i32()),
            z: world[2].div_euclid(dims.size_i32()),
        }
    }

    /// Returns the world position of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn origin(self, dims: ChunkDims) -> [i32; 3] {
        [
            self.x * dims.size_i32(),
            self.y * dims.height_i32(),
            self.z * dims.size_i32(),
        ]
    }

    /// Returns the coordinate shifted by a chunk offset.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Chebyshev distance on the X/Z plane.
    #[inline]
    #[must_use]
    pub fn planar_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Anything that can answer "which voxel is at this world position".
///
/// Positions without a loaded chunk answer `VoxelType::Nothing`.
pub trait VoxelSource {
    /// Returns the voxel at a world position.
    fn voxel_at(&self, world: [i32; 3]) -> VoxelType;
}

/// A chunk of world data.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    coord: ChunkCoord,
    dims: ChunkDims,
    voxels: Box<[VoxelType]>,
    modified: bool,
}

impl Chunk {
    /// Creates a new chunk filled with air.
    #[must_use]
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            dims,
            voxels: vec![VoxelType::Air; dims.volume()].into_boxed_slice(),
            modified: false,
        }
    }

    /// Chunk position in the world grid.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Chunk dimensions.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// World position of the origin corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> [i32; 3] {
        self.coord.origin(self.dims)
    }

    /// Whether a player edit touched this chunk since it was generated.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Raw voxel data in index order.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[VoxelType] {
        &self.voxels
    }

    /// Flat index of a local position.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the chunk.
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let ChunkDims { size_xz, height } = self.dims;
        assert!(
            x < size_xz && y < height && z < size_xz,
            "local position ({x}, {y}, {z}) outside chunk {size_xz}x{height}x{size_xz}"
        );
        x + size_xz * y + size_xz * height * z
    }

    /// Local position of a flat index.
    ///
    /// # Panics
    ///
    /// Panics if the index is outside the chunk.
    #[inline]
    #[must_use]
    pub fn position_from_index(&self, index: usize) -> [usize; 3] {
        assert!(index < self.voxels.len(), "index {index} outside chunk");
        let ChunkDims { size_xz, height } = self.dims;
        [index % size_xz, (index / size_xz) % height, index / (size_xz * height)]
    }

    /// Returns true if a signed local position lies inside the grid.
    #[inline]
    #[must_use]
    pub fn contains_local(&self, x: i32, y: i32, z: i32) -> bool {
        let (size, height) = (self.dims.size_i32(), self.dims.height_i32());
        (0..size).contains(&x) && (0..height).contains(&y) && (0..size).contains(&z)
    }

    /// Gets a voxel at local coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the chunk.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelType {
        self.voxels[self.index(x, y, z)]
    }

    /// Gets a voxel at signed local coordinates, `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn get_local(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
        if self.contains_local(x, y, z) {
            Some(self.get(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Sets a voxel without marking the chunk as modified.
    ///
    /// Used by terrain generation.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the chunk or `voxel` is `Nothing`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelType) {
        assert!(!voxel.is_nothing(), "the unloaded marker cannot be stored in a chunk");
        let index = self.index(x, y, z);
        self.voxels[index] = voxel;
    }

    /// Applies a player edit and marks the chunk as modified.
    ///
    /// # Panics
    ///
    /// Same conditions as [`Chunk::set`].
    #[inline]
    pub fn edit(&mut self, x: usize, y: usize, z: usize, voxel: VoxelType) {
        self.set(x, y, z, voxel);
        self.modified = true;
    }

    /// Converts a world position into this chunk's local coordinates.
    #[must_use]
    pub fn world_to_local(&self, world: [i32; 3]) -> Option<[usize; 3]> {
        let origin = self.origin();
        let (x, y, z) = (world[0] - origin[0], world[1] - origin[1], world[2] - origin[2]);
        self.contains_local(x, y, z)
            .then(|| [x as usize, y as usize, z as usize])
    }

    /// Converts local coordinates into a world position.
    #[inline]
    #[must_use]
    pub fn local_to_world(&self, x: usize, y: usize, z: usize) -> [i32; 3] {
        let origin = self.origin();
        [origin[0] + x as i32, origin[1] + y as i32, origin[2] + z as i32]
    }

    /// Counts voxels of a given type.
    #[must_use]
    pub fn count(&self, voxel: VoxelType) -> usize {
        self.voxels.iter().filter(|&&v| v == voxel).count()
    }
}

/// A lone chunk: everything outside of it is unloaded.
impl VoxelSource for Chunk {
    fn voxel_at(&self, world: [i32; 3]) -> VoxelType {
        self.world_to_local(world)
            .map_or(VoxelType::Nothing, |[x, y, z]| self.get(x, y, z))
    }
}
