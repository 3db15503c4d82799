//! Voxel world storage.
//!
//! Chunks keyed by their grid coordinate. World-space reads resolve the
//! owning chunk by floor division and answer `Nothing` where no chunk is
//! loaded.

use std::collections::HashMap;

use strata_core::{Chunk, ChunkCoord, ChunkDims, StrataError, StrataResult, VoxelSource, VoxelType};

/// Initial hash map capacity; a render distance of 8 holds 19x19 chunks.
const INITIAL_CHUNK_CAPACITY: usize = 512;

/// Voxel world containing multiple chunks.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    dims: ChunkDims,
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl VoxelWorld {
    /// Creates a new empty world.
    #[must_use]
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            chunks: HashMap::with_capacity(INITIAL_CHUNK_CAPACITY),
        }
    }

    /// Dimensions shared by every chunk.
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Gets a chunk by coordinate.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Gets a chunk mutably.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Returns true if a chunk is loaded at `coord`.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Inserts a chunk under its own coordinate, returning any chunk it replaced.
    ///
    /// # Panics
    ///
    /// Panics if the chunk's dimensions differ from the world's.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        assert_eq!(chunk.dims(), self.dims, "chunk {:?} has foreign dimensions", chunk.coord());
        self.chunks.insert(chunk.coord(), chunk)
    }

    /// Removes a chunk, returning it if it existed.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if no chunk is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of all loaded chunks, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// All loaded chunks, in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Number of chunks carrying player edits.
    #[must_use]
    pub fn modified_count(&self) -> usize {
        self.chunks.values().filter(|c| c.is_modified()).count()
    }

    /// Resolves a world position to its chunk and local coordinates.
    #[must_use]
    pub fn locate(&self, world: [i32; 3]) -> (ChunkCoord, [usize; 3]) {
        let coord = ChunkCoord::from_world(world, self.dims);
        let origin = coord.origin(self.dims);
        let local = [
            (world[0] - origin[0]) as usize,
            (world[1] - origin[1]) as usize,
            (world[2] - origin[2]) as usize,
        ];
        (coord, local)
    }

    /// Applies a player edit.
    ///
    /// Returns the edited chunk and local position, or `None` if no chunk
    /// is loaded there (the edit is dropped).
    ///
    /// # Errors
    ///
    /// Returns `UnloadedVoxelWrite` when `voxel` is `Nothing`.
    pub fn edit(&mut self, world: [i32; 3], voxel: VoxelType) -> StrataResult<Option<(ChunkCoord, [usize; 3])>> {
        if voxel.is_nothing() {
            return Err(StrataError::UnloadedVoxelWrite {
                x: world[0],
                y: world[1],
                z: world[2],
            });
        }

        let (coord, [x, y, z]) = self.locate(world);
        Ok(self.chunks.get_mut(&coord).map(|chunk| {
            chunk.edit(x, y, z, voxel);
            (coord, [x, y, z])
        }))
    }
}

impl VoxelSource for VoxelWorld {
    fn voxel_at(&self, world: [i32; 3]) -> VoxelType {
        let (coord, [x, y, z]) = self.locate(world);
        self.chunks
            .get(&coord)
            .map_or(VoxelType::Nothing, |chunk| chunk.get(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> VoxelWorld {
        VoxelWorld::new(ChunkDims::new(16, 100))
    }

    #[test]
    fn test_unloaded_reads_nothing() {
        let world = world();
        assert_eq!(world.voxel_at([0, 0, 0]), VoxelType::Nothing);
        assert_eq!(world.voxel_at([-500, 40, 9000]), VoxelType::Nothing);
    }

    #[test]
    fn test_locate_negative_positions() {
        let world = world();
        assert_eq!(world.locate([-1, 0, -16]), (ChunkCoord::new(-1, 0, -1), [15, 0, 0]));
        assert_eq!(world.locate([17, 250, 3]), (ChunkCoord::new(1, 2, 0), [1, 50, 3]));
    }

    #[test]
    fn test_reads_cross_into_loaded_chunk() {
        let mut world = world();
        let mut chunk = Chunk::new(ChunkCoord::new(-1, 0, 0), world.dims());
        chunk.set(15, 10, 0, VoxelType::Stone);
        world.insert(chunk);

        assert_eq!(world.voxel_at([-1, 10, 0]), VoxelType::Stone);
        assert_eq!(world.voxel_at([-2, 10, 0]), VoxelType::Air);
        assert_eq!(world.voxel_at([0, 10, 0]), VoxelType::Nothing);
    }

    #[test]
    fn test_edit_marks_modified() {
        let mut world = world();
        world.insert(Chunk::new(ChunkCoord::new(0, 0, 0), world.dims()));

        let edited = world.edit([3, 4, 5], VoxelType::Sand).unwrap();
        assert_eq!(edited, Some((ChunkCoord::new(0, 0, 0), [3, 4, 5])));
        assert_eq!(world.voxel_at([3, 4, 5]), VoxelType::Sand);
        assert_eq!(world.modified_count(), 1);
    }

    #[test]
    fn test_edit_without_chunk_is_noop() {
        let mut world = world();
        assert_eq!(world.edit([3, 4, 5], VoxelType::Sand), Ok(None));
        assert!(world.is_empty());
    }

    #[test]
    fn test_edit_rejects_nothing() {
        let mut world = world();
        world.insert(Chunk::new(ChunkCoord::new(0, 0, 0), world.dims()));

        let result = world.edit([1, 2, 3], VoxelType::Nothing);
        assert_eq!(result, Err(StrataError::UnloadedVoxelWrite { x: 1, y: 2, z: 3 }));
        assert_eq!(world.modified_count(), 0);
    }

    #[test]
    #[should_panic(expected = "foreign dimensions")]
    fn test_insert_rejects_mismatched_dims() {
        let mut world = world();
        world.insert(Chunk::new(ChunkCoord::default(), ChunkDims::new(8, 8)));
    }
}
