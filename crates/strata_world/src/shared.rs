//! Shared streamer handle.
//!
//! For hosts that stream on a worker thread while another thread reads
//! voxels. Passes and edits take the write lock for their whole duration,
//! so readers never see a half-applied pass.

use std::sync::Arc;

use parking_lot::RwLock;
use strata_core::{ChunkCoord, StrataResult, VoxelType};

use crate::host::RenderHost;
use crate::streamer::{EditReport, StreamingReport, WorldStats, WorldStreamer};

/// Cloneable, thread-safe handle to a [`WorldStreamer`].
pub struct SharedStreamer<H: RenderHost> {
    inner: Arc<RwLock<WorldStreamer<H>>>,
}

impl<H: RenderHost> Clone for SharedStreamer<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: RenderHost> SharedStreamer<H> {
    /// Wraps a streamer.
    #[must_use]
    pub fn new(streamer: WorldStreamer<H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(streamer)),
        }
    }

    /// Voxel at a world position; `Nothing` where no chunk is loaded.
    #[must_use]
    pub fn voxel_at(&self, world: [i32; 3]) -> VoxelType {
        self.inner.read().voxel_at(world)
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_chunks(&self) -> usize {
        self.inner.read().loaded_chunks()
    }

    /// Centre chunk of the last pass.
    #[must_use]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.inner.read().center()
    }

    /// Cumulative counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.inner.read().stats()
    }

    /// See [`WorldStreamer::recompute_around`].
    ///
    /// # Errors
    ///
    /// As [`WorldStreamer::recompute_around`].
    pub fn recompute_around(&self, position: [f32; 3]) -> StrataResult<StreamingReport> {
        self.inner.write().recompute_around(position)
    }

    /// See [`WorldStreamer::set_voxel`].
    ///
    /// # Errors
    ///
    /// As [`WorldStreamer::set_voxel`].
    pub fn set_voxel(&self, world: [i32; 3], voxel: VoxelType) -> StrataResult<Option<EditReport>> {
        self.inner.write().set_voxel(world, voxel)
    }

    /// Runs `f` with shared access to the streamer.
    pub fn read<R>(&self, f: impl FnOnce(&WorldStreamer<H>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the streamer.
    pub fn write<R>(&self, f: impl FnOnce(&mut WorldStreamer<H>) -> R) -> R {
        f(&mut self.inner.write())
    }
}
