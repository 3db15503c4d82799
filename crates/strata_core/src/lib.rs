//! # Strata Core
//!
//! The vocabulary shared by every other Strata crate.
//!
//! ## Core Components
//!
//! - `VoxelType`: the tag stored in every grid cell
//! - `Direction`: the six axis-aligned face directions
//! - `VoxelCatalog`: atlas tiles and solidity per voxel type
//! - `Chunk`: a fixed-size voxel grid with a flat index layout
//! - `VoxelSource`: world-level voxel lookup used for cross-chunk neighbours
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{Chunk, ChunkCoord, ChunkDims, VoxelType};
//!
//! let dims = ChunkDims::new(16, 100);
//! let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), dims);
//! chunk.set(8, 40, 8, VoxelType::Stone);
//! assert_eq!(chunk.get(8, 40, 8), VoxelType::Stone);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod catalog;
pub mod chunk;
pub mod direction;
pub mod error;
pub mod voxel;

pub use catalog::{CatalogEntry, CatalogOverride, TileCoord, VoxelCatalog};
pub use chunk::{Chunk, ChunkCoord, ChunkDims, VoxelSource};
pub use direction::Direction;
pub use error::{StrataError, StrataResult};
pub use voxel::VoxelType;
