//! # STRATA Procedural Generation
//!
//! Deterministic terrain for chunked voxel worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and seed offset always produce the same chunk
//! 2. **Chunked**: Terrain is generated one chunk at a time
//! 3. **Shareable**: Generators are immutable and `Sync`
//!
//! ## Core Components
//!
//! - `PerlinNoise`: 2D gradient noise and octave sampling
//! - `DomainWarp`: Coordinate displacement before height sampling
//! - `LayerChain`: First-match voxel assignment per column
//! - `BiomeSelector`: Terrain parameters per column
//! - `TerrainGenerator`: Fills chunks from all of the above
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{Chunk, ChunkCoord, ChunkDims};
//! use strata_procedural::{TerrainGenerator, WorldSeed};
//!
//! let generator = TerrainGenerator::new(WorldSeed::new(12345), 50);
//! let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), ChunkDims::new(16, 100));
//! generator.generate_chunk(&mut chunk, [0.0, 0.0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod generator;
pub mod layers;
pub mod noise;
pub mod warp;

pub use biome::{BiomeSelector, BiomeSettings};
pub use generator::{TerrainGenerator, DEFAULT_WATER_LEVEL};
pub use layers::{
    ColumnContext, LayerChain, LayerHandler, StoneLayer, StoneSettings, TreeLayer, TreeSettings,
};
pub use noise::{redistribute, remap, remap_unit, NoiseSettings, PerlinNoise, WorldSeed};
pub use warp::{DomainWarp, WarpSettings};
