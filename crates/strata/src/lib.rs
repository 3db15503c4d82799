//! # STRATA
//!
//! Procedural voxel worlds, streamed in chunks.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                              STRATA                               │
//! ├───────────────────────────────────────────────────────────────────┤
//! │                                                                   │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐         │
//! │  │  procedural  │───>│     core     │<───│   meshing    │         │
//! │  │              │    │              │    │              │         │
//! │  │ • Noise      │    │ • VoxelType  │    │ • Face cull  │         │
//! │  │ • Warp       │    │ • Catalog    │    │ • Atlas UVs  │         │
//! │  │ • Layers     │    │ • Chunk      │    │ • Sub-meshes │         │
//! │  └──────┬───────┘    └──────────────┘    └──────┬───────┘         │
//! │         │                                       │                 │
//! │         │            ┌──────────────┐           │                 │
//! │         └───────────>│    world     │<──────────┘                 │
//! │                      │              │                             │
//! │                      │ • Streaming  │───> RenderHost              │
//! │                      │ • Edits      │                             │
//! │                      │ • Config     │                             │
//! │                      └──────────────┘                             │
//! │                                                                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

// Re-export the crates
pub use strata_core as core;
pub use strata_meshing as meshing;
pub use strata_procedural as procedural;
pub use strata_world as world;

// Re-export commonly used types
pub use strata_core::{Chunk, ChunkCoord, ChunkDims, StrataError, StrataResult, VoxelCatalog, VoxelType};
pub use strata_meshing::{ChunkMesher, MeshData};
pub use strata_procedural::{TerrainGenerator, WorldSeed};
pub use strata_world::{
    HeadlessHost, RenderHost, SharedStreamer, StreamingTrigger, WorldConfig, WorldStreamer,
};
