//! # STRATA World
//!
//! Chunk lifecycle around a moving reference point.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ring selection   ┌──────────────┐   meshes   ┌──────────┐
//! │ WorldStreamer│ ─────────────────▶ │  VoxelWorld  │ ─────────▶ │RenderHost│
//! │  (passes)    │   generate/evict   │ (chunk data) │  publish   │ (entities│
//! └──────────────┘                    └──────────────┘            │  meshes) │
//!        ▲                                                        └──────────┘
//!        │ StreamingTrigger: "reference left its chunk"
//! ```
//!
//! ## Core Components
//!
//! - `WorldConfig`: TOML configuration, validated at load
//! - `VoxelWorld`: chunk store; answers `Nothing` for unloaded positions
//! - `streaming`: pure ring selection and remesh scheduling
//! - `WorldStreamer`: streaming passes, edits, remeshing
//! - `RenderHost`: the entity/mesh seam, with an in-memory `HeadlessHost`
//! - `SharedStreamer`: lock-protected handle for off-thread streaming

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod host;
pub mod shared;
pub mod store;
pub mod streamer;
pub mod streaming;
pub mod trigger;

pub use config::{CatalogSection, RenderSection, TerrainSection, WorldConfig, WorldSection, MAX_RENDER_DISTANCE};
pub use host::{
    chunk_entity_name, ChunkRenderProxy, EntityHost, EntityId, HeadlessEntity, HeadlessHost, HeadlessMesh,
    MeshHost, MeshId, RenderHost, SubMesh,
};
pub use shared::SharedStreamer;
pub use store::VoxelWorld;
pub use streamer::{EditReport, StreamingReport, WorldStats, WorldStreamer};
pub use trigger::StreamingTrigger;
