//! # STRATA Meshing
//!
//! Face-culled meshes for voxel chunks.
//!
//! Each voxel emits one quad per exposed side. Opaque voxels are exposed
//! towards any non-solid neighbour (including unloaded space, so the edge
//! of the loaded world is closed); water is exposed only towards air and
//! goes into its own sub-mesh.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strata_core::VoxelCatalog;
//! use strata_meshing::ChunkMesher;
//!
//! let mesher = ChunkMesher::new(Arc::new(VoxelCatalog::default()));
//! let mesh = mesher.build(&chunk, &world);
//! host.upload(mesh.opaque.vertices(), &mesh.opaque.indices);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod face;
pub mod mesh;
pub mod mesher;

pub use face::face_corners;
pub use mesh::{ChunkVertex, MeshBuffer, MeshData, OPAQUE_MATERIAL, WATER_MATERIAL};
pub use mesher::ChunkMesher;
