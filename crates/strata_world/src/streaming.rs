//! # Ring Selection
//!
//! Pure set arithmetic for one streaming pass. Nothing here touches the
//! host or mutates the world; the streamer feeds the results into its
//! create/destroy steps.
//!
//! Rings are square (Chebyshev) on the X/Z chunk grid at chunk layer
//! `y = 0`. The data ring has radius `R + 1` and the render ring radius
//! `R`, so every rendered chunk has all four horizontal neighbours loaded
//! for boundary face culling.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use strata_core::{ChunkCoord, ChunkDims, Direction};

use crate::store::VoxelWorld;

/// Chunk containing `position`, flattened onto the streamed layer.
#[must_use]
pub fn center_chunk(position: [f32; 3], dims: ChunkDims) -> ChunkCoord {
    let size = dims.size_xz as f32;
    ChunkCoord::new(
        (position[0] / size).floor() as i32,
        0,
        (position[2] / size).floor() as i32,
    )
}

/// True if every chunk of a ring of `radius` around `position`, voxels
/// included, has world coordinates that fit in `i32`.
#[must_use]
pub fn ring_in_range(position: [f32; 3], dims: ChunkDims, radius: u32) -> bool {
    let size = dims.size_xz as f64;
    // The far corner of the outermost chunk is `radius + 1` chunks from the centre.
    let limit = f64::from(i32::MAX) / size - f64::from(radius) - 1.0;
    [position[0], position[2]]
        .iter()
        .all(|v| (f64::from(*v) / size).floor().abs() <= limit)
}

/// All chunk coordinates within Chebyshev `radius` of `center` on X/Z.
#[must_use]
pub fn ring(center: ChunkCoord, radius: u32) -> Vec<ChunkCoord> {
    let r = radius as i32;
    let side = (2 * radius as usize) + 1;
    let mut coords = Vec::with_capacity(side * side);
    for dz in -r..=r {
        for dx in -r..=r {
            coords.push(center.offset(dx, 0, dz));
        }
    }
    coords
}

/// Squared distance from `position` to the origin of `coord`.
fn origin_distance_sq(position: [f32; 3], coord: ChunkCoord, dims: ChunkDims) -> f64 {
    let origin = coord.origin(dims);
    (0..3)
        .map(|axis| {
            let d = f64::from(origin[axis]) - f64::from(position[axis]);
            d * d
        })
        .sum()
}

/// Sorts nearest first, breaking ties by coordinate.
fn sort_by_distance(coords: &mut [ChunkCoord], position: [f32; 3], dims: ChunkDims) {
    coords.sort_by(|a, b| {
        origin_distance_sq(position, *a, dims)
            .partial_cmp(&origin_distance_sq(position, *b, dims))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    });
}

/// Needed chunk positions with no data yet, nearest first.
#[must_use]
pub fn select_data_to_create(needed: &[ChunkCoord], world: &VoxelWorld, position: [f32; 3]) -> Vec<ChunkCoord> {
    let mut creates: Vec<ChunkCoord> = needed.iter().copied().filter(|c| !world.contains(*c)).collect();
    sort_by_distance(&mut creates, position, world.dims());
    creates
}

/// Needed render positions with no proxy yet, nearest first.
#[must_use]
pub fn select_render_to_create<P>(
    needed: &[ChunkCoord],
    proxies: &HashMap<ChunkCoord, P>,
    position: [f32; 3],
    dims: ChunkDims,
) -> Vec<ChunkCoord> {
    let mut creates: Vec<ChunkCoord> = needed.iter().copied().filter(|c| !proxies.contains_key(c)).collect();
    sort_by_distance(&mut creates, position, dims);
    creates
}

/// Loaded chunks outside the data ring that carry no player edits.
///
/// Sorted by coordinate so evictions happen in a stable order.
#[must_use]
pub fn select_unneeded_data(needed: &HashSet<ChunkCoord>, world: &VoxelWorld) -> Vec<ChunkCoord> {
    let mut unneeded: Vec<ChunkCoord> = world
        .chunks()
        .filter(|chunk| !needed.contains(&chunk.coord()) && !chunk.is_modified())
        .map(|chunk| chunk.coord())
        .collect();
    unneeded.sort_unstable();
    unneeded
}

/// Proxies outside the render ring. Edits do not keep a proxy alive.
#[must_use]
pub fn select_unneeded_render<P>(needed: &HashSet<ChunkCoord>, proxies: &HashMap<ChunkCoord, P>) -> Vec<ChunkCoord> {
    let mut unneeded: Vec<ChunkCoord> = proxies.keys().copied().filter(|c| !needed.contains(c)).collect();
    unneeded.sort_unstable();
    unneeded
}

/// Existing proxies sharing a face with a newly created chunk, sorted.
///
/// Their boundary faces were meshed against unloaded space and must be
/// rebuilt now that the neighbour has data.
#[must_use]
pub fn stale_neighbours<P>(created: &[ChunkCoord], proxies: &HashMap<ChunkCoord, P>) -> Vec<ChunkCoord> {
    let fresh: HashSet<ChunkCoord> = created.iter().copied().collect();
    let mut stale: Vec<ChunkCoord> = created
        .iter()
        .flat_map(|coord| {
            Direction::ALL.into_iter().map(move |dir| {
                let [dx, dy, dz] = dir.offset();
                coord.offset(dx, dy, dz)
            })
        })
        .filter(|n| proxies.contains_key(n) && !fresh.contains(n))
        .collect();
    stale.sort_unstable();
    stale.dedup();
    stale
}

/// Chunks to rebuild after an edit at `local` inside `coord`.
///
/// Every neighbour sharing the edited voxel's face comes first (local
/// coordinate 0 or max on an axis), the edited chunk itself last.
#[must_use]
pub fn remesh_targets(coord: ChunkCoord, local: [usize; 3], dims: ChunkDims) -> Vec<ChunkCoord> {
    let max = [dims.size_xz - 1, dims.height - 1, dims.size_xz - 1];
    let mut targets = Vec::with_capacity(4);

    for axis in 0..3 {
        // A one-voxel axis touches both neighbours.
        for (edge, dir) in [(0, -1), (max[axis], 1)] {
            if local[axis] == edge {
                let mut step = [0; 3];
                step[axis] = dir;
                targets.push(coord.offset(step[0], step[1], step[2]));
            }
        }
    }

    targets.push(coord);
    targets
}
