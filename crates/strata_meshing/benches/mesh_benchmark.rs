//! Benchmark for chunk meshing performance.
//!
//! Run with: cargo bench --package strata_meshing --bench mesh_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_core::{Chunk, ChunkCoord, ChunkDims, VoxelType};
use strata_meshing::ChunkMesher;
use strata_procedural::{TerrainGenerator, WorldSeed};

const DIMS: ChunkDims = ChunkDims::new(16, 100);

fn generated_chunk(coord: ChunkCoord) -> Chunk {
    let generator = TerrainGenerator::new(WorldSeed::new(42), 50);
    let mut chunk = Chunk::new(coord, DIMS);
    generator.generate_chunk(&mut chunk, [0.0, 0.0]);
    chunk
}

fn benchmark_terrain_chunk(c: &mut Criterion) {
    let mesher = ChunkMesher::default();
    let chunk = generated_chunk(ChunkCoord::new(0, 0, 0));

    let mut group = c.benchmark_group("mesh_terrain");
    group.throughput(Throughput::Elements(DIMS.volume() as u64));
    group.bench_function("16x100x16_generated", |b| {
        b.iter(|| black_box(mesher.build(black_box(&chunk), &chunk)));
    });
    group.finish();
}

fn benchmark_checkerboard(c: &mut Criterion) {
    // Worst case: every voxel exposes all six faces.
    let mesher = ChunkMesher::default();
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), DIMS);
    for index in 0..DIMS.volume() {
        let [x, y, z] = chunk.position_from_index(index);
        if (x + y + z) % 2 == 0 {
            chunk.set(x, y, z, VoxelType::Stone);
        }
    }

    c.bench_function("mesh_checkerboard_worst_case", |b| {
        b.iter(|| black_box(mesher.build(black_box(&chunk), &chunk)));
    });
}

criterion_group!(benches, benchmark_terrain_chunk, benchmark_checkerboard);
criterion_main!(benches);
