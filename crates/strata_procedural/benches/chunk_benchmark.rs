//! Benchmark for chunk generation performance.
//!
//! Run with: cargo bench --package strata_procedural --bench chunk_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_core::{Chunk, ChunkCoord, ChunkDims};
use strata_procedural::{TerrainGenerator, WorldSeed};

const DIMS: ChunkDims = ChunkDims::new(16, 100);

fn benchmark_single_chunk(c: &mut Criterion) {
    let generator = TerrainGenerator::new(WorldSeed::new(42), 50);

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let mut chunk = Chunk::new(ChunkCoord::new(coord, 0, coord / 2), DIMS);
            generator.generate_chunk(&mut chunk, [0.0, 0.0]);
            black_box(chunk)
        });
    });
}

fn benchmark_render_ring(c: &mut Criterion) {
    let generator = TerrainGenerator::new(WorldSeed::new(42), 50);

    // Data ring of radius 9: 19x19 chunks.
    let mut group = c.benchmark_group("chunk_ring");
    group.sample_size(10);
    group.throughput(Throughput::Elements(19 * 19));
    group.bench_function("19x19_chunks", |b| {
        b.iter(|| {
            for z in -9..=9 {
                for x in -9..=9 {
                    let mut chunk = Chunk::new(ChunkCoord::new(x, 0, z), DIMS);
                    generator.generate_chunk(&mut chunk, [0.0, 0.0]);
                    black_box(chunk);
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_chunk, benchmark_render_ring);
criterion_main!(benches);
