//! Benchmark for streaming passes.
//!
//! Run with: cargo bench --package strata_world --bench streaming_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_world::{HeadlessHost, WorldConfig, WorldStreamer};

fn config(render_distance: u32) -> WorldConfig {
    let mut config = WorldConfig::default();
    config.world.render_distance = render_distance;
    config
}

fn benchmark_initial_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_pass");
    group.sample_size(10);

    for distance in [2, 4] {
        let config = config(distance);
        group.bench_function(format!("render_distance_{distance}"), |b| {
            b.iter(|| {
                let mut streamer = WorldStreamer::new(&config, HeadlessHost::new()).unwrap();
                black_box(streamer.recompute_around([0.0, 60.0, 0.0]).unwrap())
            });
        });
    }
    group.finish();
}

fn benchmark_step_pass(c: &mut Criterion) {
    // One chunk step: a new row of data and render chunks.
    let config = config(4);
    let mut streamer = WorldStreamer::new(&config, HeadlessHost::new()).unwrap();
    let mut x = 0.0_f32;
    streamer.recompute_around([x, 60.0, 0.0]).unwrap();

    let mut group = c.benchmark_group("step_pass");
    group.sample_size(20);
    group.bench_function("render_distance_4", |b| {
        b.iter(|| {
            x += 16.0;
            black_box(streamer.recompute_around([x, 60.0, 0.0]).unwrap())
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_initial_pass, benchmark_step_pass);
criterion_main!(benches);
