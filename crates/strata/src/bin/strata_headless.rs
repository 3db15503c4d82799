//! # STRATA Headless
//!
//! Streams a world without a renderer:
//!
//! 1. Load `config/world.toml` (or the path given as the first argument)
//! 2. Preload the fixed map around the origin
//! 3. Place the reference at the spawn point
//! 4. Walk east, letting the trigger decide when to stream
//! 5. Dig a hole at the last position and report the remesh
//!
//! Usage: `strata_headless [config.toml]`

use std::process::ExitCode;
use std::time::Instant;

use strata::{HeadlessHost, StrataResult, StreamingTrigger, VoxelType, WorldConfig, WorldStreamer};

const DEFAULT_CONFIG: &str = "config/world.toml";

/// Simulated frame time.
const FRAME_SECONDS: f32 = 1.0 / 30.0;

/// Walking speed in voxels per second.
const WALK_SPEED: f32 = 6.0;

/// Simulated walk length.
const WALK_SECONDS: f32 = 20.0;

fn main() -> ExitCode {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    STRATA HEADLESS v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let config = match WorldConfig::from_path(&path) {
        Ok(config) => {
            println!("  Config:   {path} ✓");
            config
        }
        Err(e) => {
            eprintln!("  ✗ FATAL: {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  ✗ FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &WorldConfig) -> StrataResult<()> {
    let world = &config.world;
    println!(
        "  Chunks:   {}x{}x{}, render distance {}",
        world.chunk_size, world.chunk_height, world.chunk_size, world.render_distance
    );
    println!("  Seed:     {:#x}, offset {:?}", world.seed.value(), world.seed_offset);
    println!();

    let mut streamer = WorldStreamer::new(config, HeadlessHost::new())?;

    // === PRELOAD ===
    let start = Instant::now();
    let map = streamer.generate_fixed_map(streamer.map_size());
    println!(
        "🏗️  Preloaded {} chunks, {} meshes in {:.1} ms",
        map.data_created,
        map.render_created,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let Some(spawn) = streamer.spawn_point() else {
        eprintln!("  ✗ No ground under the spawn column");
        return Ok(());
    };
    println!("   ✓ Spawn at ({:.1}, {:.1}, {:.1})", spawn[0], spawn[1], spawn[2]);

    // === WALK ===
    let mut trigger = StreamingTrigger::new(config.dims(), world.detection_interval);
    let mut position = spawn;
    let mut passes = 0;
    let frames = (WALK_SECONDS / FRAME_SECONDS) as u32;

    for _ in 0..frames {
        position[0] += WALK_SPEED * FRAME_SECONDS;
        if trigger.tick(FRAME_SECONDS, position) {
            let start = Instant::now();
            let report = streamer.recompute_around(position)?;
            passes += 1;
            println!(
                "   → pass {passes:>2} at {:?}: +{} / -{} chunks, +{} / -{} meshes ({:.1} ms)",
                report.center,
                report.data_created,
                report.data_evicted,
                report.render_created,
                report.render_destroyed,
                start.elapsed().as_secs_f64() * 1000.0
            );
        }
    }

    // === EDIT ===
    let column = [position[0].floor() as i32, position[2].floor() as i32];
    if let Some(ground) = streamer.ground_height(column[0], column[1]) {
        let target = [column[0], ground, column[1]];
        if let Some(edit) = streamer.set_voxel(target, VoxelType::Air)? {
            println!();
            println!("⛏️  Dug {target:?} in {:?}, remeshed {:?}", edit.coord, edit.remeshed);
        }
    }

    // === SUMMARY ===
    let stats = streamer.stats();
    let host = streamer.host();
    println!();
    println!("📊 Summary");
    println!("   Passes:          {}", stats.passes);
    println!("   Loaded chunks:   {}", streamer.loaded_chunks());
    println!("   Modified chunks: {}", streamer.world().modified_count());
    println!("   Generated:       {}", stats.chunks_generated);
    println!("   Evicted:         {}", stats.chunks_evicted);
    println!("   Meshes built:    {} (+{} rebuilt)", stats.meshes_built, stats.meshes_rebuilt);
    println!("   Host entities:   {}", host.entity_count());
    println!("   Host triangles:  {}", host.triangle_count());

    Ok(())
}
