//! Headless runner for the animated holiday scene
//!
//! Loads or writes a scene configuration, assembles the scene with a seeded
//! layout and drives it through the headless backend.

mod cli;

use std::time::{Duration, Instant};

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use yuletide_engine::foundation::logging;
use yuletide_engine::prelude::*;

use cli::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_with_default(&args.log_level);

    if let Some(path) = &args.write_default_config {
        SceneConfig::default().save_to_file(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => SceneConfig::load_from_file(path)?,
        None => SceneConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Decoration seed: {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let backend = HeadlessBackend::new().with_viewport(Viewport::new(args.width, args.height));
    let mut engine = Engine::from_config(&config, &mut rng, backend)?;

    let summary = if args.realtime {
        run_paced(&mut engine, args.frames, args.fps)?
    } else {
        let mut clock = FixedStepClock::from_fps(args.fps);
        log::info!("Stepping {} frames at {:.4}s each", args.frames, clock.step());
        engine.run(&mut clock, args.frames)?
    };

    if let Some(stats) = engine.backend().last_stats() {
        log::info!(
            "Last frame: {} updates, {} instances ({} bytes), {} lights at total intensity {:.2}",
            stats.updated_nodes,
            stats.instances,
            stats.instance_bytes,
            stats.lights,
            stats.total_light_intensity
        );
    }
    println!(
        "Rendered {} frames ({:.2}s of scene time, seed {})",
        summary.frames,
        summary.end_time - summary.start_time,
        seed
    );
    Ok(())
}

/// Tick against the wall clock, sleeping out the rest of each frame
fn run_paced(
    engine: &mut Engine<HeadlessBackend>,
    frames: u64,
    fps: f32,
) -> Result<RunSummary, EngineError> {
    let frame_budget = if fps > 0.0 {
        Duration::from_secs_f32(1.0 / fps)
    } else {
        Duration::ZERO
    };

    let mut clock = RealTimeClock::new();
    let mut summary = RunSummary {
        frames: 0,
        start_time: 0.0,
        end_time: 0.0,
    };
    for index in 0..frames {
        let frame_start = Instant::now();
        let t = clock.tick();
        engine.tick(t)?;

        if index == 0 {
            summary.start_time = t;
        }
        summary.end_time = t;
        summary.frames += 1;

        if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    log::info!("Average frame rate: {:.1} fps", clock.average_fps());
    Ok(summary)
}
