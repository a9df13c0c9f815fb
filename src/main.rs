//! Asteroid Arena headless driver
//!
//! Runs the simulation for a fixed number of ticks with a scripted pilot and
//! logs what happens. Pass a JSON settings file as the first argument to
//! override the defaults; `RUST_LOG` controls verbosity.

use std::process::ExitCode;

use asteroid_arena::consts::SIM_DT;
use asteroid_arena::{Settings, TickInput, World, tick};

/// Ticks to simulate (one minute of game time)
const RUN_TICKS: u64 = 60 * 30;
/// Ticks per simulated second
const TICKS_PER_SECOND: u64 = 30;

/// Scripted pilot: sweep the nose back and forth, holding fire
fn scripted_input(tick_index: u64, rotation_step: i32) -> TickInput {
    let phase = (tick_index / 45) % 4;
    let rotate = match phase {
        0 | 3 => -rotation_step,
        _ => rotation_step,
    };
    TickInput {
        rotate: if tick_index % 3 == 0 { rotate } else { 0 },
        fire: true,
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let rotation_step = settings.ship.rotation_step;
    let mut world = World::new(settings);
    let mut destroyed = 0usize;
    let mut culled = 0usize;

    log::info!("Asteroid Arena running for {} ticks", RUN_TICKS);
    for i in 0..RUN_TICKS {
        let input = scripted_input(i, rotation_step);
        let summary = tick(&mut world, &input, SIM_DT);
        destroyed += summary.collisions.removed.len();
        culled += summary.culled.len();

        if (i + 1) % TICKS_PER_SECOND == 0 {
            let snapshot = world.snapshot();
            let vertices: usize = snapshot.iter().map(|item| item.vertices.len()).sum();
            log::info!(
                "t={}s entities={} vertices={} destroyed={} culled={}",
                (i + 1) / TICKS_PER_SECOND,
                world.entity_count(),
                vertices,
                destroyed,
                culled
            );
        }
    }

    match world.ship() {
        Some(ship) => log::info!(
            "Done: ship heading {} hit={} after {} ticks",
            ship.heading_angle,
            ship.hit,
            world.elapsed_ticks()
        ),
        None => log::warn!("Done: ship left the arena"),
    }
    ExitCode::SUCCESS
}
