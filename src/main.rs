//! Ring Bounce headless runner
//!
//! Steps a simulation at a fixed frame rate without a window and logs
//! energy and ring occupancy. Usage:
//!
//! ```text
//! ring-bounce [config.json] [seconds]
//! ```
//!
//! Prints the final body snapshot as JSON on stdout.

use std::process::ExitCode;

use ring_bounce::{FrameClock, SimConfig, Simulation};

/// Frame time fed to the clock (60 Hz display)
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 10.0;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Ring Bounce (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(s)) if s.is_finite() && s > 0.0 => s,
        Some(_) => {
            log::error!("Duration must be a positive number of seconds");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_SECONDS,
    };

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut clock = FrameClock::default();
    let frames = (seconds / FRAME_DT).ceil() as u32;
    let frames_per_report = (1.0 / FRAME_DT).round() as u32;

    for frame in 1..=frames {
        clock.advance(&mut sim, FRAME_DT);
        if frame % frames_per_report == 0 {
            report(&sim);
        }
    }

    match serde_json::to_string_pretty(&sim.bodies()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize bodies: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

/// Log energy and how many bodies sit in each ring layer
fn report(sim: &Simulation) {
    let mut layers = vec![0usize; sim.ring_count() + 1];
    for index in 0..sim.bodies.len() {
        match sim.enclosing_ring(index) {
            Some(ring) => layers[ring] += 1,
            None => layers[sim.ring_count()] += 1,
        }
    }

    log::info!(
        "t={:.1}s ticks={} energy={:.1} (kinetic {:.1}) layers(outer->inner, escaped last)={:?}",
        sim.elapsed,
        sim.time_ticks,
        sim.total_energy(),
        sim.kinetic_energy(),
        layers
    );
}
