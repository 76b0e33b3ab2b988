//! Simulation tick
//!
//! One tick: rotate rings, integrate bodies, resolve walls per body, then
//! resolve body pairs. Rings never read body state, so their motion is the
//! same whatever the bodies do.

use super::collision::{resolve_body_collisions, resolve_wall_collisions};
use super::state::Simulation;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Wall contacts resolved across all bodies
    pub wall_contacts: usize,
    /// Overlapping body pairs resolved
    pub body_contacts: usize,
}

/// Advance the simulation by `dt` seconds
///
/// Non-positive or non-finite `dt` leaves the state untouched.
pub fn tick(sim: &mut Simulation, dt: f32) -> TickStats {
    let mut stats = TickStats::default();
    if !(dt.is_finite() && dt > 0.0) {
        return stats;
    }

    for ring in &mut sim.rings {
        ring.advance(dt);
    }

    let gravity = sim.config().gravity;
    let damping = sim.config().damping;
    let params = sim.contact_params();

    for body in &mut sim.bodies {
        body.integrate(dt, gravity, damping);
        stats.wall_contacts += resolve_wall_collisions(body, &sim.rings, params).len();
    }

    if sim.config().body_collisions {
        stats.body_contacts = resolve_body_collisions(&mut sim.bodies, params.restitution);
    }

    sim.time_ticks += 1;
    sim.elapsed += f64::from(dt);
    stats
}

impl Simulation {
    /// Advance the whole simulation by one tick of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        tick(self, dt);
    }
}

/// Fixed-timestep accumulator turning frame times into whole ticks
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FrameClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Feed one frame's elapsed time and run the ticks it covers
    ///
    /// Returns the number of ticks run. When the substep cap is hit the
    /// backlog is dropped so a slow frame can't snowball.
    pub fn advance(&mut self, sim: &mut Simulation, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            tick(sim, self.step);
            self.accumulator -= self.step;
            substeps += 1;
        }

        if substeps == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator %= self.step;
        }
        substeps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
