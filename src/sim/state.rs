//! Simulation state
//!
//! `Simulation` exclusively owns the rings and bodies for its lifetime. Rings
//! are stored outermost first, all centered on the origin.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodySnapshot};
use super::collision::ContactParams;
use super::geometry::Segment;
use super::ring::Ring;
use crate::config::SimConfig;
use crate::consts::RING_SIDES;
use crate::error::ConfigError;
use crate::polar_to_cartesian;

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete simulation state (deterministic for a given config)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    config: SimConfig,
    pub rng_state: RngState,
    /// Boundary rings, outermost first
    pub rings: Vec<Ring>,
    /// Bodies, sorted by id
    pub bodies: Vec<Body>,
    /// Ticks stepped since construction or reset
    pub time_ticks: u64,
    /// Simulated seconds since construction or reset
    pub elapsed: f64,
}

impl Simulation {
    /// Validate the config, build the rings and spawn the bodies
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sim = Self {
            rng_state: RngState::new(config.seed),
            config,
            rings: Vec::new(),
            bodies: Vec::new(),
            time_ticks: 0,
            elapsed: 0.0,
        };
        sim.build();

        log::info!(
            "Simulation ready: {} rings, {} bodies, seed {}",
            sim.rings.len(),
            sim.bodies.len(),
            sim.config.seed
        );
        Ok(sim)
    }

    /// Rebuild rings and bodies from the current config and seed
    fn build(&mut self) {
        let mut rng = self.rng_state.to_rng();
        self.rings = build_rings(&self.config, &mut rng);
        self.bodies = spawn_bodies(&self.config, &self.rings, &mut rng);
        self.time_ticks = 0;
        self.elapsed = 0.0;
    }

    /// Apply a new configuration between ticks
    ///
    /// Tunables (gravity, damping, restitution, coupling, angular velocities,
    /// body collisions) are applied in place. Any change to rings, bodies or
    /// seed rebuilds the simulation.
    pub fn configure(&mut self, config: SimConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if self.config.same_topology(&config) {
            for (index, ring) in self.rings.iter_mut().enumerate() {
                ring.angular_vel = config.angular_velocity_for(index);
            }
            self.config = config;
            log::info!("Simulation retuned in place");
        } else {
            self.rng_state = RngState::new(config.seed);
            self.config = config;
            self.build();
            log::info!(
                "Simulation rebuilt: {} rings, {} bodies",
                self.rings.len(),
                self.bodies.len()
            );
        }
        Ok(())
    }

    /// Restart from the current config and seed
    pub fn reset(&mut self) {
        self.build();
        log::info!("Simulation reset (seed {})", self.config.seed);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub(crate) fn contact_params(&self) -> ContactParams {
        ContactParams {
            restitution: self.config.restitution,
            wall_coupling: self.config.wall_coupling,
        }
    }

    /// Shared ring center
    pub fn center(&self) -> Vec2 {
        self.rings.first().map(|r| r.center).unwrap_or(Vec2::ZERO)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Render snapshot of every body
    pub fn bodies(&self) -> Vec<BodySnapshot> {
        self.bodies.iter().map(BodySnapshot::from).collect()
    }

    /// Active edges of one ring (0 = outermost), `None` if out of range
    pub fn ring_edges(&self, ring_index: usize) -> Option<Vec<Segment>> {
        self.rings.get(ring_index).map(Ring::active_edges)
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Gravitational potential energy measured from the ring center
    pub fn potential_energy(&self) -> f32 {
        let center = self.center();
        self.bodies
            .iter()
            .map(|b| b.potential_energy(self.config.gravity, center))
            .sum()
    }

    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy() + self.potential_energy()
    }

    /// Index of the innermost ring that still contains the body's center
    /// (outermost = 0), by distance from the shared center
    pub fn enclosing_ring(&self, body_index: usize) -> Option<usize> {
        let body = self.bodies.get(body_index)?;
        let r = (body.pos - self.center()).length();
        self.rings.iter().rposition(|ring| r < ring.apothem())
    }
}

/// Rings outermost first; the outermost ring is closed unless gaps are given
fn build_rings(config: &SimConfig, rng: &mut Pcg32) -> Vec<Ring> {
    let radii = config.resolved_ring_radii();

    radii
        .iter()
        .enumerate()
        .map(|(index, &radius)| {
            let gap = match &config.missing_edges {
                Some(edges) => edges[index],
                None if index == 0 => None,
                None => Some(rng.random_range(0..RING_SIDES)),
            };
            let angle = if config.randomize_ring_angles {
                rng.random_range(0.0..std::f32::consts::TAU)
            } else {
                0.0
            };

            if index == 0 && gap.is_some() {
                log::warn!("Outermost ring has a gap, bodies can escape");
            }
            if radius <= config.body_radius {
                log::warn!(
                    "Ring {} (radius {}) is not larger than the body radius {}",
                    index,
                    radius,
                    config.body_radius
                );
            }

            Ring::new(Vec2::ZERO, radius, config.angular_velocity_for(index), gap)
                .with_angle(angle)
        })
        .collect()
}

/// Spawn bodies at random points near the innermost ring's center
fn spawn_bodies(config: &SimConfig, rings: &[Ring], rng: &mut Pcg32) -> Vec<Body> {
    let Some(innermost) = rings.last() else {
        return Vec::new();
    };
    let clear = (innermost.apothem() - config.body_radius).max(0.0);
    let spawn_radius = clear * config.spawn_fraction;
    let speed = config.initial_speed;
    let mass = config.body_mass();

    (0..config.body_count)
        .map(|i| {
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            // sqrt keeps the spawn density uniform over the disk
            let r = spawn_radius * rng.random_range(0.0f32..=1.0).sqrt();
            let pos = innermost.center + polar_to_cartesian(r, theta);
            let vel = Vec2::new(
                rng.random_range(-speed..=speed),
                rng.random_range(-speed..=speed),
            );
            Body::new(i as u32, pos, vel, config.body_radius, mass)
        })
        .collect()
}
