//! Simulation configuration
//!
//! A plain value handed to [`crate::sim::Simulation`] at construction, so
//! independent simulations can coexist. Loadable from partial JSON files:
//! missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable parameters for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Physics ===
    /// Downward acceleration (units/s², +y is down)
    pub gravity: f32,
    /// Per-tick velocity multiplier applied after displacement
    pub damping: f32,
    /// Fraction of normal relative velocity kept after a bounce
    pub restitution: f32,
    /// Fraction of the wall's tangential surface velocity added on contact
    pub wall_coupling: f32,
    /// Resolve overlaps between bodies
    pub body_collisions: bool,

    // === Rings ===
    pub ring_count: usize,
    /// Explicit radii, outermost first. Empty derives them from
    /// `outer_ring_radius * ring_scale^i`.
    pub ring_radii: Vec<f32>,
    pub outer_ring_radius: f32,
    pub ring_scale: f32,
    /// Radians per second, cycled when shorter than the ring count
    pub angular_velocities: Vec<f32>,
    /// Explicit gap per ring (outermost first). `None` keeps the outermost
    /// ring closed and gives every inner ring a random gap.
    pub missing_edges: Option<Vec<Option<usize>>>,
    /// Start rings at a random angle instead of 0
    pub randomize_ring_angles: bool,

    // === Bodies ===
    pub body_count: usize,
    pub body_radius: f32,
    /// Mass per unit area
    pub body_density: f32,
    /// Spawn disk radius as a fraction of the innermost ring's clear interior
    pub spawn_fraction: f32,
    /// Maximum magnitude of each initial velocity component
    pub initial_speed: f32,

    /// RNG seed for spawn positions, ring angles and gaps
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            damping: DEFAULT_DAMPING,
            restitution: DEFAULT_RESTITUTION,
            wall_coupling: DEFAULT_WALL_COUPLING,
            body_collisions: true,

            ring_count: DEFAULT_RING_COUNT,
            ring_radii: Vec::new(),
            outer_ring_radius: DEFAULT_OUTER_RING_RADIUS,
            ring_scale: DEFAULT_RING_SCALE,
            angular_velocities: DEFAULT_ANGULAR_VELOCITIES.to_vec(),
            missing_edges: None,
            randomize_ring_angles: true,

            body_count: DEFAULT_BODY_COUNT,
            body_radius: DEFAULT_BODY_RADIUS,
            body_density: DEFAULT_BODY_DENSITY,
            spawn_fraction: DEFAULT_SPAWN_FRACTION,
            initial_speed: DEFAULT_INITIAL_SPEED,

            seed: 0,
        }
    }
}

impl SimConfig {
    /// Check every tunable, failing on the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_count == 0 {
            return Err(ConfigError::NoRings);
        }
        if !self.ring_radii.is_empty() && self.ring_radii.len() != self.ring_count {
            return Err(ConfigError::RingCountMismatch {
                ring_count: self.ring_count,
                radii: self.ring_radii.len(),
            });
        }
        if self.ring_radii.is_empty() && !(self.ring_scale > 0.0 && self.ring_scale < 1.0) {
            return Err(ConfigError::InvalidRingScale(self.ring_scale));
        }

        let radii = self.resolved_ring_radii();
        for (index, &radius) in radii.iter().enumerate() {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ConfigError::InvalidRingRadius { index, radius });
            }
            if index > 0 && radius >= radii[index - 1] {
                return Err(ConfigError::RingRadiiNotDecreasing { index });
            }
        }

        for (index, &value) in self.angular_velocities.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::InvalidAngularVelocity { index, value });
            }
        }

        if let Some(edges) = &self.missing_edges {
            if edges.len() != self.ring_count {
                return Err(ConfigError::MissingEdgeCountMismatch {
                    ring_count: self.ring_count,
                    found: edges.len(),
                });
            }
            for (ring, edge) in edges.iter().enumerate() {
                if let Some(edge) = *edge {
                    if edge >= RING_SIDES {
                        return Err(ConfigError::InvalidMissingEdge { ring, edge });
                    }
                }
            }
        }

        if !(self.body_radius.is_finite() && self.body_radius > 0.0) {
            return Err(ConfigError::InvalidBodyRadius(self.body_radius));
        }
        if !(self.body_density.is_finite() && self.body_density > 0.0) {
            return Err(ConfigError::InvalidBodyDensity(self.body_density));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::InvalidGravity(self.gravity));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::InvalidDamping(self.damping));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::InvalidRestitution(self.restitution));
        }
        if !(self.wall_coupling.is_finite() && self.wall_coupling >= 0.0) {
            return Err(ConfigError::InvalidWallCoupling(self.wall_coupling));
        }
        if !(0.0..=1.0).contains(&self.spawn_fraction) {
            return Err(ConfigError::InvalidSpawnFraction(self.spawn_fraction));
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(ConfigError::InvalidInitialSpeed(self.initial_speed));
        }

        Ok(())
    }

    /// Ring radii, outermost first
    pub fn resolved_ring_radii(&self) -> Vec<f32> {
        if !self.ring_radii.is_empty() {
            return self.ring_radii.clone();
        }
        (0..self.ring_count)
            .map(|i| self.outer_ring_radius * self.ring_scale.powi(i as i32))
            .collect()
    }

    /// Angular velocity for a ring (outermost = 0), cycling the configured list
    pub fn angular_velocity_for(&self, ring: usize) -> f32 {
        if self.angular_velocities.is_empty() {
            0.0
        } else {
            self.angular_velocities[ring % self.angular_velocities.len()]
        }
    }

    /// Mass shared by every body (density times disk area)
    pub fn body_mass(&self) -> f32 {
        self.body_density * std::f32::consts::PI * self.body_radius * self.body_radius
    }

    /// True when `other` only differs in tunables that can change mid-run
    pub fn same_topology(&self, other: &SimConfig) -> bool {
        self.resolved_ring_radii() == other.resolved_ring_radii()
            && self.missing_edges == other.missing_edges
            && self.randomize_ring_angles == other.randomize_ring_angles
            && self.body_count == other.body_count
            && self.body_radius == other.body_radius
            && self.body_density == other.body_density
            && self.spawn_fraction == other.spawn_fraction
            && self.initial_speed == other.initial_speed
            && self.seed == other.seed
    }

    /// Raise or lower gravity, never below zero
    pub fn adjust_gravity(&mut self, delta: f32) {
        self.gravity = (self.gravity + delta).max(0.0);
    }

    /// Multiply every ring's angular velocity
    pub fn scale_rotation(&mut self, factor: f32) {
        for w in &mut self.angular_velocities {
            *w *= factor;
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
