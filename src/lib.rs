//! Ring Bounce - disks bouncing inside nested, rotating hexagons
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rings, bodies, collisions, stepping)
//! - `config`: Tunable parameters with validation and JSON loading
//! - `error`: Configuration and geometry error types
//!
//! Rendering, input and windowing are left to the caller: it drives
//! [`sim::Simulation::step`] once per tick and reads back
//! [`sim::Simulation::bodies`] and [`sim::Simulation::ring_edges`].

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, GeometryError};
pub use sim::{FrameClock, Simulation};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hexagon rings have six candidate edges
    pub const RING_SIDES: usize = 6;

    /// Default physics tunables
    pub const DEFAULT_GRAVITY: f32 = 600.0;
    pub const DEFAULT_DAMPING: f32 = 0.999;
    pub const DEFAULT_RESTITUTION: f32 = 0.9;
    pub const DEFAULT_WALL_COUPLING: f32 = 0.08;

    /// Default ring layout (outermost first)
    pub const DEFAULT_RING_COUNT: usize = 3;
    pub const DEFAULT_OUTER_RING_RADIUS: f32 = 300.0;
    pub const DEFAULT_RING_SCALE: f32 = 0.7;
    /// Radians per second, cycled across rings
    pub const DEFAULT_ANGULAR_VELOCITIES: [f32; 3] = [0.3, -0.5, 0.8];

    /// Default body population
    pub const DEFAULT_BODY_COUNT: usize = 5;
    pub const DEFAULT_BODY_RADIUS: f32 = 10.0;
    pub const DEFAULT_BODY_DENSITY: f32 = 0.01;
    pub const DEFAULT_SPAWN_FRACTION: f32 = 0.5;
    pub const DEFAULT_INITIAL_SPEED: f32 = 120.0;

    /// Tolerance for near-zero lengths
    pub const EPSILON: f32 = 1e-6;

    /// Body colors, cycled by body index (RGB)
    pub const BODY_PALETTE: [[u8; 3]; 5] = [
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
        [255, 0, 255],
    ];
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
