//! Error types
//!
//! Configuration errors are fatal at setup and returned before any tick runs.
//! Geometry errors never leave a tick: the resolver logs them and skips the
//! offending contact.

use thiserror::Error;

/// Invalid simulation configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ring count must be at least 1")]
    NoRings,
    #[error("ring count is {ring_count} but {radii} radii were given")]
    RingCountMismatch { ring_count: usize, radii: usize },
    #[error("ring {index} has invalid radius {radius}")]
    InvalidRingRadius { index: usize, radius: f32 },
    #[error("ring radii must strictly decrease from outer to inner (ring {index})")]
    RingRadiiNotDecreasing { index: usize },
    #[error("ring scale must be in (0, 1), got {0}")]
    InvalidRingScale(f32),
    #[error("angular velocity {value} for ring {index} is not finite")]
    InvalidAngularVelocity { index: usize, value: f32 },
    #[error("missing edge list has {found} entries for {ring_count} rings")]
    MissingEdgeCountMismatch { ring_count: usize, found: usize },
    #[error("ring {ring} has missing edge {edge}, expected a value in 0..6")]
    InvalidMissingEdge { ring: usize, edge: usize },
    #[error("body radius must be positive, got {0}")]
    InvalidBodyRadius(f32),
    #[error("body density must be positive, got {0}")]
    InvalidBodyDensity(f32),
    #[error("gravity must be finite, got {0}")]
    InvalidGravity(f32),
    #[error("damping must be in (0, 1], got {0}")]
    InvalidDamping(f32),
    #[error("restitution must be in [0, 1], got {0}")]
    InvalidRestitution(f32),
    #[error("wall coupling must be finite and non-negative, got {0}")]
    InvalidWallCoupling(f32),
    #[error("spawn fraction must be in [0, 1], got {0}")]
    InvalidSpawnFraction(f32),
    #[error("initial speed must be finite and non-negative, got {0}")]
    InvalidInitialSpeed(f32),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Geometry that cannot produce a usable contact
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("edge {edge} is shorter than epsilon")]
    DegenerateEdge { edge: usize },
    #[error("contact normal is undefined")]
    UndefinedNormal,
}
