//! Rotating hexagon boundary rings
//!
//! A ring is a regular hexagon around a shared center:
//! - vertex i sits at `center + radius * (cos(angle + i·60°), sin(angle + i·60°))`
//! - edge i joins vertex i to vertex (i+1) mod 6
//! - at most one edge (the gap) is missing
//!
//! Vertices are derived from the current angle on demand, never stored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Segment, perpendicular};
use crate::consts::RING_SIDES;
use crate::{polar_to_cartesian, wrap_angle};

const SIDE_ANGLE: f32 = std::f32::consts::TAU / RING_SIDES as f32;

/// A rotating hexagon boundary with an optional gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    /// Center shared by every ring
    pub center: Vec2,
    /// Circumradius (center to vertex)
    pub radius: f32,
    /// Current rotation (radians, wrapped to [0, 2π))
    pub angle: f32,
    /// Radians per second (0 = stationary)
    pub angular_vel: f32,
    /// Index of the missing edge, if any
    pub gap: Option<usize>,
}

impl Ring {
    pub fn new(center: Vec2, radius: f32, angular_vel: f32, gap: Option<usize>) -> Self {
        Self {
            center,
            radius,
            angle: 0.0,
            angular_vel,
            gap,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = wrap_angle(angle);
        self
    }

    /// Distance from the center to the middle of each edge
    #[inline]
    pub fn apothem(&self) -> f32 {
        self.radius * (SIDE_ANGLE / 2.0).cos()
    }

    /// The six vertices at the current angle
    pub fn vertices(&self) -> [Vec2; RING_SIDES] {
        std::array::from_fn(|i| {
            self.center + polar_to_cartesian(self.radius, self.angle + i as f32 * SIDE_ANGLE)
        })
    }

    /// Edge `index` regardless of whether it is the gap
    pub fn edge(&self, index: usize) -> Segment {
        let vertices = self.vertices();
        Segment::new(vertices[index % RING_SIDES], vertices[(index + 1) % RING_SIDES])
    }

    /// True unless `index` is the missing edge
    #[inline]
    pub fn is_edge_active(&self, index: usize) -> bool {
        self.gap != Some(index)
    }

    /// Active edges with their indices, in edge order
    pub fn indexed_active_edges(&self) -> impl Iterator<Item = (usize, Segment)> + '_ {
        let vertices = self.vertices();
        let gap = self.gap;
        (0..RING_SIDES)
            .filter(move |&i| gap != Some(i))
            .map(move |i| (i, Segment::new(vertices[i], vertices[(i + 1) % RING_SIDES])))
    }

    /// Active edges only, omitting the gap
    pub fn active_edges(&self) -> Vec<Segment> {
        self.indexed_active_edges().map(|(_, edge)| edge).collect()
    }

    /// Rotate by angular velocity * dt
    pub fn advance(&mut self, dt: f32) {
        if self.angular_vel != 0.0 {
            self.angle = wrap_angle(self.angle + self.angular_vel * dt);
        }
    }

    /// Velocity of the ring material at `point` due to rotation about the center
    ///
    /// Tangential, magnitude |ω|·|point − center|, counter-clockwise for ω > 0.
    #[inline]
    pub fn edge_velocity_at(&self, point: Vec2) -> Vec2 {
        self.angular_vel * perpendicular(point - self.center)
    }

    /// Midpoint of the gap edge, if the ring has one
    pub fn gap_midpoint(&self) -> Option<Vec2> {
        self.gap.map(|i| self.edge(i).midpoint())
    }
}
