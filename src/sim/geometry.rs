//! Stateless 2D geometry helpers
//!
//! Segment distance, reflection and perpendiculars used by the ring and
//! collision code. Nothing here divides by a length without checking it.

use glam::Vec2;

use crate::consts::EPSILON;

/// A straight boundary edge between two points
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }

    /// Distance from `p` to this segment and the closest point on it
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> (f32, Vec2) {
        point_segment_distance(p, self.a, self.b)
    }
}

/// Distance from `p` to segment `ab` and the closest point on the segment
///
/// Clamped projection. A zero-length segment collapses to distance from `a`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (f32, Vec2) {
    let ab = b - a;
    let len_sq = ab.length_squared();

    if len_sq < EPSILON * EPSILON {
        return ((p - a).length(), a);
    }

    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    ((p - closest).length(), closest)
}

/// Reflect velocity off a surface with unit normal `n`
///
/// Standard reflection v' = v - 2(v·n)n, applied only while `v` moves into
/// the surface. A velocity already leaving (v·n >= 0) comes back unchanged.
#[inline]
pub fn reflect(v: Vec2, n: Vec2) -> Vec2 {
    let vn = v.dot(n);
    if vn < 0.0 { v - 2.0 * vn * n } else { v }
}

/// Counter-clockwise perpendicular (rotate by +90°)
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
