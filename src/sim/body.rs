//! Free disks
//!
//! Pure kinematic state plus the integration rule. Radius and mass never
//! change after construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BODY_PALETTE;

/// A disk moving under gravity and damping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    mass: f32,
    /// Palette index for rendering (opaque to physics)
    pub color: u32,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            mass,
            color: id % BODY_PALETTE.len() as u32,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Advance one tick: gravity, then displacement, then damping
    ///
    /// Damping comes last so it doesn't eat this tick's gravity impulse
    /// before the body has moved with it.
    pub fn integrate(&mut self, dt: f32, gravity: f32, damping: f32) {
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
        self.vel *= damping;
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Potential energy relative to `origin` (+y is down)
    pub fn potential_energy(&self, gravity: f32, origin: Vec2) -> f32 {
        -self.mass * gravity * (self.pos.y - origin.y)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Read-only view of a body for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
}

impl From<&Body> for BodySnapshot {
    fn from(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            vel: body.vel,
            radius: body.radius,
            color: body.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_order() {
        let mut body = Body::new(0, Vec2::ZERO, Vec2::ZERO, 5.0, 1.0);
        body.integrate(0.5, 10.0, 0.5);
        // Gravity first: v = 5, moved by 5 * 0.5, then damped
        assert!((body.pos.y - 2.5).abs() < 1e-6);
        assert!((body.vel.y - 2.5).abs() < 1e-6);
        assert_eq!(body.pos.x, 0.0);
    }

    #[test]
    fn test_integrate_free_flight() {
        let mut body = Body::new(0, Vec2::ZERO, Vec2::new(10.0, 0.0), 5.0, 1.0);
        body.integrate(0.1, 0.0, 1.0);
        assert!((body.pos - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert_eq!(body.vel, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_energy() {
        let body = Body::new(0, Vec2::new(0.0, 10.0), Vec2::new(3.0, 4.0), 1.0, 2.0);
        assert!((body.kinetic_energy() - 25.0).abs() < 1e-5);
        // 10 units below the origin with +y down
        assert!((body.potential_energy(9.0, Vec2::ZERO) - (-180.0)).abs() < 1e-4);
    }

    #[test]
    fn test_color_cycles_palette() {
        let a = Body::new(1, Vec2::ZERO, Vec2::ZERO, 1.0, 1.0);
        let b = Body::new(1 + BODY_PALETTE.len() as u32, Vec2::ZERO, Vec2::ZERO, 1.0, 1.0);
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn test_snapshot() {
        let body = Body::new(3, Vec2::new(1.0, 2.0), Vec2::X, 4.0, 1.0);
        let snap = BodySnapshot::from(&body);
        assert_eq!(snap.id, 3);
        assert_eq!(snap.pos, body.pos);
        assert_eq!(snap.radius, 4.0);
    }
}
