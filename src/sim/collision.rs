//! Collision detection and response
//!
//! The tricky part of the engine: disks against the straight, moving edges of
//! rotating hexagons, plus disk-disk contacts.
//!
//! Wall policy per body per tick:
//! - rings are visited innermost first
//! - within a ring only the nearest penetrating active edge responds
//! - one response per ring, single pass (no re-test after correction)

use glam::Vec2;

use super::body::Body;
use super::geometry::{Segment, perpendicular, reflect};
use super::ring::Ring;
use crate::consts::EPSILON;
use crate::error::GeometryError;

/// Below this center-to-edge distance the direction to the closest point is
/// numerical noise and the edge perpendicular is used instead
const NORMAL_EPSILON: f32 = 1e-3;

/// Coefficients for wall responses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactParams {
    /// Fraction of relative velocity kept after the bounce
    pub restitution: f32,
    /// Fraction of the wall's tangential surface velocity added on contact
    pub wall_coupling: f32,
}

/// A penetrating edge for one body (recomputed every tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Ring index (0 = outermost)
    pub ring: usize,
    /// Edge index within the ring
    pub edge: usize,
    /// Distance from body center to the closest point on the edge
    pub distance: f32,
    /// Closest point on the edge
    pub point: Vec2,
    /// Unit normal pointing from the edge toward the body
    pub normal: Vec2,
}

impl Contact {
    /// How far the body overlaps the edge
    #[inline]
    pub fn penetration(&self, radius: f32) -> f32 {
        (radius - self.distance).max(0.0)
    }
}

/// Contact between a disk and one edge, if the disk overlaps it
///
/// The normal points from the edge toward the body center, so it is correct
/// whichever way the edge is wound and whichever side the body is on. When
/// the center sits exactly on the edge, the side is taken from the velocity
/// (the body came from the side it is moving away from), then from the ring
/// center.
pub fn edge_contact(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    ring: &Ring,
    ring_index: usize,
    edge_index: usize,
    edge: Segment,
) -> Result<Option<Contact>, GeometryError> {
    if edge.length() < EPSILON {
        return Err(GeometryError::DegenerateEdge { edge: edge_index });
    }

    let (distance, point) = edge.distance_to(pos);
    if distance >= radius {
        return Ok(None);
    }

    let normal = if distance > NORMAL_EPSILON {
        (pos - point) / distance
    } else {
        let perp = perpendicular(edge.direction()).normalize_or_zero();
        let along = vel.dot(perp);
        if along.abs() > EPSILON {
            -perp * along.signum()
        } else {
            let to_center = ring.center - point;
            if to_center.length_squared() < EPSILON * EPSILON {
                return Err(GeometryError::UndefinedNormal);
            }
            if perp.dot(to_center) >= 0.0 { perp } else { -perp }
        }
    };

    Ok(Some(Contact {
        ring: ring_index,
        edge: edge_index,
        distance,
        point,
        normal,
    }))
}

/// Nearest penetrating active edge of one ring
///
/// Ties keep the lower edge index. Degenerate edges are logged and skipped.
pub fn nearest_contact(body: &Body, ring: &Ring, ring_index: usize) -> Option<Contact> {
    let mut best: Option<Contact> = None;

    for (edge_index, edge) in ring.indexed_active_edges() {
        match edge_contact(body.pos, body.vel, body.radius(), ring, ring_index, edge_index, edge) {
            Ok(Some(contact)) => {
                if best.is_none_or(|b| contact.distance < b.distance) {
                    best = Some(contact);
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::debug!("ring {} skipped contact for body {}: {}", ring_index, body.id, e);
            }
        }
    }

    best
}

/// Apply one wall contact to a body
///
/// The body is always pushed out along the normal until it is tangent. The
/// velocity only responds when the body approaches the wall's surface:
/// `v' = v_wall + e * reflect(v - v_wall, n) + k * tangential(v_wall)`.
/// Returns true if the velocity changed.
pub fn resolve_wall_contact(
    body: &mut Body,
    ring: &Ring,
    contact: &Contact,
    params: ContactParams,
) -> bool {
    let n = contact.normal;
    body.pos += n * contact.penetration(body.radius());

    let wall_vel = ring.edge_velocity_at(contact.point);
    let relative = body.vel - wall_vel;
    if relative.dot(n) >= 0.0 {
        return false;
    }

    let tangent = perpendicular(n);
    let wall_tangential = tangent * wall_vel.dot(tangent);

    body.vel = wall_vel
        + params.restitution * reflect(relative, n)
        + params.wall_coupling * wall_tangential;
    true
}

/// Resolve every ring against one body, innermost ring first
///
/// Rings are stored outermost first. Returns the contacts that were handled,
/// in the order they were resolved.
pub fn resolve_wall_collisions(body: &mut Body, rings: &[Ring], params: ContactParams) -> Vec<Contact> {
    let mut resolved = Vec::new();

    for (ring_index, ring) in rings.iter().enumerate().rev() {
        if let Some(contact) = nearest_contact(body, ring, ring_index) {
            resolve_wall_contact(body, ring, &contact, params);
            resolved.push(contact);
        }
    }

    resolved
}

/// Elastic disk-disk response for one pair
///
/// Separates the disks by half the overlap each, then applies an impulse along
/// the contact normal weighted by inverse mass. Returns true if they overlapped.
pub fn resolve_body_pair(a: &mut Body, b: &mut Body, restitution: f32) -> bool {
    let delta = b.pos - a.pos;
    let radii = a.radius() + b.radius();
    let dist_sq = delta.length_squared();
    if dist_sq >= radii * radii {
        return false;
    }

    let distance = dist_sq.sqrt();
    let normal = if distance > EPSILON {
        delta / distance
    } else {
        // Coincident centers, pick an arbitrary axis
        Vec2::Y
    };

    let half_overlap = (radii - distance) * 0.5;
    a.pos -= normal * half_overlap;
    b.pos += normal * half_overlap;

    let vn = (b.vel - a.vel).dot(normal);
    if vn < 0.0 {
        let inv_a = a.inv_mass();
        let inv_b = b.inv_mass();
        let j = -(1.0 + restitution) * vn / (inv_a + inv_b);
        a.vel -= normal * (j * inv_a);
        b.vel += normal * (j * inv_b);
    }

    true
}

/// Resolve every overlapping pair once, in index order
///
/// Returns the number of overlapping pairs found.
pub fn resolve_body_collisions(bodies: &mut [Body], restitution: f32) -> usize {
    let mut count = 0;
    for j in 1..bodies.len() {
        let (left, right) = bodies.split_at_mut(j);
        let b = &mut right[0];
        for a in left.iter_mut() {
            if resolve_body_pair(a, b, restitution) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;

    const ELASTIC: ContactParams = ContactParams {
        restitution: 1.0,
        wall_coupling: 0.0,
    };

    fn body_at(pos: Vec2, vel: Vec2, radius: f32) -> Body {
        Body::new(0, pos, vel, radius, 1.0)
    }

    /// Point just inside edge `edge` of `ring`, `inset` from the edge's midpoint
    fn inside_edge(ring: &Ring, edge: usize, inset: f32) -> (Vec2, Vec2) {
        let mid = ring.edge(edge).midpoint();
        let outward = (mid - ring.center).normalize();
        (mid - outward * inset, outward)
    }

    #[test]
    fn test_contact_normal_points_toward_body() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        let (pos, outward) = inside_edge(&ring, 0, 5.0);
        let body = body_at(pos, Vec2::ZERO, 8.0);

        let contact = nearest_contact(&body, &ring, 0).expect("body overlaps edge 0");
        assert_eq!(contact.edge, 0);
        assert!((contact.distance - 5.0).abs() < 1e-3);
        assert!((contact.normal + outward).length() < 1e-4);
        assert!((contact.penetration(8.0) - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_contact_from_outside_points_outward() {
        let ring = Ring::new(Vec2::ZERO, 50.0, 0.0, None);
        let (pos, outward) = inside_edge(&ring, 3, -4.0);
        let body = body_at(pos, Vec2::ZERO, 6.0);

        let contact = nearest_contact(&body, &ring, 0).expect("body overlaps edge 3");
        assert!((contact.normal - outward).length() < 1e-4);
    }

    #[test]
    fn test_no_contact_when_clear() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        let body = body_at(Vec2::ZERO, Vec2::new(0.0, 50.0), 10.0);
        assert!(nearest_contact(&body, &ring, 0).is_none());
    }

    #[test]
    fn test_center_on_edge_uses_velocity_side() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        let (pos, outward) = inside_edge(&ring, 2, 0.0);
        // Moving outward: it came from the inside
        let body = body_at(pos, outward * 20.0, 5.0);
        let contact = nearest_contact(&body, &ring, 0).expect("body overlaps edge 2");
        assert!(contact.normal.dot(outward) < -0.99);

        // No velocity: falls back to the ring center side
        let body = body_at(pos, Vec2::ZERO, 5.0);
        let contact = nearest_contact(&body, &ring, 0).expect("body overlaps edge 2");
        assert!(contact.normal.dot(outward) < -0.99);
    }

    #[test]
    fn test_closest_edge_wins_near_vertex() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        // Just inside vertex 1, nudged toward edge 1
        let vertex = ring.vertices()[1];
        let toward_edge1 = (ring.edge(1).midpoint() - vertex).normalize();
        let pos = vertex * 0.93 + toward_edge1 * 4.0;
        let body = body_at(pos, Vec2::ZERO, 10.0);

        let (d0, _) = ring.edge(0).distance_to(pos);
        let (d1, _) = ring.edge(1).distance_to(pos);
        assert!(d0 < 10.0 && d1 < 10.0);

        let contact = nearest_contact(&body, &ring, 0).expect("corner overlap");
        let expected = if d1 < d0 { 1 } else { 0 };
        assert_eq!(contact.edge, expected);
    }

    #[test]
    fn test_degenerate_ring_is_skipped() {
        let ring = Ring::new(Vec2::ZERO, 0.0, 1.0, None);
        let body = body_at(Vec2::new(1.0, 0.0), Vec2::X, 5.0);
        assert!(nearest_contact(&body, &ring, 0).is_none());

        let err = edge_contact(body.pos, body.vel, 5.0, &ring, 0, 4, ring.edge(4));
        assert_eq!(err, Err(GeometryError::DegenerateEdge { edge: 4 }));
    }

    #[test]
    fn test_head_on_bounce_on_stationary_wall() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        let (pos, outward) = inside_edge(&ring, 4, 7.0);
        let mut body = body_at(pos, outward * 80.0, 10.0);
        let params = ContactParams {
            restitution: 0.75,
            wall_coupling: 0.1,
        };

        let hits = resolve_wall_collisions(&mut body, std::slice::from_ref(&ring), params);
        assert_eq!(hits.len(), 1);
        assert!((body.vel + outward * 60.0).length() < 1e-3);

        // Pushed back until exactly tangent
        let (d, _) = ring.edge(4).distance_to(body.pos);
        assert!((d - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_separating_body_is_corrected_but_not_reflected() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, None);
        let (pos, outward) = inside_edge(&ring, 0, 6.0);
        let vel = -outward * 30.0 + perpendicular(outward) * 5.0;
        let mut body = body_at(pos, vel, 10.0);

        let contact = nearest_contact(&body, &ring, 0).expect("overlap");
        assert!(!resolve_wall_contact(&mut body, &ring, &contact, ELASTIC));
        assert_eq!(body.vel, vel);
        let (d, _) = ring.edge(0).distance_to(body.pos);
        assert!(d >= 10.0 - 1e-3);
    }

    #[test]
    fn test_gap_lets_body_through() {
        let ring = Ring::new(Vec2::ZERO, 100.0, 0.0, Some(2));
        let gap_mid = ring.gap_midpoint().expect("ring has a gap");
        let outward = gap_mid.normalize();
        let vel = outward * 50.0;
        let mut body = body_at(gap_mid, vel, 8.0);

        let hits = resolve_wall_collisions(&mut body, std::slice::from_ref(&ring), ELASTIC);
        assert!(hits.is_empty());
        assert_eq!(body.vel, vel);
        assert_eq!(body.pos, gap_mid);
    }

    #[test]
    fn test_rotating_wall_couples_tangential_velocity() {
        let omega = 2.0;
        let ring = Ring::new(Vec2::ZERO, 100.0, omega, None);
        let (pos, outward) = inside_edge(&ring, 1, 5.0);
        let mut body = body_at(pos, outward * 40.0, 8.0);
        let params = ContactParams {
            restitution: 1.0,
            wall_coupling: 0.1,
        };

        let contact = nearest_contact(&body, &ring, 0).expect("overlap");
        assert!(resolve_wall_contact(&mut body, &ring, &contact, params));

        // Edge midpoint moves purely tangentially
        let wall_vel = ring.edge_velocity_at(contact.point);
        let tangent = wall_vel.normalize();
        assert!((body.vel.dot(tangent) - 0.1 * wall_vel.length()).abs() < 1e-2);
        assert!((body.vel.dot(outward) + 40.0).abs() < 1e-2);
    }

    #[test]
    fn test_innermost_ring_resolved_first() {
        // Two rings close enough that one body straddles both
        let rings = vec![
            Ring::new(Vec2::ZERO, 100.0, 0.0, None),
            Ring::new(Vec2::ZERO, 90.0, 0.0, None),
        ];
        let between = (rings[0].apothem() + rings[1].apothem()) / 2.0;
        let pos = polar_to_cartesian(between, std::f32::consts::FRAC_PI_6);
        let mut body = body_at(pos, Vec2::ZERO, 6.0);

        let hits = resolve_wall_collisions(&mut body, &rings, ELASTIC);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].ring, 1);
        assert_eq!(hits[1].ring, 0);
    }

    #[test]
    fn test_body_pair_head_on_equal_mass() {
        let mut a = Body::new(0, Vec2::new(-4.0, 0.0), Vec2::new(10.0, 0.0), 5.0, 2.0);
        let mut b = Body::new(1, Vec2::new(4.0, 0.0), Vec2::new(-10.0, 0.0), 5.0, 2.0);

        assert!(resolve_body_pair(&mut a, &mut b, 1.0));
        // Equal masses swap velocities in an elastic collision
        assert!((a.vel - Vec2::new(-10.0, 0.0)).length() < 1e-4);
        assert!((b.vel - Vec2::new(10.0, 0.0)).length() < 1e-4);
        assert!(((b.pos - a.pos).length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_body_pair_conserves_momentum() {
        let mut a = Body::new(0, Vec2::new(0.0, 0.0), Vec2::new(5.0, 1.0), 3.0, 1.0);
        let mut b = Body::new(1, Vec2::new(4.0, 1.0), Vec2::new(-2.0, 0.0), 3.0, 3.0);
        let before = a.vel * a.mass() + b.vel * b.mass();

        assert!(resolve_body_pair(&mut a, &mut b, 0.8));
        let after = a.vel * a.mass() + b.vel * b.mass();
        assert!((before - after).length() < 1e-4);
    }

    #[test]
    fn test_body_pair_apart_untouched() {
        let mut a = Body::new(0, Vec2::ZERO, Vec2::X, 2.0, 1.0);
        let mut b = Body::new(1, Vec2::new(10.0, 0.0), -Vec2::X, 2.0, 1.0);
        assert!(!resolve_body_pair(&mut a, &mut b, 1.0));
        assert_eq!(a.vel, Vec2::X);
    }

    #[test]
    fn test_coincident_bodies_separate() {
        let mut bodies = vec![
            Body::new(0, Vec2::ZERO, Vec2::ZERO, 2.0, 1.0),
            Body::new(1, Vec2::ZERO, Vec2::ZERO, 2.0, 1.0),
        ];
        assert_eq!(resolve_body_collisions(&mut bodies, 1.0), 1);
        assert!(((bodies[1].pos - bodies[0].pos).length() - 4.0).abs() < 1e-4);
        assert!(bodies.iter().all(|b| b.pos.is_finite()));
    }
}
