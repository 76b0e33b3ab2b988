//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (rings outermost first, bodies by id)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod geometry;
pub mod ring;
pub mod state;
pub mod tick;

pub use body::{Body, BodySnapshot};
pub use collision::{
    Contact, ContactParams, edge_contact, nearest_contact, resolve_body_collisions,
    resolve_body_pair, resolve_wall_collisions, resolve_wall_contact,
};
pub use geometry::{Segment, perpendicular, point_segment_distance, reflect};
pub use ring::Ring;
pub use state::{RngState, Simulation};
pub use tick::{FrameClock, TickStats, tick};
