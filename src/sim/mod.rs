//! Deterministic simulation module
//!
//! All disc physics lives here. This module must be pure and deterministic:
//! - One fixed tick per call, velocities in pixels per tick
//! - Stable iteration order (by entity ID)
//! - No rendering, timing or platform dependencies

pub mod collision;
pub mod disc;
pub mod pocket;
pub mod step;
pub mod table;
pub mod world;

pub use collision::{Contact, disc_overlap, resolve_collisions};
pub use disc::{BallGroup, Disc, DiscRole, Pocket};
pub use pocket::{Capture, CaptureTally, check_captures};
pub use step::{PhysicsParams, all_at_rest, step};
pub use table::Table;
pub use world::{TickReport, World};
