//! Disc Table - shared rigid-disc physics for pool and carrom
//!
//! Core modules:
//! - `sim`: Deterministic simulation (discs, pockets, stepping, collisions, captures)
//! - `rules`: Pluggable scoring/foul policies (pool, carrom)
//! - `game`: Turn state machine, scheduler, snapshots and the `Engine` facade
//! - `opponent`: Greedy nearest-target computer player
//! - `settings`: Data-driven tuning loaded from JSON
//! - `web`: wasm-bindgen facade for the browser page (wasm32 only)

pub mod game;
pub mod opponent;
pub mod rules;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{Engine, GameMode, GamePhase, PlayerId, Snapshot, SubscriptionId, TurnState};
pub use rules::{RuleSet, RuleSetKind};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Nominal rate of the external tick source
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Maximum aim power accepted by the setters
    pub const MAX_AIM_POWER: f32 = 100.0;
    /// Aim power each new turn starts with
    pub const DEFAULT_AIM_POWER: f32 = 50.0;

    /// Positional relaxation passes per tick in the collision resolver
    pub const SEPARATION_PASSES: usize = 8;

    /// A shot that has not settled after this many ticks is forced to rest
    pub const MAX_SHOT_TICKS: u32 = 60 * TICKS_PER_SECOND;

    /// Step used when searching for a free respawn spot
    pub const RESPAWN_SEARCH_STEP: f32 = 2.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU itself
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Unit vector pointing along `angle` (radians, screen space, y down)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
