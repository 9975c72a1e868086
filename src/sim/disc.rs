//! Disc and pocket entities
//!
//! Everything the world owns and mutates each tick lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pool ball group (assigned to players after the first legal pot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallGroup {
    Solids,
    Stripes,
}

impl BallGroup {
    pub fn other(self) -> Self {
        match self {
            BallGroup::Solids => BallGroup::Stripes,
            BallGroup::Stripes => BallGroup::Solids,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BallGroup::Solids => "solids",
            BallGroup::Stripes => "stripes",
        }
    }
}

/// What a disc is, for the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscRole {
    /// Pool cue ball
    Cue,
    /// Pool solid, numbered 1-7
    Solid(u8),
    /// Pool stripe, numbered 9-15
    Stripe(u8),
    /// Pool 8-ball
    Eight,
    /// Carrom striker
    Striker,
    /// Carrom queen
    Queen,
    /// Carrom light (white) coin
    LightCoin,
    /// Carrom dark (black) coin
    DarkCoin,
}

impl DiscRole {
    /// Cue ball or striker: the disc a player shoots with
    pub fn is_shooter(&self) -> bool {
        matches!(self, DiscRole::Cue | DiscRole::Striker)
    }

    /// Group of a pool object ball (None for the 8-ball and non-pool discs)
    pub fn group(&self) -> Option<BallGroup> {
        match self {
            DiscRole::Solid(_) => Some(BallGroup::Solids),
            DiscRole::Stripe(_) => Some(BallGroup::Stripes),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DiscRole::Cue => "cue ball".to_string(),
            DiscRole::Solid(n) => format!("solid #{}", n),
            DiscRole::Stripe(n) => format!("stripe #{}", n),
            DiscRole::Eight => "8-ball".to_string(),
            DiscRole::Striker => "striker".to_string(),
            DiscRole::Queen => "queen".to_string(),
            DiscRole::LightCoin => "light coin".to_string(),
            DiscRole::DarkCoin => "dark coin".to_string(),
        }
    }
}

/// A movable disc (ball, coin, striker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disc {
    pub id: u32,
    pub role: DiscRole,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Captured by a pocket; excluded from physics until respawned
    pub pocketed: bool,
    /// Participates in the current tick's integration
    pub moving: bool,
}

impl Disc {
    pub fn new(id: u32, role: DiscRole, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            role,
            pos,
            vel: Vec2::ZERO,
            radius,
            pocketed: false,
            moving: false,
        }
    }

    /// Still on the table and in motion
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.pocketed && self.moving
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.pocketed || !self.moving
    }

    /// Set velocity from an impulse and wake the disc
    pub fn strike(&mut self, vel: Vec2) {
        if self.pocketed {
            return;
        }
        self.vel = vel;
        self.moving = vel != Vec2::ZERO;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
        self.moving = false;
    }

    /// Remove from play, resting at the pocket center
    pub fn capture(&mut self, pocket_center: Vec2) {
        self.pocketed = true;
        self.pos = pocket_center;
        self.stop();
    }

    /// Put a pocketed (or displaced) disc back on the table at rest
    pub fn respawn(&mut self, pos: Vec2) {
        self.pocketed = false;
        self.pos = pos;
        self.stop();
    }
}

/// A static capture zone
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec2,
    /// Discs whose center comes closer than this are captured
    pub capture_radius: f32,
    /// Discs whose center comes closer than this are pulled toward the center
    pub pull_radius: f32,
}

impl Pocket {
    pub fn new(pos: Vec2, capture_radius: f32, pull_radius: f32) -> Self {
        Self {
            pos,
            capture_radius,
            pull_radius: pull_radius.max(capture_radius),
        }
    }
}
