//! Rule sets: table layout, scoring and fouls
//!
//! The state machine only talks to `RuleSet` through the `Rules` trait;
//! pool and carrom differences stay inside their own modules.

pub mod carrom;
pub mod pool;

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use carrom::CarromRules;
pub use pool::PoolRules;

use crate::direction;
use crate::game::PlayerId;
use crate::settings::Settings;
use crate::sim::{CaptureTally, Disc, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSetKind {
    Pool,
    Carrom,
}

impl RuleSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::Pool => "pool",
            RuleSetKind::Carrom => "carrom",
        }
    }
}

impl fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pool" | "8ball" | "eight-ball" => Ok(RuleSetKind::Pool),
            "carrom" => Ok(RuleSetKind::Carrom),
            other => Err(format!("unknown rule set '{}'", other)),
        }
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    Draw,
}

/// The rules' verdict on one shot
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub foul: bool,
    pub message: String,
    /// Shooter shoots again
    pub continue_turn: bool,
    /// Scores after this shot
    pub scores: [u32; 2],
    /// Set when the shot ended the game
    pub result: Option<GameResult>,
}

/// Policy consumed by the turn state machine
pub trait Rules {
    fn kind(&self) -> RuleSetKind;

    /// Build the initial table: pockets, rack/ring, cue ball or striker
    fn setup(&mut self, width: f32, height: f32) -> World;

    /// Shooter velocity for an aim angle and power (0..=100)
    fn shot_velocity(&self, angle: f32, power: f32) -> Vec2;

    /// Aim angle a player starts their turn with
    fn default_aim(&self, player: PlayerId) -> f32;

    /// Reset per-turn table state before `player` aims (striker placement)
    fn prepare_turn(&self, player: PlayerId, world: &mut World);

    /// Score the shot, apply fouls and respawns, detect game end
    fn finish_turn(
        &mut self,
        tally: &CaptureTally,
        shooter: PlayerId,
        scores: [u32; 2],
        world: &mut World,
    ) -> TurnOutcome;

    /// Discs `player` may legally aim at
    fn legal_targets<'w>(&self, player: PlayerId, world: &'w World) -> Vec<&'w Disc>;

    /// Slide the shooter along its start line; false when not supported or blocked
    fn place_shooter(&self, _player: PlayerId, _x: f32, _world: &mut World) -> bool {
        false
    }
}

/// The two supported rule sets
#[derive(Debug, Clone)]
pub enum RuleSet {
    Pool(PoolRules),
    Carrom(CarromRules),
}

impl RuleSet {
    pub fn new(kind: RuleSetKind, settings: &Settings) -> Self {
        match kind {
            RuleSetKind::Pool => RuleSet::Pool(PoolRules::new(settings.pool.clone())),
            RuleSetKind::Carrom => RuleSet::Carrom(CarromRules::new(settings.carrom.clone())),
        }
    }

    /// Pool group assignment per player (None for carrom)
    pub fn pool_groups(&self) -> Option<[Option<crate::sim::BallGroup>; 2]> {
        match self {
            RuleSet::Pool(rules) => Some(rules.groups()),
            RuleSet::Carrom(_) => None,
        }
    }

    fn inner(&self) -> &dyn Rules {
        match self {
            RuleSet::Pool(rules) => rules,
            RuleSet::Carrom(rules) => rules,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Rules {
        match self {
            RuleSet::Pool(rules) => rules,
            RuleSet::Carrom(rules) => rules,
        }
    }
}

impl Rules for RuleSet {
    fn kind(&self) -> RuleSetKind {
        self.inner().kind()
    }

    fn setup(&mut self, width: f32, height: f32) -> World {
        self.inner_mut().setup(width, height)
    }

    fn shot_velocity(&self, angle: f32, power: f32) -> Vec2 {
        self.inner().shot_velocity(angle, power)
    }

    fn default_aim(&self, player: PlayerId) -> f32 {
        self.inner().default_aim(player)
    }

    fn prepare_turn(&self, player: PlayerId, world: &mut World) {
        self.inner().prepare_turn(player, world)
    }

    fn finish_turn(
        &mut self,
        tally: &CaptureTally,
        shooter: PlayerId,
        scores: [u32; 2],
        world: &mut World,
    ) -> TurnOutcome {
        self.inner_mut().finish_turn(tally, shooter, scores, world)
    }

    fn legal_targets<'w>(&self, player: PlayerId, world: &'w World) -> Vec<&'w Disc> {
        self.inner().legal_targets(player, world)
    }

    fn place_shooter(&self, player: PlayerId, x: f32, world: &mut World) -> bool {
        self.inner().place_shooter(player, x, world)
    }
}

/// Shared shot impulse: power scales linearly up to `max_speed`
pub(crate) fn scaled_shot(angle: f32, power: f32, max_speed: f32) -> Vec2 {
    direction(angle) * (power.clamp(0.0, 100.0) / 100.0) * max_speed
}
