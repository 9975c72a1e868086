//! Turn state shared by every rule set

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_AIM_POWER;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the shooter to set angle/power and commit
    Aiming,
    /// Discs are rolling
    Shooting,
    /// Everything stopped; the rules are scoring the shot
    Resolving,
    /// Game ended; only `initialize` leaves this state
    GameOver,
}

/// Who is at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Two people sharing one input device
    LocalTwoPlayer,
    /// Player two is the computer
    VsComputer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index into per-player arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerId::One => write!(f, "Player 1"),
            PlayerId::Two => write!(f, "Player 2"),
        }
    }
}

/// Turn bookkeeping owned by the state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub current: PlayerId,
    pub scores: [u32; 2],
    /// Radians, screen space (y down)
    pub aim_angle: f32,
    /// 0..=100
    pub aim_power: f32,
    pub can_shoot: bool,
    pub phase: GamePhase,
    /// The last resolved shot was a foul
    pub foul: bool,
    pub message: String,
    /// Set once the game is over; None at game over means a tie
    pub winner: Option<PlayerId>,
    pub mode: GameMode,
}

impl TurnState {
    pub fn new(mode: GameMode, aim_angle: f32) -> Self {
        Self {
            current: PlayerId::One,
            scores: [0, 0],
            aim_angle,
            aim_power: DEFAULT_AIM_POWER,
            can_shoot: true,
            phase: GamePhase::Aiming,
            foul: false,
            message: format!("{}'s turn", PlayerId::One),
            winner: None,
            mode,
        }
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.scores[player.index()]
    }

    /// The computer is due to shoot
    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::VsComputer && self.current == PlayerId::Two
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
