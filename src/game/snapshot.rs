//! Read-only view of the engine handed to observers and renderers

use serde::Serialize;

use super::state::TurnState;
use crate::rules::RuleSetKind;
use crate::sim::{BallGroup, Disc, Pocket, Table};

/// Owned copy of everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Ticks since `initialize`
    pub tick: u64,
    pub ruleset: RuleSetKind,
    pub table: Table,
    pub discs: Vec<Disc>,
    pub pockets: Vec<Pocket>,
    pub turn: TurnState,
    /// Pool only: group per player, None until assigned
    pub pool_groups: Option<[Option<BallGroup>; 2]>,
    /// The computer has a move pending
    pub computer_thinking: bool,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
