//! Game flow: turn state machine, scheduler, snapshots
//!
//! `Engine` owns the world and the rule set and is the only writer to
//! either. Everything outside reads through `Snapshot`.

pub mod engine;
pub mod scheduler;
pub mod snapshot;
pub mod state;

pub use engine::{Engine, SubscriptionId};
pub use scheduler::{Scheduler, TaskId};
pub use snapshot::Snapshot;
pub use state::{GameMode, GamePhase, PlayerId, TurnState};
