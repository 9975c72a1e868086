//! Computer opponent
//!
//! Greedy, no lookahead: aim the cue ball or striker straight at the
//! nearest legal target with a slightly randomized power.

use rand::Rng;

use crate::angle_between;
use crate::game::PlayerId;
use crate::rules::Rules;
use crate::settings::OpponentSettings;
use crate::sim::World;

/// A shot the opponent intends to take
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    /// Disc being aimed at
    pub target_id: u32,
    pub angle: f32,
    /// 0..=100
    pub power: f32,
}

/// Pick the nearest legal target for `player`.
///
/// Returns None when the shooter is off the table or nothing is left to hit.
pub fn plan_shot<R: Rules + ?Sized>(
    rules: &R,
    player: PlayerId,
    world: &World,
    rng: &mut impl Rng,
    settings: &OpponentSettings,
) -> Option<ShotPlan> {
    let shooter = world.shooter().filter(|d| !d.pocketed)?;

    let mut targets = rules.legal_targets(player, world);
    if targets.is_empty() {
        targets = world.on_table().filter(|d| !d.role.is_shooter()).collect();
    }

    let target = targets.into_iter().min_by(|a, b| {
        let da = (a.pos - shooter.pos).length_squared();
        let db = (b.pos - shooter.pos).length_squared();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })?;

    let (lo, hi) = (settings.min_power.min(settings.max_power), settings.max_power);
    let power = if hi > lo { rng.random_range(lo..=hi) } else { lo };

    Some(ShotPlan {
        target_id: target.id,
        angle: angle_between(shooter.pos, target.pos),
        power: power.clamp(0.0, crate::consts::MAX_AIM_POWER),
    })
}
