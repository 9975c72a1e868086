//! Per-tick integration: friction, translation, cushions, rest detection

use serde::{Deserialize, Serialize};

use super::disc::Disc;
use super::table::Table;

/// Physics constants for one rule set (velocities are in pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Velocity retained per tick, in (0, 1)
    pub friction: f32,
    /// Fraction of the perpendicular velocity kept after a cushion hit
    pub wall_restitution: f32,
    /// Speed below which a disc is considered stopped
    pub rest_epsilon: f32,
    /// Peak inward nudge applied at a pocket center
    pub pull_strength: f32,
}

impl PhysicsParams {
    pub fn pool() -> Self {
        Self {
            friction: 0.98,
            wall_restitution: 0.8,
            rest_epsilon: 0.05,
            pull_strength: 0.4,
        }
    }

    pub fn carrom() -> Self {
        Self {
            friction: 0.985,
            wall_restitution: 0.7,
            rest_epsilon: 0.05,
            pull_strength: 0.5,
        }
    }
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self::pool()
    }
}

/// Advance every moving, non-pocketed disc by one tick
pub fn step(discs: &mut [Disc], table: &Table, params: &PhysicsParams) {
    for disc in discs.iter_mut().filter(|d| d.is_active()) {
        disc.vel *= params.friction;
        disc.pos += disc.vel;
        reflect_off_cushions(disc, table, params.wall_restitution);

        if disc.vel.length() < params.rest_epsilon {
            disc.stop();
        }
    }
}

/// Clamp a disc inside the cushions, bouncing the perpendicular velocity
/// component when it points out of the table
pub fn reflect_off_cushions(disc: &mut Disc, table: &Table, restitution: f32) {
    let lo = table.min_bound(disc.radius);
    let hi = table.max_bound(disc.radius);

    if disc.pos.x < lo.x {
        disc.pos.x = lo.x;
        if disc.vel.x < 0.0 {
            disc.vel.x = -disc.vel.x * restitution;
        }
    } else if disc.pos.x > hi.x {
        disc.pos.x = hi.x;
        if disc.vel.x > 0.0 {
            disc.vel.x = -disc.vel.x * restitution;
        }
    }

    if disc.pos.y < lo.y {
        disc.pos.y = lo.y;
        if disc.vel.y < 0.0 {
            disc.vel.y = -disc.vel.y * restitution;
        }
    } else if disc.pos.y > hi.y {
        disc.pos.y = hi.y;
        if disc.vel.y > 0.0 {
            disc.vel.y = -disc.vel.y * restitution;
        }
    }
}

/// Re-clamp every non-pocketed disc after positional correction
pub fn enforce_bounds(discs: &mut [Disc], table: &Table, restitution: f32) {
    for disc in discs.iter_mut().filter(|d| !d.pocketed) {
        if !table.contains(disc.pos, disc.radius) {
            reflect_off_cushions(disc, table, restitution);
        }
    }
}

/// True once nothing on the table is moving
pub fn all_at_rest(discs: &[Disc]) -> bool {
    discs.iter().all(Disc::is_at_rest)
}

/// Total speed on the table (debug/logging aid)
pub fn kinetic_sum(discs: &[Disc]) -> f32 {
    discs
        .iter()
        .filter(|d| d.is_active())
        .map(|d| d.vel.length())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::disc::DiscRole;
    use glam::Vec2;
    use proptest::prelude::*;

    fn table() -> Table {
        Table::new(800.0, 400.0, 20.0)
    }

    #[test]
    fn test_friction_slows_and_stops() {
        let params = PhysicsParams::pool();
        let mut discs = vec![Disc::new(1, DiscRole::Cue, Vec2::new(400.0, 200.0), 10.0)];
        discs[0].strike(Vec2::new(1.0, 0.0));

        let mut ticks = 0;
        while discs[0].moving && ticks < 1000 {
            step(&mut discs, &table(), &params);
            ticks += 1;
        }
        assert!(!discs[0].moving);
        assert_eq!(discs[0].vel, Vec2::ZERO);
        assert!(discs[0].pos.x > 400.0);
    }

    #[test]
    fn test_cushion_reflects_with_restitution() {
        let params = PhysicsParams::pool();
        let mut discs = vec![Disc::new(1, DiscRole::Cue, Vec2::new(765.0, 200.0), 10.0)];
        discs[0].strike(Vec2::new(10.0, 0.0));
        step(&mut discs, &table(), &params);

        assert_eq!(discs[0].pos.x, 770.0);
        let expected = -10.0 * params.friction * params.wall_restitution;
        assert!((discs[0].vel.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_pocketed_discs_do_not_move() {
        let params = PhysicsParams::carrom();
        let mut discs = vec![Disc::new(1, DiscRole::Queen, Vec2::new(100.0, 100.0), 10.0)];
        discs[0].capture(Vec2::new(20.0, 20.0));
        step(&mut discs, &table(), &params);
        assert_eq!(discs[0].pos, Vec2::new(20.0, 20.0));
        assert_eq!(discs[0].vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_single_disc_speed_never_increases(
            x in 40.0f32..760.0,
            y in 40.0f32..360.0,
            vx in -15.0f32..15.0,
            vy in -15.0f32..15.0,
        ) {
            let params = PhysicsParams::pool();
            let table = table();
            let mut discs = vec![Disc::new(1, DiscRole::Cue, Vec2::new(x, y), 10.0)];
            discs[0].strike(Vec2::new(vx, vy));

            let mut last = discs[0].vel.length();
            for _ in 0..2000 {
                step(&mut discs, &table, &params);
                let speed = discs[0].vel.length();
                prop_assert!(speed <= last + 1e-4);
                prop_assert!(table.contains(discs[0].pos, 10.0));
                if speed < params.rest_epsilon {
                    prop_assert_eq!(speed, 0.0);
                }
                last = speed;
                if !discs[0].moving {
                    break;
                }
            }
            prop_assert!(!discs[0].moving);
        }
    }
}
