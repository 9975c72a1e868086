//! Eight-ball pool rules
//!
//! The first legally pocketed object ball decides groups. A scratch
//! respawns the cue ball at the break spot and passes the turn. The
//! 8-ball wins the game once the shooter's group is cleared and loses
//! it any earlier.

use glam::Vec2;

use super::{GameResult, RuleSetKind, Rules, TurnOutcome, scaled_shot};
use crate::game::PlayerId;
use crate::settings::PoolSettings;
use crate::sim::{BallGroup, CaptureTally, Disc, DiscRole, Pocket, Table, World};

/// Standard rack, apex first: (ball number, row, vertical offset in ball gaps).
/// Rows spread away from the cue ball; the 8 sits in the middle of row 2.
const RACK_LAYOUT: [(u8, usize, f32); 15] = [
    (1, 0, 0.0),
    (9, 1, -0.5),
    (2, 1, 0.5),
    (3, 2, -1.0),
    (8, 2, 0.0),
    (10, 2, 1.0),
    (11, 3, -1.5),
    (4, 3, -0.5),
    (5, 3, 0.5),
    (12, 3, 1.5),
    (6, 4, -2.0),
    (13, 4, -1.0),
    (14, 4, 0.0),
    (7, 4, 1.0),
    (15, 4, 2.0),
];

/// Role for a numbered pool ball
pub fn ball_role(number: u8) -> DiscRole {
    match number {
        8 => DiscRole::Eight,
        1..=7 => DiscRole::Solid(number),
        _ => DiscRole::Stripe(number),
    }
}

/// Triangle rack positions keyed by ball number, apex pointing at the cue ball
pub fn rack_positions(apex: Vec2, ball_radius: f32) -> Vec<(u8, Vec2)> {
    // Small gap so the rack does not start in contact
    let gap = ball_radius * 2.0 + 0.5;
    let row_offset = gap * 0.866; // sqrt(3)/2 for an equilateral triangle

    RACK_LAYOUT
        .iter()
        .map(|&(number, row, v_offset)| {
            let x = apex.x + row as f32 * row_offset;
            let y = apex.y + v_offset * gap;
            (number, Vec2::new(x, y))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct PoolRules {
    settings: PoolSettings,
    /// Group per player index, unassigned until the first legal pot
    groups: [Option<BallGroup>; 2],
    break_spot: Vec2,
}

impl PoolRules {
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            settings,
            groups: [None, None],
            break_spot: Vec2::ZERO,
        }
    }

    pub fn groups(&self) -> [Option<BallGroup>; 2] {
        self.groups
    }

    pub fn group_of(&self, player: PlayerId) -> Option<BallGroup> {
        self.groups[player.index()]
    }

    /// Cue ball start position
    pub fn break_spot(&self) -> Vec2 {
        self.break_spot
    }

    fn assign(&mut self, shooter: PlayerId, group: BallGroup) {
        self.groups[shooter.index()] = Some(group);
        self.groups[shooter.other().index()] = Some(group.other());
        log::debug!("{} takes {}", shooter, group.as_str());
    }

    fn balls_left(world: &World, group: BallGroup) -> usize {
        world.on_table().filter(|d| d.role.group() == Some(group)).count()
    }

    fn pocketed_count(world: &World, group: BallGroup) -> u32 {
        world
            .discs
            .iter()
            .filter(|d| d.pocketed && d.role.group() == Some(group))
            .count() as u32
    }

    fn recount_scores(&self, world: &World, scores: [u32; 2]) -> [u32; 2] {
        let mut scores = scores;
        for (i, group) in self.groups.iter().enumerate() {
            if let Some(group) = group {
                scores[i] = Self::pocketed_count(world, *group);
            }
        }
        scores
    }

    fn respawn_cue(&self, world: &mut World) {
        if let Some(id) = world.shooter().map(|d| d.id) {
            world.respawn(id, self.break_spot, Vec2::Y);
        }
    }

    /// Foul reason for the shot, if any
    fn foul_reason(&self, tally: &CaptureTally, own: Option<BallGroup>, cleared_before: bool) -> Option<&'static str> {
        if tally.contains(DiscRole::Cue) {
            return Some("Scratch! Cue ball pocketed");
        }
        match tally.first_contact {
            None => Some("Foul: no ball hit"),
            Some(DiscRole::Eight) if !cleared_before => Some("Foul: hit the 8-ball first"),
            Some(role) => match (own, role.group()) {
                (Some(own), Some(hit)) if hit != own => Some("Foul: hit the opponent's ball first"),
                _ => None,
            },
        }
    }
}

impl Rules for PoolRules {
    fn kind(&self) -> RuleSetKind {
        RuleSetKind::Pool
    }

    fn setup(&mut self, width: f32, height: f32) -> World {
        let s = &self.settings;
        let table = Table::new(width, height, s.margin);
        let mut world = World::new(table, s.physics);

        // Four corners plus two side pockets on the long cushions
        let m = s.margin;
        for y in [m, height - m] {
            for x in [m, width / 2.0, width - m] {
                world.add_pocket(Pocket::new(
                    Vec2::new(x, y),
                    s.pocket_capture_radius,
                    s.pocket_pull_radius,
                ));
            }
        }

        self.groups = [None, None];
        self.break_spot = Vec2::new(width * 0.25, height / 2.0);
        world.spawn(DiscRole::Cue, self.break_spot, s.ball_radius);

        let apex = Vec2::new(width * 0.7, height / 2.0);
        let mut rack = rack_positions(apex, s.ball_radius);
        rack.sort_by_key(|(number, _)| *number);
        for (number, pos) in rack {
            world.spawn(ball_role(number), pos, s.ball_radius);
        }

        log::debug!("Pool table {}x{} racked ({} discs)", width, height, world.discs.len());
        world
    }

    fn shot_velocity(&self, angle: f32, power: f32) -> Vec2 {
        scaled_shot(angle, power, self.settings.max_shot_speed)
    }

    fn default_aim(&self, _player: PlayerId) -> f32 {
        // Toward the rack
        0.0
    }

    fn prepare_turn(&self, _player: PlayerId, world: &mut World) {
        if world.shooter().is_some_and(|d| d.pocketed) {
            self.respawn_cue(world);
        }
    }

    fn finish_turn(
        &mut self,
        tally: &CaptureTally,
        shooter: PlayerId,
        scores: [u32; 2],
        world: &mut World,
    ) -> TurnOutcome {
        let opponent = shooter.other();
        let own_before = self.group_of(shooter);
        let cleared_before = own_before.is_some_and(|g| {
            Self::balls_left(world, g) + tally.count(|r| r.group() == Some(g)) == 0
        });

        let foul_reason = self.foul_reason(tally, own_before, cleared_before);
        let foul = foul_reason.is_some();
        let scratched = tally.contains(DiscRole::Cue);

        // Once groups are set, sinking any of the opponent's balls loses the game
        if let Some(own) = own_before {
            if tally.count(|r| r.group() == Some(own.other())) > 0 {
                if scratched {
                    self.respawn_cue(world);
                }
                return TurnOutcome {
                    foul: true,
                    message: format!("Foul! {} pocketed the opponent's ball. {} wins!", shooter, opponent),
                    continue_turn: false,
                    scores: self.recount_scores(world, scores),
                    result: Some(GameResult::Winner(opponent)),
                };
            }
        }

        if tally.contains(DiscRole::Eight) {
            let won = !foul && cleared_before;
            let (result, message) = if won {
                (GameResult::Winner(shooter), format!("{} sinks the 8-ball and wins!", shooter))
            } else {
                (
                    GameResult::Winner(opponent),
                    format!("{} sank the 8-ball early. {} wins!", shooter, opponent),
                )
            };
            return TurnOutcome {
                foul,
                message,
                continue_turn: false,
                scores: self.recount_scores(world, scores),
                result: Some(result),
            };
        }

        if !foul && own_before.is_none() {
            if let Some(group) = tally.roles().find_map(|r| r.group()) {
                self.assign(shooter, group);
            }
        }

        let own = self.group_of(shooter);
        let potted_own = own.map_or(0, |g| tally.count(|r| r.group() == Some(g)));

        if scratched {
            self.respawn_cue(world);
        }
        let scores = self.recount_scores(world, scores);

        let continue_turn = !foul && potted_own > 0;
        let message = match foul_reason {
            Some(reason) => format!("{}. {}'s turn", reason, opponent),
            None if continue_turn => match own {
                Some(group) if own_before.is_none() => {
                    format!("{} takes {}. Shoot again", shooter, group.as_str())
                }
                _ => format!("{} shoots again", shooter),
            },
            None => format!("{}'s turn", opponent),
        };

        TurnOutcome {
            foul,
            message,
            continue_turn,
            scores,
            result: None,
        }
    }

    fn legal_targets<'w>(&self, player: PlayerId, world: &'w World) -> Vec<&'w Disc> {
        let objects: Vec<&Disc> = world.on_table().filter(|d| !d.role.is_shooter()).collect();

        let legal: Vec<&Disc> = match self.group_of(player) {
            Some(group) if Self::balls_left(world, group) > 0 => objects
                .iter()
                .copied()
                .filter(|d| d.role.group() == Some(group))
                .collect(),
            Some(_) => objects
                .iter()
                .copied()
                .filter(|d| d.role == DiscRole::Eight)
                .collect(),
            None => objects
                .iter()
                .copied()
                .filter(|d| d.role.group().is_some())
                .collect(),
        };

        if legal.is_empty() { objects } else { legal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Capture;

    fn setup() -> (PoolRules, World) {
        let mut rules = PoolRules::new(PoolSettings::default());
        let world = rules.setup(800.0, 400.0);
        (rules, world)
    }

    fn id_of(world: &World, role: DiscRole) -> u32 {
        world.discs.iter().find(|d| d.role == role).map(|d| d.id).unwrap()
    }

    /// Mark a disc pocketed and record it in the tally
    fn pot(world: &mut World, tally: &mut CaptureTally, role: DiscRole) {
        let id = id_of(world, role);
        let pocket = world.pockets[0].pos;
        world.disc_mut(id).unwrap().capture(pocket);
        tally.record(Capture {
            disc_id: id,
            role,
            pocket: 0,
        });
    }

    #[test]
    fn test_setup_layout() {
        let (rules, world) = setup();
        assert_eq!(world.pockets.len(), 6);
        assert_eq!(world.discs.len(), 16);
        assert_eq!(world.shooter().unwrap().pos, rules.break_spot());
        assert_eq!(world.discs.iter().filter(|d| d.role == DiscRole::Eight).count(), 1);
        assert_eq!(world.discs.iter().filter(|d| d.role.group() == Some(BallGroup::Solids)).count(), 7);

        for (i, a) in world.discs.iter().enumerate() {
            assert!(world.table.contains(a.pos, a.radius));
            for b in &world.discs[i + 1..] {
                assert!((a.pos - b.pos).length() >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn test_rack_puts_eight_in_the_middle() {
        let rack = rack_positions(Vec2::new(500.0, 200.0), 10.0);
        let eight = rack.iter().find(|(n, _)| *n == 8).unwrap().1;
        assert!((eight.y - 200.0).abs() < 1e-5);
        assert!(eight.x > 500.0);
    }

    #[test]
    fn test_first_legal_pot_assigns_groups_and_continues() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Stripe(11));

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(!outcome.foul);
        assert!(outcome.continue_turn);
        assert_eq!(rules.group_of(PlayerId::One), Some(BallGroup::Stripes));
        assert_eq!(rules.group_of(PlayerId::Two), Some(BallGroup::Solids));
        assert_eq!(outcome.scores, [1, 0]);
    }

    #[test]
    fn test_scratch_is_foul_and_respawns_cue() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Cue);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(outcome.foul);
        assert!(!outcome.continue_turn);
        assert!(outcome.result.is_none());
        let cue = world.shooter().unwrap();
        assert!(!cue.pocketed);
        assert_eq!(cue.pos, rules.break_spot());
    }

    #[test]
    fn test_scratch_blocks_group_assignment() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Cue);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(outcome.foul);
        assert_eq!(rules.groups(), [None, None]);
    }

    #[test]
    fn test_missing_everything_is_foul() {
        let (mut rules, mut world) = setup();
        let outcome = rules.finish_turn(&CaptureTally::default(), PlayerId::Two, [0, 0], &mut world);
        assert!(outcome.foul);
        assert!(outcome.message.contains("no ball hit"));
    }

    #[test]
    fn test_hitting_opponent_group_first_is_foul() {
        let (mut rules, mut world) = setup();
        rules.assign(PlayerId::One, BallGroup::Solids);
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Stripe(9));
        pot(&mut world, &mut tally, DiscRole::Solid(2));

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(outcome.foul);
        assert!(!outcome.continue_turn);
        // The pocketed solid still counts for its owner
        assert_eq!(outcome.scores[0], 1);
    }

    #[test]
    fn test_early_eight_loses() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Eight);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert_eq!(outcome.result, Some(GameResult::Winner(PlayerId::Two)));
    }

    #[test]
    fn test_eight_after_clearing_wins() {
        let (mut rules, mut world) = setup();
        rules.assign(PlayerId::Two, BallGroup::Stripes);
        for n in 9..=15 {
            let id = id_of(&world, DiscRole::Stripe(n));
            world.disc_mut(id).unwrap().capture(Vec2::new(20.0, 20.0));
        }
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Eight);
        pot(&mut world, &mut tally, DiscRole::Eight);

        let outcome = rules.finish_turn(&tally, PlayerId::Two, [0, 0], &mut world);
        assert!(!outcome.foul);
        assert_eq!(outcome.result, Some(GameResult::Winner(PlayerId::Two)));
        assert_eq!(outcome.scores[1], 7);
    }

    #[test]
    fn test_eight_with_scratch_loses_even_when_cleared() {
        let (mut rules, mut world) = setup();
        rules.assign(PlayerId::One, BallGroup::Solids);
        for n in 1..=7 {
            let id = id_of(&world, DiscRole::Solid(n));
            world.disc_mut(id).unwrap().capture(Vec2::new(20.0, 20.0));
        }
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Eight);
        pot(&mut world, &mut tally, DiscRole::Eight);
        pot(&mut world, &mut tally, DiscRole::Cue);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert_eq!(outcome.result, Some(GameResult::Winner(PlayerId::Two)));
    }

    #[test]
    fn test_pocketing_opponent_ball_forfeits() {
        let (mut rules, mut world) = setup();
        rules.assign(PlayerId::One, BallGroup::Solids);

        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(3));
        pot(&mut world, &mut tally, DiscRole::Stripe(10));
        // An own ball in the same shot does not save it
        pot(&mut world, &mut tally, DiscRole::Solid(3));

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(outcome.foul);
        assert!(!outcome.continue_turn);
        assert_eq!(outcome.result, Some(GameResult::Winner(PlayerId::Two)));
        assert_eq!(outcome.scores, [1, 1]);
    }

    #[test]
    fn test_mixed_pot_while_groups_open_is_not_forfeit() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Solid(1));
        pot(&mut world, &mut tally, DiscRole::Stripe(9));

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(!outcome.foul);
        assert!(outcome.result.is_none());
        assert_eq!(rules.group_of(PlayerId::One), Some(BallGroup::Solids));
        assert!(outcome.continue_turn);
    }

    #[test]
    fn test_legal_targets_follow_groups() {
        let (mut rules, mut world) = setup();
        assert_eq!(rules.legal_targets(PlayerId::One, &world).len(), 14);

        rules.assign(PlayerId::One, BallGroup::Solids);
        let targets = rules.legal_targets(PlayerId::One, &world);
        assert_eq!(targets.len(), 7);
        assert!(targets.iter().all(|d| d.role.group() == Some(BallGroup::Solids)));

        for n in 1..=7 {
            let id = id_of(&world, DiscRole::Solid(n));
            world.disc_mut(id).unwrap().capture(Vec2::new(20.0, 20.0));
        }
        let targets = rules.legal_targets(PlayerId::One, &world);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].role, DiscRole::Eight);
    }
}
