//! Carrom rules
//!
//! Either player may pocket any piece. Pieces score by color, the queen is
//! worth a bonus, and pocketing the striker costs a penalty and the turn.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6};

use glam::Vec2;

use super::{GameResult, RuleSetKind, Rules, TurnOutcome, scaled_shot};
use crate::game::PlayerId;
use crate::settings::CarromSettings;
use crate::sim::{CaptureTally, Disc, DiscRole, Pocket, Table, World};

#[derive(Debug, Clone)]
pub struct CarromRules {
    settings: CarromSettings,
    table: Table,
}

impl CarromRules {
    pub fn new(settings: CarromSettings) -> Self {
        let table = Table::new(0.0, 0.0, settings.margin);
        Self { settings, table }
    }

    /// Striker start position for `player` (player one shoots from the bottom)
    pub fn baseline_spot(&self, player: PlayerId) -> Vec2 {
        let inset = self.table.height * self.settings.baseline_inset;
        let y = match player {
            PlayerId::One => self.table.height - self.table.margin - inset,
            PlayerId::Two => self.table.margin + inset,
        };
        Vec2::new(self.table.width / 2.0, y)
    }

    /// Horizontal extent of the baseline
    pub fn baseline_range(&self) -> (f32, f32) {
        let cx = self.table.width / 2.0;
        let half = self.table.width * self.settings.baseline_half_length;
        (cx - half, cx + half)
    }

    /// Points for one pocketed piece
    pub fn piece_value(&self, role: DiscRole) -> u32 {
        match role {
            DiscRole::LightCoin => self.settings.light_value,
            DiscRole::DarkCoin => self.settings.dark_value,
            DiscRole::Queen => self.settings.queen_value,
            _ => 0,
        }
    }

    /// Queen in the center, six coins around it and twelve in the outer ring
    fn ring_positions(center: Vec2, coin_radius: f32) -> Vec<(DiscRole, Vec2)> {
        let d = coin_radius * 2.0 + 1.0;
        let mut pieces = vec![(DiscRole::Queen, center)];

        for k in 0..6 {
            let theta = k as f32 * FRAC_PI_3;
            let role = if k % 2 == 0 { DiscRole::LightCoin } else { DiscRole::DarkCoin };
            pieces.push((role, center + crate::direction(theta) * d));
        }

        // Outer ring is hex-packed: corners at 2d, edge midpoints at sqrt(3)d
        for k in 0..12 {
            let theta = k as f32 * FRAC_PI_6;
            let r = if k % 2 == 0 { 2.0 * d } else { 3f32.sqrt() * d };
            let role = if k % 2 == 0 { DiscRole::DarkCoin } else { DiscRole::LightCoin };
            pieces.push((role, center + crate::direction(theta) * r));
        }

        pieces
    }
}

impl Rules for CarromRules {
    fn kind(&self) -> RuleSetKind {
        RuleSetKind::Carrom
    }

    fn setup(&mut self, width: f32, height: f32) -> World {
        let s = &self.settings;
        self.table = Table::new(width, height, s.margin);
        let mut world = World::new(self.table, s.physics);

        let m = s.margin;
        for y in [m, height - m] {
            for x in [m, width - m] {
                world.add_pocket(Pocket::new(
                    Vec2::new(x, y),
                    s.pocket_capture_radius,
                    s.pocket_pull_radius,
                ));
            }
        }

        let striker_radius = s.striker_radius;
        let coin_radius = s.coin_radius;
        for (role, pos) in Self::ring_positions(self.table.center(), coin_radius) {
            world.spawn(role, pos, coin_radius);
        }
        world.spawn(DiscRole::Striker, self.baseline_spot(PlayerId::One), striker_radius);

        log::debug!("Carrom board {}x{} set ({} discs)", width, height, world.discs.len());
        world
    }

    fn shot_velocity(&self, angle: f32, power: f32) -> Vec2 {
        scaled_shot(angle, power, self.settings.max_shot_speed)
    }

    fn default_aim(&self, player: PlayerId) -> f32 {
        // Straight across the board
        match player {
            PlayerId::One => -FRAC_PI_2,
            PlayerId::Two => FRAC_PI_2,
        }
    }

    fn prepare_turn(&self, player: PlayerId, world: &mut World) {
        if let Some(id) = world.shooter().map(|d| d.id) {
            world.respawn(id, self.baseline_spot(player), Vec2::X);
        }
    }

    fn finish_turn(
        &mut self,
        tally: &CaptureTally,
        shooter: PlayerId,
        scores: [u32; 2],
        world: &mut World,
    ) -> TurnOutcome {
        let mut scores = scores;
        let slot = shooter.index();
        let points: u32 = tally.roles().map(|r| self.piece_value(r)).sum();
        let striker_down = tally.contains(DiscRole::Striker);

        let (foul, continue_turn, message) = if striker_down {
            scores[slot] = scores[slot].saturating_sub(self.settings.striker_penalty);
            (
                true,
                false,
                format!(
                    "Foul! Striker pocketed (-{}). {}'s turn",
                    self.settings.striker_penalty,
                    shooter.other()
                ),
            )
        } else if points > 0 {
            scores[slot] += points;
            let queen = if tally.contains(DiscRole::Queen) { " with the queen" } else { "" };
            (false, true, format!("{} scores {}{}. Shoot again", shooter, points, queen))
        } else {
            (false, false, format!("{}'s turn", shooter.other()))
        };

        let remaining = world.on_table().filter(|d| !d.role.is_shooter()).count();
        let result = (remaining == 0).then(|| {
            let [a, b] = scores;
            if a > b {
                GameResult::Winner(PlayerId::One)
            } else if b > a {
                GameResult::Winner(PlayerId::Two)
            } else {
                GameResult::Draw
            }
        });

        let message = match result {
            Some(GameResult::Winner(p)) => format!("Board cleared. {} wins {}-{}!", p, scores[0], scores[1]),
            Some(GameResult::Draw) => format!("Board cleared. Tie at {}!", scores[0]),
            None => message,
        };

        TurnOutcome {
            foul,
            message,
            continue_turn,
            scores,
            result,
        }
    }

    fn legal_targets<'w>(&self, _player: PlayerId, world: &'w World) -> Vec<&'w Disc> {
        world.on_table().filter(|d| !d.role.is_shooter()).collect()
    }

    fn place_shooter(&self, player: PlayerId, x: f32, world: &mut World) -> bool {
        let (lo, hi) = self.baseline_range();
        let spot = Vec2::new(x.clamp(lo, hi), self.baseline_spot(player).y);
        let Some((id, radius)) = world.shooter().map(|d| (d.id, d.radius)) else {
            return false;
        };
        if !world.is_free(spot, radius, id) {
            return false;
        }
        match world.disc_mut(id) {
            Some(striker) => {
                striker.respawn(spot);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CarromSettings;
    use crate::sim::Capture;

    fn setup() -> (CarromRules, World) {
        let mut rules = CarromRules::new(CarromSettings::default());
        let world = rules.setup(600.0, 600.0);
        (rules, world)
    }

    fn pot_first(world: &mut World, tally: &mut CaptureTally, role: DiscRole) {
        let id = world
            .discs
            .iter()
            .find(|d| d.role == role && !d.pocketed)
            .map(|d| d.id)
            .unwrap();
        world.disc_mut(id).unwrap().capture(Vec2::new(20.0, 20.0));
        tally.record(Capture {
            disc_id: id,
            role,
            pocket: 0,
        });
    }

    #[test]
    fn test_setup_layout() {
        let (rules, world) = setup();
        assert_eq!(world.pockets.len(), 4);
        assert_eq!(world.discs.len(), 20);
        let count = |role| world.discs.iter().filter(|d| d.role == role).count();
        assert_eq!(count(DiscRole::LightCoin), 9);
        assert_eq!(count(DiscRole::DarkCoin), 9);
        assert_eq!(count(DiscRole::Queen), 1);
        assert_eq!(world.shooter().unwrap().pos, rules.baseline_spot(PlayerId::One));

        for (i, a) in world.discs.iter().enumerate() {
            assert!(world.table.contains(a.pos, a.radius));
            for b in &world.discs[i + 1..] {
                assert!((a.pos - b.pos).length() >= a.radius + b.radius - 1e-3);
            }
        }
    }

    #[test]
    fn test_queen_scores_and_continues() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        pot_first(&mut world, &mut tally, DiscRole::Queen);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [0, 0], &mut world);
        assert!(!outcome.foul);
        assert!(outcome.continue_turn);
        assert_eq!(outcome.scores, [50, 0]);
        assert!(outcome.result.is_none());
    }

    #[test]
    fn test_striker_penalty_floors_at_zero() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        pot_first(&mut world, &mut tally, DiscRole::Striker);

        let outcome = rules.finish_turn(&tally, PlayerId::Two, [40, 5], &mut world);
        assert!(outcome.foul);
        assert!(!outcome.continue_turn);
        assert_eq!(outcome.scores, [40, 0]);
    }

    #[test]
    fn test_striker_foul_voids_pieces_pocketed_with_it() {
        let (mut rules, mut world) = setup();
        let mut tally = CaptureTally::default();
        pot_first(&mut world, &mut tally, DiscRole::LightCoin);
        pot_first(&mut world, &mut tally, DiscRole::Striker);

        let outcome = rules.finish_turn(&tally, PlayerId::One, [30, 0], &mut world);
        assert!(outcome.foul);
        assert!(!outcome.continue_turn);
        assert_eq!(outcome.scores, [20, 0]);
    }

    #[test]
    fn test_empty_shot_passes_turn() {
        let (mut rules, mut world) = setup();
        let outcome = rules.finish_turn(&CaptureTally::default(), PlayerId::One, [0, 0], &mut world);
        assert!(!outcome.foul);
        assert!(!outcome.continue_turn);
    }

    #[test]
    fn test_clearing_board_ends_game() {
        let (mut rules, mut world) = setup();
        for disc in world.discs.iter_mut().filter(|d| !d.role.is_shooter() && d.role != DiscRole::Queen) {
            disc.capture(Vec2::new(20.0, 20.0));
        }
        let mut tally = CaptureTally::default();
        pot_first(&mut world, &mut tally, DiscRole::Queen);

        let outcome = rules.finish_turn(&tally, PlayerId::Two, [100, 60], &mut world);
        assert_eq!(outcome.scores, [100, 110]);
        assert_eq!(outcome.result, Some(GameResult::Winner(PlayerId::Two)));

        let (mut rules, mut world) = setup();
        for disc in world.discs.iter_mut().filter(|d| !d.role.is_shooter()) {
            disc.capture(Vec2::new(20.0, 20.0));
        }
        let outcome = rules.finish_turn(&CaptureTally::default(), PlayerId::One, [70, 70], &mut world);
        assert_eq!(outcome.result, Some(GameResult::Draw));
    }

    #[test]
    fn test_prepare_turn_moves_striker_to_baseline() {
        let (rules, mut world) = setup();
        world.shooter_mut().unwrap().capture(Vec2::new(580.0, 580.0));
        rules.prepare_turn(PlayerId::Two, &mut world);
        let striker = world.shooter().unwrap();
        assert!(!striker.pocketed);
        assert_eq!(striker.pos, rules.baseline_spot(PlayerId::Two));
    }

    #[test]
    fn test_place_shooter_clamps_to_baseline() {
        let (rules, mut world) = setup();
        assert!(rules.place_shooter(PlayerId::One, 10_000.0, &mut world));
        let (_, hi) = rules.baseline_range();
        let striker = world.shooter().unwrap();
        assert_eq!(striker.pos.x, hi);
        assert_eq!(striker.pos.y, rules.baseline_spot(PlayerId::One).y);
    }

    #[test]
    fn test_all_pieces_are_targets() {
        let (rules, world) = setup();
        assert_eq!(rules.legal_targets(PlayerId::Two, &world).len(), 19);
    }
}
