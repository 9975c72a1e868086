//! Pocket capture: soft pull near the lip, hard capture inside
//!
//! When a disc is inside the capture radius of two pockets in the same
//! tick, the first pocket in iteration order takes it. Only degenerate
//! table layouts can produce that case.

use serde::{Deserialize, Serialize};

use super::disc::{Disc, DiscRole, Pocket};

/// One disc dropping into a pocket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub disc_id: u32,
    pub role: DiscRole,
    /// Index into the world's pocket list
    pub pocket: usize,
}

/// Pull moving discs toward nearby pockets and capture the ones inside
pub fn check_captures(discs: &mut [Disc], pockets: &[Pocket], pull_strength: f32) -> Vec<Capture> {
    let mut captures = Vec::new();

    for disc in discs.iter_mut().filter(|d| !d.pocketed) {
        for (index, pocket) in pockets.iter().enumerate() {
            let to_pocket = pocket.pos - disc.pos;
            let dist = to_pocket.length();

            if dist < pocket.capture_radius {
                disc.capture(pocket.pos);
                captures.push(Capture {
                    disc_id: disc.id,
                    role: disc.role,
                    pocket: index,
                });
                log::trace!("{} (#{}) captured by pocket {}", disc.role.label(), disc.id, index);
                break;
            }

            // Lip drag: even a disc at rest here creeps in
            if dist < pocket.pull_radius {
                let falloff = (pocket.pull_radius - dist) / pocket.pull_radius;
                disc.vel += to_pocket.normalize_or_zero() * pull_strength * falloff;
                disc.moving = true;
            }
        }
    }

    captures
}

/// Everything that happened to the balls during one shot.
///
/// Reset when a shot is committed, consumed when the turn is resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureTally {
    /// Captures in the order they happened
    pub captures: Vec<Capture>,
    /// Role of the first disc the cue ball or striker touched
    pub first_contact: Option<DiscRole>,
}

impl CaptureTally {
    pub fn reset(&mut self) {
        self.captures.clear();
        self.first_contact = None;
    }

    pub fn record(&mut self, capture: Capture) {
        self.captures.push(capture);
    }

    /// Record the shooter's first contact; later contacts are ignored
    pub fn record_first_contact(&mut self, role: DiscRole) {
        if self.first_contact.is_none() {
            self.first_contact = Some(role);
        }
    }

    pub fn count(&self, pred: impl Fn(&DiscRole) -> bool) -> usize {
        self.captures.iter().filter(|c| pred(&c.role)).count()
    }

    pub fn contains(&self, role: DiscRole) -> bool {
        self.captures.iter().any(|c| c.role == role)
    }

    pub fn roles(&self) -> impl Iterator<Item = DiscRole> + '_ {
        self.captures.iter().map(|c| c.role)
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn corner_pocket() -> Pocket {
        Pocket::new(Vec2::new(20.0, 20.0), 20.0, 30.0)
    }

    #[test]
    fn test_capture_snaps_to_center() {
        let mut discs = vec![Disc::new(4, DiscRole::Solid(4), Vec2::new(30.0, 30.0), 10.0)];
        discs[0].strike(Vec2::new(-2.0, -2.0));

        let captures = check_captures(&mut discs, &[corner_pocket()], 0.4);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].disc_id, 4);
        assert_eq!(captures[0].role, DiscRole::Solid(4));
        assert!(discs[0].pocketed);
        assert_eq!(discs[0].pos, Vec2::new(20.0, 20.0));
        assert_eq!(discs[0].vel, Vec2::ZERO);

        // A second pass finds nothing new
        assert!(check_captures(&mut discs, &[corner_pocket()], 0.4).is_empty());
    }

    #[test]
    fn test_pull_zone_nudges_moving_disc_inward() {
        let start = Vec2::new(45.0, 20.0);
        let mut discs = vec![Disc::new(1, DiscRole::Cue, start, 10.0)];
        discs[0].strike(Vec2::new(0.0, 1.0));

        let captures = check_captures(&mut discs, &[corner_pocket()], 0.4);
        assert!(captures.is_empty());
        assert!(discs[0].moving);
        // Distance 25 of 30: falloff 1/6 toward -X
        assert!((discs[0].vel.x + 0.4 / 6.0).abs() < 1e-5);
        assert!((discs[0].vel.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_resting_disc_on_lip_is_woken_and_pulled() {
        let mut discs = vec![Disc::new(1, DiscRole::Queen, Vec2::new(45.0, 20.0), 10.0)];
        let captures = check_captures(&mut discs, &[corner_pocket()], 0.4);
        assert!(captures.is_empty());
        assert!(discs[0].moving);
        // Distance 25 of 30: falloff 1/6 toward -X
        assert!((discs[0].vel.x + 0.4 / 6.0).abs() < 1e-5);
        assert_eq!(discs[0].vel.y, 0.0);
    }

    #[test]
    fn test_disc_outside_pull_radius_is_untouched() {
        let mut discs = vec![Disc::new(1, DiscRole::Queen, Vec2::new(60.0, 20.0), 10.0)];
        check_captures(&mut discs, &[corner_pocket()], 0.4);
        assert!(!discs[0].moving);
        assert_eq!(discs[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_first_pocket_wins_on_overlap() {
        let a = Pocket::new(Vec2::new(100.0, 100.0), 20.0, 30.0);
        let b = Pocket::new(Vec2::new(110.0, 100.0), 20.0, 30.0);
        let mut discs = vec![Disc::new(1, DiscRole::DarkCoin, Vec2::new(105.0, 100.0), 10.0)];
        let captures = check_captures(&mut discs, &[a, b], 0.5);
        assert_eq!(captures[0].pocket, 0);
        assert_eq!(discs[0].pos, a.pos);
    }

    #[test]
    fn test_tally_first_contact_sticks() {
        let mut tally = CaptureTally::default();
        tally.record_first_contact(DiscRole::Stripe(9));
        tally.record_first_contact(DiscRole::Eight);
        assert_eq!(tally.first_contact, Some(DiscRole::Stripe(9)));

        tally.record(Capture {
            disc_id: 9,
            role: DiscRole::Stripe(9),
            pocket: 2,
        });
        assert_eq!(tally.count(|r| r.group().is_some()), 1);
        assert!(tally.contains(DiscRole::Stripe(9)));

        tally.reset();
        assert!(tally.is_empty());
        assert_eq!(tally.first_contact, None);
    }
}
