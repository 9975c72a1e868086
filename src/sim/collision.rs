//! Disc-disc collision detection and response
//!
//! Discrete overlap testing once per tick. Overlapping pairs exchange the
//! normal component of their velocities (1-D elastic collision, mass taken
//! as radius squared) and are pushed apart along the contact normal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::disc::Disc;
use super::step::enforce_bounds;
use super::table::Table;
use crate::consts::SEPARATION_PASSES;

/// Below this center distance the contact normal is undefined
const DEGENERATE_DISTANCE: f32 = 1e-6;

/// A detected overlap between two discs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: u32,
    pub b: u32,
    /// Unit normal pointing from `a` toward `b`
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl Contact {
    /// The other disc of the pair, if `id` is part of it
    pub fn partner_of(&self, id: u32) -> Option<u32> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Check two discs for overlap
pub fn disc_overlap(a: &Disc, b: &Disc) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return None;
    }

    let normal = if dist > DEGENERATE_DISTANCE {
        delta / dist
    } else {
        fallback_normal(a, b)
    };

    Some(Contact {
        a: a.id,
        b: b.id,
        normal,
        penetration: min_dist - dist,
    })
}

/// Normal for coincident centers: along the approach direction, else +X
fn fallback_normal(a: &Disc, b: &Disc) -> Vec2 {
    let approach = (a.vel - b.vel).normalize_or_zero();
    if approach == Vec2::ZERO {
        Vec2::X
    } else {
        approach
    }
}

/// Exchange normal velocity components if the pair is approaching
pub fn exchange_normal_velocity(a: &mut Disc, b: &mut Disc, normal: Vec2) {
    let u1 = a.vel.dot(normal);
    let u2 = b.vel.dot(normal);
    if u1 - u2 <= 0.0 {
        return;
    }

    let m1 = a.radius * a.radius;
    let m2 = b.radius * b.radius;
    let total = m1 + m2;
    let v1 = ((m1 - m2) * u1 + 2.0 * m2 * u2) / total;
    let v2 = ((m2 - m1) * u2 + 2.0 * m1 * u1) / total;

    a.vel += (v1 - u1) * normal;
    b.vel += (v2 - u2) * normal;
}

/// Split the overlap equally between both discs
fn separate(a: &mut Disc, b: &mut Disc, contact: &Contact) {
    let push = contact.normal * (contact.penetration * 0.5);
    a.pos -= push;
    b.pos += push;
}

/// Mutable access to two distinct elements
fn pair_mut(discs: &mut [Disc], i: usize, j: usize) -> (&mut Disc, &mut Disc) {
    debug_assert!(i < j);
    let (left, right) = discs.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

/// Resolve every overlapping pair of non-pocketed discs.
///
/// The first pass exchanges velocities and corrects positions; further
/// passes only push apart pairs that the first pass or the cushions left
/// overlapping. Returns the contacts found in the first pass.
pub fn resolve_collisions(discs: &mut [Disc], table: &Table, wall_restitution: f32) -> Vec<Contact> {
    let mut contacts = Vec::new();
    let n = discs.len();

    for i in 0..n {
        for j in (i + 1)..n {
            if discs[i].pocketed || discs[j].pocketed {
                continue;
            }
            let Some(contact) = disc_overlap(&discs[i], &discs[j]) else {
                continue;
            };
            let (a, b) = pair_mut(discs, i, j);
            exchange_normal_velocity(a, b, contact.normal);
            separate(a, b, &contact);
            a.moving = true;
            b.moving = true;
            contacts.push(contact);
        }
    }

    if contacts.is_empty() {
        return contacts;
    }
    enforce_bounds(discs, table, wall_restitution);

    for _ in 1..SEPARATION_PASSES {
        let mut corrected = false;
        for i in 0..n {
            for j in (i + 1)..n {
                if discs[i].pocketed || discs[j].pocketed {
                    continue;
                }
                if let Some(contact) = disc_overlap(&discs[i], &discs[j]) {
                    let (a, b) = pair_mut(discs, i, j);
                    separate(a, b, &contact);
                    corrected = true;
                }
            }
        }
        enforce_bounds(discs, table, wall_restitution);
        if !corrected {
            break;
        }
    }

    contacts
}
