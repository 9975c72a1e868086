//! The simulated table: discs, pockets and the per-tick pipeline

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, resolve_collisions};
use super::disc::{Disc, DiscRole, Pocket};
use super::pocket::{Capture, check_captures};
use super::step::{PhysicsParams, all_at_rest, step};
use super::table::Table;
use crate::consts::RESPAWN_SEARCH_STEP;

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub contacts: Vec<Contact>,
    pub captures: Vec<Capture>,
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub table: Table,
    pub params: PhysicsParams,
    /// Discs in stable id order
    pub discs: Vec<Disc>,
    pub pockets: Vec<Pocket>,
    next_id: u32,
}

impl World {
    pub fn new(table: Table, params: PhysicsParams) -> Self {
        Self {
            table,
            params,
            discs: Vec::new(),
            pockets: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a resting disc, returning its id
    pub fn spawn(&mut self, role: DiscRole, pos: Vec2, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.discs.push(Disc::new(id, role, pos, radius));
        id
    }

    pub fn add_pocket(&mut self, pocket: Pocket) {
        self.pockets.push(pocket);
    }

    pub fn disc(&self, id: u32) -> Option<&Disc> {
        self.discs.iter().find(|d| d.id == id)
    }

    pub fn disc_mut(&mut self, id: u32) -> Option<&mut Disc> {
        self.discs.iter_mut().find(|d| d.id == id)
    }

    /// The cue ball or striker
    pub fn shooter(&self) -> Option<&Disc> {
        self.discs.iter().find(|d| d.role.is_shooter())
    }

    pub fn shooter_mut(&mut self) -> Option<&mut Disc> {
        self.discs.iter_mut().find(|d| d.role.is_shooter())
    }

    /// Discs still on the table
    pub fn on_table(&self) -> impl Iterator<Item = &Disc> {
        self.discs.iter().filter(|d| !d.pocketed)
    }

    pub fn is_settled(&self) -> bool {
        all_at_rest(&self.discs)
    }

    /// One tick: integrate, resolve collisions, then pockets
    pub fn tick(&mut self) -> TickReport {
        step(&mut self.discs, &self.table, &self.params);
        let contacts = resolve_collisions(&mut self.discs, &self.table, self.params.wall_restitution);
        let captures = check_captures(&mut self.discs, &self.pockets, self.params.pull_strength);
        TickReport { contacts, captures }
    }

    /// Force every disc to rest (shot safety cap)
    pub fn halt(&mut self) {
        for disc in &mut self.discs {
            disc.stop();
        }
    }

    /// True if a disc of `radius` at `pos` would overlap nothing on the table
    /// (ignoring disc `ignore`) and sits inside the cushions
    pub fn is_free(&self, pos: Vec2, radius: f32, ignore: u32) -> bool {
        self.table.contains(pos, radius)
            && self
                .on_table()
                .filter(|d| d.id != ignore)
                .all(|d| (d.pos - pos).length() >= d.radius + radius)
            && self
                .pockets
                .iter()
                .all(|p| (p.pos - pos).length() >= p.pull_radius)
    }

    /// Nearest free spot to `preferred`, searching both ways along `axis`
    pub fn find_free_spot(&self, preferred: Vec2, radius: f32, axis: Vec2, ignore: u32) -> Vec2 {
        let preferred = self.table.clamp(preferred, radius);
        if self.is_free(preferred, radius, ignore) {
            return preferred;
        }

        let axis = axis.normalize_or_zero();
        let reach = self.table.width.max(self.table.height);
        let steps = (reach / RESPAWN_SEARCH_STEP) as i32;
        for k in 1..=steps {
            for sign in [1.0, -1.0] {
                let candidate = preferred + axis * (k as f32 * RESPAWN_SEARCH_STEP * sign);
                if self.table.contains(candidate, radius) && self.is_free(candidate, radius, ignore) {
                    return candidate;
                }
            }
        }

        log::warn!("No free spot near {:?}; respawning on top of the table", preferred);
        preferred
    }

    /// Put a disc back on the table at the nearest free spot
    pub fn respawn(&mut self, id: u32, preferred: Vec2, axis: Vec2) {
        let Some(radius) = self.disc(id).map(|d| d.radius) else {
            return;
        };
        let spot = self.find_free_spot(preferred, radius, axis, id);
        if let Some(disc) = self.disc_mut(id) {
            disc.respawn(spot);
        }
    }
}
