//! The engine: one writer for the world, turn state and rules
//!
//! Driven by an external clock calling `tick()`. Inputs are plain method
//! calls that only take effect while the current (human) shooter is
//! aiming; everything else is ignored and logged at debug level.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scheduler::{Scheduler, TaskId};
use super::snapshot::Snapshot;
use super::state::{GameMode, GamePhase, PlayerId, TurnState};
use crate::consts::{DEFAULT_AIM_POWER, MAX_AIM_POWER, MAX_SHOT_TICKS};
use crate::normalize_angle;
use crate::opponent::{ShotPlan, plan_shot};
use crate::rules::{GameResult, RuleSet, RuleSetKind, Rules};
use crate::settings::Settings;
use crate::sim::step::kinetic_sum;
use crate::sim::{CaptureTally, PhysicsParams, Table, TickReport, World};

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

type Observer = Box<dyn FnMut(&Snapshot)>;

/// Delayed steps of the computer's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpponentAction {
    /// Pick a target and show the aim
    Think,
    /// Take the shot
    Shoot,
}

pub struct Engine {
    settings: Settings,
    rules: RuleSet,
    world: World,
    turn: TurnState,
    tally: CaptureTally,
    scheduler: Scheduler<OpponentAction>,
    /// The computer's next delayed step, if one is queued
    opponent_task: Option<TaskId>,
    rng: Pcg32,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u32,
    running: bool,
    /// Ticks since `initialize`
    ticks: u64,
    /// Ticks spent in the current shot
    shot_ticks: u32,
}

impl Engine {
    /// Create an idle engine; nothing happens until `initialize`
    pub fn new(settings: Settings) -> Self {
        let rules = RuleSet::new(RuleSetKind::Pool, &settings);
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self {
            rules,
            world: World::new(Table::new(0.0, 0.0, 0.0), PhysicsParams::default()),
            turn: TurnState::new(GameMode::LocalTwoPlayer, 0.0),
            tally: CaptureTally::default(),
            scheduler: Scheduler::new(),
            opponent_task: None,
            rng,
            observers: Vec::new(),
            next_subscription: 1,
            running: false,
            ticks: 0,
            shot_ticks: 0,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> GamePhase {
        self.turn.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start a new game, discarding any game in progress
    pub fn initialize(&mut self, width: f32, height: f32, ruleset: RuleSetKind, mode: GameMode) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            log::warn!("initialize ignored: bad table size {}x{}", width, height);
            return;
        }

        // Any pending opponent move belongs to the old game
        self.scheduler.cancel_all();
        self.opponent_task = None;

        self.rules = RuleSet::new(ruleset, &self.settings);
        self.world = self.rules.setup(width, height);
        self.turn = TurnState::new(mode, self.rules.default_aim(PlayerId::One));
        self.tally.reset();
        self.rng = Pcg32::seed_from_u64(self.settings.seed);
        self.ticks = 0;
        self.shot_ticks = 0;
        self.running = true;

        log::info!(
            "New {} game on {}x{} ({:?}, {} discs)",
            ruleset,
            width,
            height,
            mode,
            self.world.discs.len()
        );

        self.start_turn(PlayerId::One);
        self.notify();
    }

    pub fn set_aim_angle(&mut self, radians: f32) {
        if !self.accepts_input("set_aim_angle") {
            return;
        }
        if !radians.is_finite() {
            log::debug!("set_aim_angle ignored: {} is not finite", radians);
            return;
        }
        self.turn.aim_angle = normalize_angle(radians);
        self.notify();
    }

    pub fn set_aim_power(&mut self, power: f32) {
        if !self.accepts_input("set_aim_power") {
            return;
        }
        if !(0.0..=MAX_AIM_POWER).contains(&power) {
            log::debug!("set_aim_power ignored: {} outside 0..={}", power, MAX_AIM_POWER);
            return;
        }
        self.turn.aim_power = power;
        self.notify();
    }

    /// Shoot with the current aim. Zero power is not a shot.
    pub fn commit_shot(&mut self) {
        if !self.accepts_input("commit_shot") {
            return;
        }
        if self.shoot() {
            self.notify();
        }
    }

    /// Slide the striker along the current shooter's baseline (carrom)
    pub fn place_striker(&mut self, x: f32) {
        if !self.accepts_input("place_striker") {
            return;
        }
        if !x.is_finite() {
            log::debug!("place_striker ignored: {} is not finite", x);
            return;
        }
        if self.rules.place_shooter(self.turn.current, x, &mut self.world) {
            self.notify();
        } else {
            log::debug!("place_striker ignored: x={} rejected by {} rules", x, self.rules.kind());
        }
    }

    /// The shot the computer would take for the current player
    pub fn suggest_shot(&mut self) -> Option<ShotPlan> {
        if !self.running || self.turn.phase != GamePhase::Aiming {
            return None;
        }
        plan_shot(
            &self.rules,
            self.turn.current,
            &self.world,
            &mut self.rng,
            &self.settings.opponent,
        )
    }

    /// Register an observer called with a snapshot after every tick and mutation
    pub fn subscribe(&mut self, observer: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            ruleset: self.rules.kind(),
            table: self.world.table,
            discs: self.world.discs.clone(),
            pockets: self.world.pockets.clone(),
            turn: self.turn.clone(),
            pool_groups: self.rules.pool_groups(),
            computer_thinking: self.turn.is_computer_turn() && self.opponent_task.is_some(),
        }
    }

    /// Stop ticking and drop pending opponent moves; `initialize` restarts
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduler.cancel_all();
        self.opponent_task = None;
        self.world.halt();
        log::info!("Engine torn down after {} ticks", self.ticks);
        self.notify();
    }

    /// Advance one tick of the external clock
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.ticks += 1;

        if self.turn.phase == GamePhase::Shooting {
            let report = self.world.tick();
            self.record(report);
            self.shot_ticks += 1;

            if self.shot_ticks >= MAX_SHOT_TICKS && !self.world.is_settled() {
                log::warn!(
                    "Shot still moving after {} ticks (total speed {:.2}); forcing discs to rest",
                    self.shot_ticks,
                    kinetic_sum(&self.world.discs)
                );
                self.world.halt();
            }
            if self.world.is_settled() {
                self.turn.phase = GamePhase::Resolving;
                self.resolve_turn();
            }
        }

        for action in self.scheduler.poll(self.ticks) {
            self.opponent_task = None;
            match action {
                OpponentAction::Think => self.opponent_think(),
                OpponentAction::Shoot => self.opponent_shoot(),
            }
        }

        self.notify();
    }

    fn accepts_input(&self, op: &str) -> bool {
        if !self.running {
            log::debug!("{} ignored: engine not running", op);
            false
        } else if self.turn.is_over() {
            log::debug!("{} ignored: game over", op);
            false
        } else if self.turn.phase != GamePhase::Aiming {
            log::debug!("{} ignored in {:?}", op, self.turn.phase);
            false
        } else if self.turn.is_computer_turn() {
            log::debug!("{} ignored: computer's turn", op);
            false
        } else {
            true
        }
    }

    /// Launch the shooter with the current aim; false when nothing moved
    fn shoot(&mut self) -> bool {
        if self.turn.aim_power <= 0.0 {
            log::debug!("Shot with zero power ignored");
            return false;
        }
        let velocity = self.rules.shot_velocity(self.turn.aim_angle, self.turn.aim_power);
        let Some(shooter) = self.world.shooter_mut().filter(|d| !d.pocketed) else {
            log::debug!("Shot ignored: no shooter on the table");
            return false;
        };
        shooter.strike(velocity);

        self.tally.reset();
        self.shot_ticks = 0;
        self.turn.phase = GamePhase::Shooting;
        self.turn.can_shoot = false;
        // The verdict on the previous shot no longer applies
        self.turn.foul = false;
        self.turn.message = format!("{} shoots", self.turn.current);
        log::debug!(
            "{} shoots: angle {:.3} power {:.1}",
            self.turn.current,
            self.turn.aim_angle,
            self.turn.aim_power
        );
        true
    }

    /// Feed one tick's contacts and captures into the shot tally
    fn record(&mut self, report: TickReport) {
        if let Some(shooter_id) = self.world.shooter().map(|d| d.id) {
            for contact in &report.contacts {
                let role = contact
                    .partner_of(shooter_id)
                    .and_then(|other| self.world.disc(other))
                    .map(|d| d.role);
                if let Some(role) = role {
                    self.tally.record_first_contact(role);
                }
            }
        }
        for capture in report.captures {
            log::debug!("{} pocketed", capture.role.label());
            self.tally.record(capture);
        }
    }

    fn resolve_turn(&mut self) {
        let shooter = self.turn.current;
        let outcome = self
            .rules
            .finish_turn(&self.tally, shooter, self.turn.scores, &mut self.world);
        self.tally.reset();

        self.turn.scores = outcome.scores;
        self.turn.foul = outcome.foul;
        self.turn.message = outcome.message;
        log::debug!(
            "Turn resolved: foul={} continue={} scores={:?}",
            outcome.foul,
            outcome.continue_turn,
            outcome.scores
        );

        if let Some(result) = outcome.result {
            self.turn.phase = GamePhase::GameOver;
            self.turn.can_shoot = false;
            self.turn.winner = match result {
                GameResult::Winner(player) => Some(player),
                GameResult::Draw => None,
            };
            self.scheduler.cancel_all();
            self.opponent_task = None;
            log::info!("Game over: {}", self.turn.message);
            return;
        }

        let next = if outcome.continue_turn { shooter } else { shooter.other() };
        self.start_turn(next);
    }

    /// Hand the table to `player` in the aiming phase
    fn start_turn(&mut self, player: PlayerId) {
        self.turn.current = player;
        self.turn.phase = GamePhase::Aiming;
        self.turn.can_shoot = true;
        self.turn.aim_angle = self.rules.default_aim(player);
        self.turn.aim_power = DEFAULT_AIM_POWER;
        self.rules.prepare_turn(player, &mut self.world);

        if let Some(task) = self.opponent_task.take() {
            self.scheduler.cancel(task);
        }
        if self.turn.is_computer_turn() {
            let task = self
                .scheduler
                .schedule(self.ticks, self.settings.opponent.think_delay_ticks, OpponentAction::Think);
            self.opponent_task = Some(task);
        }
    }

    fn computer_may_act(&self) -> bool {
        self.running && self.turn.phase == GamePhase::Aiming && self.turn.is_computer_turn()
    }

    fn opponent_think(&mut self) {
        if !self.computer_may_act() {
            return;
        }
        match plan_shot(
            &self.rules,
            self.turn.current,
            &self.world,
            &mut self.rng,
            &self.settings.opponent,
        ) {
            Some(plan) => {
                self.turn.aim_angle = plan.angle;
                self.turn.aim_power = plan.power;
                log::debug!("Computer targets disc #{}", plan.target_id);
            }
            None => log::debug!("Computer found no target; shooting blind"),
        }
        self.turn.message = format!("{} is aiming...", self.turn.current);
        let task = self
            .scheduler
            .schedule(self.ticks, self.settings.opponent.aim_delay_ticks, OpponentAction::Shoot);
        self.opponent_task = Some(task);
    }

    fn opponent_shoot(&mut self) {
        if !self.computer_may_act() {
            return;
        }
        self.shoot();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
