//! Simulation state
//!
//! The actor never changes cell; a gear is a short-lived strike toward one
//! neighbour. Dots live in an arena keyed by `DotId` (iterated in id order for
//! determinism) and are mirrored in a `PositionIndex` for collision lookups.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::dot::{Direction, Dot, DotId};
use super::index::PositionIndex;
use super::stats::{SessionReport, Statistics};
use crate::consts::*;
use crate::game::Game;
use crate::settings::Settings;

/// Discrete input symbol delivered by the driver once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Input {
    #[default]
    None,
    Left,
    Right,
    Quit,
}

/// Transient hit/miss marker shown beside the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Hit(Direction),
    Miss(Direction),
}

impl Effect {
    pub fn direction(self) -> Direction {
        match self {
            Effect::Hit(dir) | Effect::Miss(dir) => dir,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Effect::Hit(_) => HIT_GLYPH,
            Effect::Miss(_) => MISS_GLYPH,
        }
    }
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: usize,
    /// Current movement intent; `None` is neutral
    pub gear: Option<Direction>,
    /// Ticks before the gear falls back to neutral
    pub gear_reset_countdown: u32,
    pub effect: Option<Effect>,
    /// Ticks before the effect marker clears
    pub effect_countdown: u32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: ACTOR_START,
            gear: None,
            gear_reset_countdown: 0,
            effect: None,
            effect_countdown: 0,
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub actor: Actor,
    pub stats: Statistics,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once `quit` has run; further ticks are ignored
    pub finished: bool,
    pub(crate) dots: BTreeMap<DotId, Dot>,
    pub(crate) index: PositionIndex,
    pub(crate) rng: Pcg32,
    next_id: DotId,
}

impl Simulation {
    /// Create a simulation with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        Self {
            seed,
            settings,
            actor: Actor::default(),
            stats: Statistics::default(),
            time_ticks: 0,
            finished: false,
            dots: BTreeMap::new(),
            index: PositionIndex::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new dot ID
    fn next_dot_id(&mut self) -> DotId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a dot on the track and register it in the index.
    ///
    /// Does not touch statistics; spawning through the tick does.
    pub fn insert_dot(
        &mut self,
        momentum: Direction,
        pos: usize,
        sink: usize,
        speed: u32,
    ) -> DotId {
        let id = self.next_dot_id();
        self.index.insert(pos, id);
        self.dots.insert(id, Dot::new(id, momentum, pos, sink, speed));
        id
    }

    /// Remove a dot from both the arena and the index
    pub fn remove_dot(&mut self, id: DotId) -> Dot {
        let Some(dot) = self.dots.remove(&id) else {
            panic!("dot {id} is not alive");
        };
        self.index.remove(dot.pos, id);
        dot
    }

    /// Live dots in id order
    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.dots.values()
    }

    pub fn dot(&self, id: DotId) -> Option<&Dot> {
        self.dots.get(&id)
    }

    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }

    /// Dots currently in the bucket for `pos`
    pub fn dots_at(&self, pos: usize) -> &[DotId] {
        self.index.occupants(pos)
    }

    /// True when every live dot sits in exactly the bucket matching its position
    pub fn index_consistent(&self) -> bool {
        self.index.len() == self.dots.len()
            && self.index.iter().all(|(pos, id)| {
                self.dots
                    .get(&id)
                    .is_some_and(|dot| dot.pos == pos && dot.id == id)
            })
    }

    /// Engage a gear; re-engaging resets the countdown rather than adding to it
    pub fn engage(&mut self, dir: Direction) {
        self.actor.gear = Some(dir);
        self.actor.gear_reset_countdown = self.settings.player_speed;
    }

    /// Dispatch an input symbol. Returns `false` for `Quit`.
    pub fn apply_input(&mut self, input: Input) -> bool {
        match input {
            Input::None => {}
            Input::Left => self.move_left(),
            Input::Right => self.move_right(),
            Input::Quit => return false,
        }
        true
    }
}

impl Game for Simulation {
    fn get_board(&self) -> Vec<char> {
        let mut board = vec![BLANK_GLYPH; TRACK_LEN];
        let mut put = |pos: Option<usize>, glyph: char| {
            if let Some(p) = pos.filter(|&p| p < TRACK_LEN) {
                board[p] = glyph;
            }
        };

        let actor = &self.actor;
        put(Some(actor.pos), ACTOR_GLYPH);
        match (actor.gear, actor.effect) {
            (_, Some(effect)) => put(effect.direction().step(actor.pos), effect.glyph()),
            (Some(dir), None) => {
                let arrow = match dir {
                    Direction::Left => GEAR_LEFT_GLYPH,
                    Direction::Right => GEAR_RIGHT_GLYPH,
                };
                put(dir.step(actor.pos), arrow);
            }
            (None, None) => {}
        }
        for dot in self.dots.values() {
            put(Some(dot.pos), DOT_GLYPH);
        }
        board
    }

    fn move_left(&mut self) {
        self.engage(Direction::Left);
    }

    fn move_right(&mut self) {
        self.engage(Direction::Right);
    }

    fn tick(&mut self) {
        super::tick::tick(self);
    }

    fn quit(&mut self) -> SessionReport {
        self.finished = true;
        let report = self.stats.report();
        log::info!(
            "Session over after {} ticks: {} hit, {} missed, {} lost",
            self.time_ticks,
            report.dots_hit,
            report.dots_missed,
            report.dots_lost
        );
        report
    }
}
