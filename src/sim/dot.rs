//! Dot entity
//!
//! A dot drifts toward a fixed sink cell, one step every `speed` ticks.
//! It holds no references to the collections it lives in; `advance` reports
//! what happened and the simulation updates its bookkeeping.

use serde::{Deserialize, Serialize};

use crate::consts::TRACK_LEN;

/// Stable dot identifier (allocated in increasing order)
pub type DotId = u32;

/// Horizontal direction on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed displacement of one step
    pub fn delta(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The neighbouring cell in this direction, or `None` off the track
    pub fn step(self, pos: usize) -> Option<usize> {
        match self {
            Direction::Left => pos.checked_sub(1),
            Direction::Right => Some(pos + 1).filter(|&p| p < TRACK_LEN),
        }
    }
}

/// Outcome of a single `Dot::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStep {
    /// Not due to move this tick
    Waiting,
    /// Moved one cell
    Moved { from: usize, to: usize },
    /// Moved onto its sink uncaught; the dot must be retired as lost
    ReachedSink { from: usize, to: usize },
}

/// A moving dot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    pub id: DotId,
    pub momentum: Direction,
    pub pos: usize,
    sink: usize,
    pub speed: u32,
    pub ticks_until_move: u32,
}

impl Dot {
    pub fn new(id: DotId, momentum: Direction, pos: usize, sink: usize, speed: u32) -> Self {
        Self {
            id,
            momentum,
            pos,
            sink,
            speed,
            ticks_until_move: speed,
        }
    }

    /// The cell this dot is headed for, fixed at spawn
    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Count down and, when due, step one cell along `momentum`.
    ///
    /// Panics if the step would leave the track.
    pub fn advance(&mut self) -> DotStep {
        self.ticks_until_move = self.ticks_until_move.saturating_sub(1);
        if self.ticks_until_move > 0 {
            return DotStep::Waiting;
        }

        let from = self.pos;
        let Some(to) = self.momentum.step(from) else {
            panic!(
                "dot {} stepped off the track from cell {} heading {:?}",
                self.id, from, self.momentum
            );
        };
        self.pos = to;
        self.ticks_until_move = self.speed;

        if to == self.sink {
            DotStep::ReachedSink { from, to }
        } else {
            DotStep::Moved { from, to }
        }
    }
}
