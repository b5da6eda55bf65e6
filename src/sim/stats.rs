//! Session statistics and the end-of-session report

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cumulative counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub dots_spawned: u64,
    pub times_hit: u64,
    pub times_missed: u64,
    /// Dots that reached their sink uncaught
    pub dots_lost: u64,
}

impl Statistics {
    /// Dots resolved one way or another (hits, misses and losses)
    pub fn retired(&self) -> u64 {
        self.times_hit + self.times_missed + self.dots_lost
    }

    /// hits / (hits + misses)
    pub fn precision(&self) -> Option<Ratio> {
        Ratio::new(self.times_hit, self.times_hit + self.times_missed)
    }

    /// hits / (hits + misses + losses)
    pub fn recall(&self) -> Option<Ratio> {
        Ratio::new(self.times_hit, self.retired())
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            dots_spawned: self.dots_spawned,
            dots_retired: self.retired(),
            dots_hit: self.times_hit,
            dots_missed: self.times_missed,
            dots_lost: self.dots_lost,
            precision: self.precision(),
            recall: self.recall(),
        }
    }
}

/// An exact fraction with a non-zero denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: u64,
    pub denominator: u64,
}

impl Ratio {
    /// `None` when the denominator is zero
    pub fn new(numerator: u64, denominator: u64) -> Option<Self> {
        (denominator != 0).then_some(Self {
            numerator,
            denominator,
        })
    }

    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.1}%)",
            self.numerator,
            self.denominator,
            self.value() * 100.0
        )
    }
}

/// Final summary printed when the player quits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub dots_spawned: u64,
    pub dots_retired: u64,
    pub dots_hit: u64,
    pub dots_missed: u64,
    pub dots_lost: u64,
    pub precision: Option<Ratio>,
    pub recall: Option<Ratio>,
}

/// Renders a ratio, or the "?" sentinel when undefined
struct OrUnknown(Option<Ratio>);

impl fmt::Display for OrUnknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ratio) => write!(f, "{ratio}"),
            None => f.write_str("?"),
        }
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Raw mode leaves the cursor where it is on '\n', so pair it with '\r'
        write!(f, "\r\n")?;
        write!(f, "dots spawned:       {}\r\n", self.dots_spawned)?;
        write!(f, "dots total:         {}\r\n", self.dots_retired)?;
        write!(f, "dots hit:           {}\r\n", self.dots_hit)?;
        write!(f, "superfluous steps:  {}\r\n", self.dots_missed)?;
        write!(f, "dots lost:          {}\r\n", self.dots_lost)?;
        write!(f, "precision:          {}\r\n", OrUnknown(self.precision))?;
        write!(f, "recall:             {}\r\n", OrUnknown(self.recall))
    }
}
