//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per fixed timestep
//! - Seeded RNG only
//! - Stable iteration order (by dot ID)
//! - No terminal or platform dependencies

pub mod dot;
pub mod index;
pub mod state;
pub mod stats;
pub mod tick;

pub use dot::{Direction, Dot, DotId, DotStep};
pub use index::PositionIndex;
pub use state::{Actor, Effect, Input, Simulation};
pub use stats::{Ratio, SessionReport, Statistics};
pub use tick::{TickOutcome, tick};
