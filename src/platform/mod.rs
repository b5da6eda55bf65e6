//! Platform layer
//!
//! Handles the terminal side of the game:
//! - Raw mode and cursor visibility
//! - Blocking key reads handed to the tick driver

pub mod input;
pub mod terminal;

pub use input::{InputSlot, map_key, spawn_reader};
pub use terminal::RawTerminal;
