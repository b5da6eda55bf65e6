//! Dot Dancer - a one-dimensional terminal reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (dots, collisions, statistics)
//! - `game`: The capability contract a playable simulation satisfies
//! - `platform`: Terminal raw mode and keyboard input
//! - `settings`: Data-driven tuning loaded from JSON

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Number of cells on the track
    pub const TRACK_LEN: usize = 80;
    /// Actor's starting cell (midpoint of the track)
    pub const ACTOR_START: usize = 39;
    /// Distance from the actor at which new dots appear
    pub const SPAWN_OFFSET: usize = 39;

    /// Ticks between dot steps
    pub const DOT_SPEED: u32 = 4;
    /// Ticks a gear stays engaged after a keypress
    pub const PLAYER_SPEED: u32 = 2;
    /// Ticks a hit/miss marker stays on screen
    pub const EFFECT_SPEED: u32 = 8;
    /// Per-side spawn probability per tick
    pub const DOT_PROB: f64 = 0.01;

    /// Fixed tick rate of the driver (ticks per second)
    pub const TICK_HZ: u32 = 30;

    /// Board glyphs
    pub const BLANK_GLYPH: char = ' ';
    pub const ACTOR_GLYPH: char = '@';
    pub const GEAR_LEFT_GLYPH: char = '<';
    pub const GEAR_RIGHT_GLYPH: char = '>';
    pub const HIT_GLYPH: char = '+';
    pub const MISS_GLYPH: char = '-';
    pub const DOT_GLYPH: char = '.';
}
