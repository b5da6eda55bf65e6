//! Game settings and tuning
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DOT_PROB, DOT_SPEED, EFFECT_SPEED, PLAYER_SPEED, TICK_HZ};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tuning and timing for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ticks between dot steps
    pub dot_speed: u32,
    /// Ticks a gear stays engaged after a keypress
    pub player_speed: u32,
    /// Ticks a hit/miss marker stays on screen
    pub effect_speed: u32,
    /// Per-side spawn probability per tick (0.0 - 1.0)
    pub dot_probability: f64,
    /// Driver tick rate
    pub tick_hz: u32,
    /// RNG seed; a random one is picked when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dot_speed: DOT_SPEED,
            player_speed: PLAYER_SPEED,
            effect_speed: EFFECT_SPEED,
            dot_probability: DOT_PROB,
            tick_hz: TICK_HZ,
            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file and validate them
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.dot_speed == 0 {
            return Err(SettingsError::Invalid {
                field: "dot_speed",
                reason: "must be at least 1",
            });
        }
        if self.player_speed == 0 {
            return Err(SettingsError::Invalid {
                field: "player_speed",
                reason: "must be at least 1",
            });
        }
        if self.tick_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "tick_hz",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.dot_probability) {
            return Err(SettingsError::Invalid {
                field: "dot_probability",
                reason: "must be between 0 and 1",
            });
        }
        Ok(())
    }

    /// Wall-clock length of one tick
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.tick_hz))
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
