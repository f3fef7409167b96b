//! Battle configuration with documented rule values
//!
//! All tunable rule numbers are collected here. The config is an immutable
//! value handed to the turn engine at construction; nothing reads it globally.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::battle::constants::{
    DEFAULT_MAX_STEPS, REVERSE_WAIT_TURNS, SHELLS_EXHAUSTED_GRACE_STEPS, SHELLS_PER_TANK,
    SHELL_SUBSTEPS, SHOOT_COOLDOWN_TURNS, WALL_HIT_POINTS,
};
use crate::core::error::{BattleError, Result};

/// Rule values for one battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === RUN LENGTH ===
    /// Step ceiling; reaching it ends the run in a tie
    pub max_steps: u64,

    /// Steps the battle may continue once no living tank holds a shell
    ///
    /// Shells already in flight do not count as held.
    pub shells_exhausted_grace: u32,

    // === TANKS ===
    /// Magazine size each tank starts with
    pub shells_per_tank: u32,

    /// Turns a tank must wait after a successful shot
    ///
    /// The counter is set on the firing turn and decays at the start of each
    /// later turn, so with 4 the next shot is possible four turns later.
    pub shoot_cooldown: u32,

    /// Turns between a reverse request and the automatic reverse
    pub reverse_wait: u32,

    // === TERRAIN AND SHELLS ===
    /// Shell impacts a wall absorbs before it falls
    pub wall_hit_points: u32,

    /// Cells a shell travels per turn, each resolved as its own half-step
    pub shell_substeps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            shells_exhausted_grace: SHELLS_EXHAUSTED_GRACE_STEPS,
            shells_per_tank: SHELLS_PER_TANK,
            shoot_cooldown: SHOOT_COOLDOWN_TURNS,
            reverse_wait: REVERSE_WAIT_TURNS,
            wall_hit_points: WALL_HIT_POINTS,
            shell_substeps: SHELL_SUBSTEPS,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_shells_per_tank(mut self, shells: u32) -> Self {
        self.shells_per_tank = shells;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_steps", self.max_steps),
            ("shells_exhausted_grace", self.shells_exhausted_grace as u64),
            ("shoot_cooldown", self.shoot_cooldown as u64),
            ("reverse_wait", self.reverse_wait as u64),
            ("wall_hit_points", self.wall_hit_points as u64),
            ("shell_substeps", self.shell_substeps as u64),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(BattleError::InvalidConfig(format!(
                    "{} must be at least 1",
                    name
                )));
            }
        }

        Ok(())
    }
}
