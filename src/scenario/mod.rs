//! Battle scenarios: board size, terrain and starting tanks
//!
//! A scenario is plain data. It can be assembled with the builder methods
//! or parsed from a board file (see [`board_file`]).

pub mod board_file;

use serde::{Deserialize, Serialize};

use crate::battle::grid::check_dimensions;
use crate::core::config::GameConfig;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Direction, PlayerId, Position, Step};

pub use board_file::{load_board_file, parse_board};

/// Starting placement of one tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankPlacement {
    pub player: PlayerId,
    pub position: Position,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Overrides `GameConfig::max_steps` when set
    pub max_steps: Option<Step>,
    /// Overrides `GameConfig::shells_per_tank` when set
    pub shells_per_tank: Option<u32>,
    pub walls: Vec<Position>,
    pub mines: Vec<Position>,
    /// Creation order; player order is derived from this list
    pub tanks: Vec<TankPlacement>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: Step) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_shells_per_tank(mut self, shells: u32) -> Self {
        self.shells_per_tank = Some(shells);
        self
    }

    pub fn wall(mut self, x: i32, y: i32) -> Self {
        self.walls.push(Position::new(x, y));
        self
    }

    pub fn mine(mut self, x: i32, y: i32) -> Self {
        self.mines.push(Position::new(x, y));
        self
    }

    /// Add a tank facing its player's default direction
    pub fn tank(self, player: PlayerId, x: i32, y: i32) -> Self {
        self.tank_facing(player, x, y, player.default_facing())
    }

    pub fn tank_facing(mut self, player: PlayerId, x: i32, y: i32, direction: Direction) -> Self {
        self.tanks.push(TankPlacement {
            player,
            position: Position::new(x, y),
            direction,
        });
        self
    }

    pub fn tank_count(&self, player: PlayerId) -> usize {
        self.tanks.iter().filter(|t| t.player == player).count()
    }

    /// Setup checks that must pass before any turn runs
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        for player in PlayerId::ALL {
            if self.tank_count(player) == 0 {
                return Err(BattleError::NoTanks(player));
            }
        }
        Ok(())
    }

    /// Layer this scenario's metadata over a base config
    pub fn apply_to(&self, base: &GameConfig) -> GameConfig {
        let mut config = base.clone();
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(shells) = self.shells_per_tank {
            config.shells_per_tank = shells;
        }
        config
    }
}
