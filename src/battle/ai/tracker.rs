//! Dead reckoning shared by the snapshot-driven strategies
//!
//! Snapshots only arrive on intel turns, so a strategy has to remember its
//! own facing, position and gun state from the actions it issued.

use crate::battle::actions::Action;
use crate::battle::snapshot::{BattleView, CellSymbol};
use crate::core::config::GameConfig;
use crate::core::types::{Direction, PlayerId, Position};

#[derive(Debug, Clone)]
pub(crate) struct SelfTracker {
    pub position: Position,
    pub facing: Direction,
    shoot_cooldown: u32,
    cooldown_left: u32,
    shells_left: u32,
}

impl SelfTracker {
    pub fn new(player: PlayerId, config: &GameConfig) -> Self {
        Self {
            position: Position::default(),
            facing: player.default_facing(),
            shoot_cooldown: config.shoot_cooldown,
            cooldown_left: 0,
            shells_left: config.shells_per_tank,
        }
    }

    /// Once per decision, mirroring the engine's counter decay
    pub fn tick(&mut self) {
        self.cooldown_left = self.cooldown_left.saturating_sub(1);
    }

    pub fn sync(&mut self, view: &BattleView) {
        self.position = view.self_position();
    }

    pub fn has_shells(&self) -> bool {
        self.shells_left > 0
    }

    pub fn can_fire(&self) -> bool {
        self.has_shells() && self.cooldown_left == 0
    }

    pub fn shoot(&mut self) -> Action {
        self.shells_left = self.shells_left.saturating_sub(1);
        self.cooldown_left = self.shoot_cooldown;
        Action::Shoot
    }

    /// Cell contents with the tracked position standing in for the self
    /// marker, which goes stale as soon as the tank moves
    pub fn cell(&self, view: &BattleView, pos: Position) -> CellSymbol {
        let pos = pos.wrapped(view.width(), view.height());
        if pos == self.position {
            return CellSymbol::SelfTank;
        }
        match view.cell_at(pos.x, pos.y) {
            CellSymbol::SelfTank => CellSymbol::Empty,
            other => other,
        }
    }

    /// Shortest rotation toward `target`, or `NoOp` if already facing it
    pub fn rotate_toward(&mut self, target: Direction) -> Action {
        match Action::rotate_by(self.facing.eighths_to(target)) {
            Some(action) => {
                if let Some(rotation) = action.rotation() {
                    self.facing = self.facing.rotated(rotation.eighths());
                }
                action
            }
            None => Action::NoOp,
        }
    }

    pub fn forward_cell(&self, view: &BattleView) -> CellSymbol {
        self.cell(view, self.position.step(self.facing))
    }

    pub fn advance(&mut self, view: &BattleView) -> Action {
        self.position = self
            .position
            .step(self.facing)
            .wrapped(view.width(), view.height());
        Action::MoveForward
    }
}
