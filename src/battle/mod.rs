//! Battle system - deterministic tank duel on a toroidal grid
//!
//! The turn engine in [`execution`] owns the [`battlefield`] and drives every
//! phase. Entities, the grid and the collision rules are passive; strategies
//! sit behind the [`ai`] traits and only ever see snapshots.

pub mod actions;
pub mod ai;
pub mod battlefield;
pub mod collision;
pub mod constants;
pub mod entities;
pub mod execution;
pub mod grid;
pub mod report;
pub mod snapshot;
pub mod tank;

// Re-exports for convenient access
pub use actions::{Action, Rotation};
pub use ai::{
    ColumnZone, HunterStrategy, ScriptedStrategy, SnapshotLog, StrategyFactory, TankStrategy,
    ZoneControlStrategy, ZoneObjective,
};
pub use battlefield::Battlefield;
pub use collision::{resolve_shell, resolve_tank, Collision};
pub use constants::*;
pub use entities::{Entity, EntityKind, Mine, Shell, Wall};
pub use execution::BattleState;
pub use grid::Board;
pub use report::{BattleEvent, StepReport, TankStepOutcome, TankStepReport, Verdict};
pub use snapshot::{BattleView, CellSymbol};
pub use tank::{ForwardMove, ReverseRequest, Tank};
