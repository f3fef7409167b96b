//! Toroidal occupancy grid
//!
//! The board owns no entities. Each cell holds entity handles in insertion
//! order, and any number of entities may share a cell. Every coordinate is
//! wrapped before use, so out-of-range positions are never rejected.

use serde::{Deserialize, Serialize};

use crate::battle::constants::MAX_BOARD_SIDE;
use crate::core::error::{BattleError, Result};
use crate::core::types::{EntityId, Position};

/// Reject empty or oversized boards
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let side = 1..=MAX_BOARD_SIDE;
    if side.contains(&width) && side.contains(&height) {
        Ok(())
    } else {
        Err(BattleError::InvalidDimensions { width, height })
    }
}

/// Width x height array of cells holding entity handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    cells: Vec<Vec<EntityId>>,
}

impl Board {
    /// Create an empty board, checking dimensions before allocating
    pub fn new(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Vec::new(); width as usize * height as usize],
        })
    }

    #[inline]
    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrapped(self.width, self.height)
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        let p = self.wrap(pos);
        p.y as usize * self.width as usize + p.x as usize
    }

    /// Append a handle to the cell at `pos`
    pub fn place(&mut self, entity: EntityId, pos: Position) {
        let idx = self.index(pos);
        self.cells[idx].push(entity);
    }

    /// Handles at `pos` in insertion order
    pub fn occupants_at(&self, pos: Position) -> &[EntityId] {
        &self.cells[self.index(pos)]
    }

    /// Remove one reference to `entity` from the cell; no-op if absent
    pub fn remove_at(&mut self, entity: EntityId, pos: Position) -> bool {
        let idx = self.index(pos);
        let cell = &mut self.cells[idx];
        match cell.iter().position(|&e| e == entity) {
            Some(i) => {
                cell.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drop every reference in the cell, returning what was there
    pub fn clear_cell(&mut self, pos: Position) -> Vec<EntityId> {
        let idx = self.index(pos);
        std::mem::take(&mut self.cells[idx])
    }

    pub fn contains(&self, entity: EntityId, pos: Position) -> bool {
        self.occupants_at(pos).contains(&entity)
    }

    /// Total number of references held across all cells
    pub fn reference_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// All cells in row-major order with their wrapped coordinates
    pub fn cells(&self) -> impl Iterator<Item = (Position, &[EntityId])> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let pos = Position::new((i % width) as i32, (i / width) as i32);
            (pos, cell.as_slice())
        })
    }
}
