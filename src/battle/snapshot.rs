//! Read-only board snapshots handed to strategies on request
//!
//! A view is a character map of the whole board with one symbol per cell:
//! the top live occupant by draw priority (wall, mine, tank, shell), with the
//! requesting tank's cell replaced by the self marker.

use serde::{Deserialize, Serialize};

use crate::battle::battlefield::Battlefield;
use crate::battle::constants::{
    EMPTY_SYMBOL, MINE_SYMBOL, OUT_OF_BOUNDS_SYMBOL, SELF_SYMBOL, SHELL_SYMBOL, WALL_SYMBOL,
};
use crate::battle::entities::Entity;
use crate::battle::tank::Tank;
use crate::core::types::{PlayerId, Position};

/// One cell of a snapshot, relative to the viewing tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellSymbol {
    Wall,
    Mine,
    SelfTank,
    AllyTank,
    EnemyTank,
    Shell,
    Empty,
    OutOfBounds,
}

impl CellSymbol {
    /// Cells a tank cannot safely drive into
    pub fn is_hazard(self) -> bool {
        matches!(self, CellSymbol::Wall | CellSymbol::Mine)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    width: u32,
    height: u32,
    viewer: PlayerId,
    self_position: Position,
    cells: Vec<CellSymbol>,
}

impl BattleView {
    /// Capture the battlefield as seen by `viewer`
    pub fn capture(field: &Battlefield, viewer: &Tank) -> Self {
        let board = field.board();
        let cells = board
            .cells()
            .map(|(pos, occupants)| {
                if pos == viewer.position {
                    return CellSymbol::SelfTank;
                }
                occupants
                    .iter()
                    .filter_map(|&id| field.get(id))
                    .filter(|e| !e.is_destroyed())
                    .min_by_key(|e| e.kind())
                    .map_or(CellSymbol::Empty, |e| classify(e, viewer.player))
            })
            .collect();

        Self {
            width: board.width,
            height: board.height,
            viewer: viewer.player,
            self_position: viewer.position,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    pub fn self_position(&self) -> Position {
        self.self_position
    }

    /// Cell at raw coordinates; anything off the board is out of bounds
    pub fn cell_at(&self, x: i32, y: i32) -> CellSymbol {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return CellSymbol::OutOfBounds;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn symbol_at(&self, x: i32, y: i32) -> char {
        match self.cell_at(x, y) {
            CellSymbol::Wall => WALL_SYMBOL,
            CellSymbol::Mine => MINE_SYMBOL,
            CellSymbol::SelfTank => SELF_SYMBOL,
            CellSymbol::AllyTank => self.viewer.symbol(),
            CellSymbol::EnemyTank => self.viewer.opponent().symbol(),
            CellSymbol::Shell => SHELL_SYMBOL,
            CellSymbol::Empty => EMPTY_SYMBOL,
            CellSymbol::OutOfBounds => OUT_OF_BOUNDS_SYMBOL,
        }
    }

    /// Positions showing `symbol`, row-major
    pub fn positions_of(&self, symbol: CellSymbol) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, &c)| c == symbol)
            .map(move |(i, _)| Position::new((i % width) as i32, (i / width) as i32))
    }

    /// Positions holding enemy tanks, row-major
    pub fn enemies(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions_of(CellSymbol::EnemyTank)
    }

    /// Rows of symbols joined by newlines
    pub fn render(&self) -> String {
        (0..self.height as i32)
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| self.symbol_at(x, y))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn classify(entity: &Entity, viewer: PlayerId) -> CellSymbol {
    match entity {
        Entity::Wall(_) => CellSymbol::Wall,
        Entity::Mine(_) => CellSymbol::Mine,
        Entity::Shell(_) => CellSymbol::Shell,
        Entity::Tank(t) if t.player == viewer => CellSymbol::AllyTank,
        Entity::Tank(_) => CellSymbol::EnemyTank,
    }
}
