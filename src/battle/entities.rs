//! Battlefield entities as a closed set of variants
//!
//! Walls and mines are stationary. Shells fly in a fixed direction. Tanks
//! live in their own module because of their state machine.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{MINE_SYMBOL, SHELL_SYMBOL, WALL_SYMBOL};
use crate::battle::tank::Tank;
use crate::core::types::{Direction, EntityId, Position};

/// Discriminant of [`Entity`], ordered by draw priority (highest first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Mine,
    Tank,
    Shell,
}

/// Wall absorbing a fixed number of shell hits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub position: Position,
    hits_left: u32,
    destroyed: bool,
}

impl Wall {
    pub fn new(id: EntityId, position: Position, hit_points: u32) -> Self {
        Self {
            id,
            position,
            hits_left: hit_points,
            destroyed: false,
        }
    }

    pub fn hits_left(&self) -> u32 {
        self.hits_left
    }

    /// Absorb one shell; returns true when this hit brings the wall down
    pub fn take_hit(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.hits_left = self.hits_left.saturating_sub(1);
        if self.hits_left == 0 {
            self.destroyed = true;
            return true;
        }
        false
    }
}

/// Single-use mine triggered by tanks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub id: EntityId,
    pub position: Position,
    destroyed: bool,
}

impl Mine {
    pub fn new(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            destroyed: false,
        }
    }
}

/// Shell in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub id: EntityId,
    pub position: Position,
    pub direction: Direction,
    /// Firing tank, kept for bookkeeping only
    pub owner: EntityId,
    destroyed: bool,
}

impl Shell {
    pub fn new(id: EntityId, position: Position, direction: Direction, owner: EntityId) -> Self {
        Self {
            id,
            position,
            direction,
            owner,
            destroyed: false,
        }
    }
}

/// Any object occupying a board cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Entity {
    Wall(Wall),
    Mine(Mine),
    Shell(Shell),
    Tank(Tank),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Wall(w) => w.id,
            Entity::Mine(m) => m.id,
            Entity::Shell(s) => s.id,
            Entity::Tank(t) => t.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Wall(_) => EntityKind::Wall,
            Entity::Mine(_) => EntityKind::Mine,
            Entity::Shell(_) => EntityKind::Shell,
            Entity::Tank(_) => EntityKind::Tank,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Entity::Wall(w) => w.position,
            Entity::Mine(m) => m.position,
            Entity::Shell(s) => s.position,
            Entity::Tank(t) => t.position,
        }
    }

    /// Facing of moving entities
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Entity::Shell(s) => Some(s.direction),
            Entity::Tank(t) => Some(t.direction),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Entity::Wall(_) => WALL_SYMBOL,
            Entity::Mine(_) => MINE_SYMBOL,
            Entity::Shell(_) => SHELL_SYMBOL,
            Entity::Tank(t) => t.symbol(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        match self {
            Entity::Wall(w) => w.destroyed,
            Entity::Mine(m) => m.destroyed,
            Entity::Shell(s) => s.destroyed,
            Entity::Tank(t) => t.is_destroyed(),
        }
    }

    /// Mark destroyed; returns false if it already was
    pub fn destroy(&mut self) -> bool {
        match self {
            Entity::Wall(w) => !std::mem::replace(&mut w.destroyed, true),
            Entity::Mine(m) => !std::mem::replace(&mut m.destroyed, true),
            Entity::Shell(s) => !std::mem::replace(&mut s.destroyed, true),
            Entity::Tank(t) => t.destroy(),
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        match self {
            Entity::Wall(w) => w.position = position,
            Entity::Mine(m) => m.position = position,
            Entity::Shell(s) => s.position = position,
            Entity::Tank(t) => t.position = position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_takes_two_hits() {
        let mut wall = Wall::new(EntityId(0), Position::new(2, 2), 2);
        assert!(!wall.take_hit());
        assert_eq!(wall.hits_left(), 1);
        assert!(wall.take_hit());
        assert_eq!(wall.hits_left(), 0);
        // Already down: further hits change nothing
        assert!(!wall.take_hit());
    }

    #[test]
    fn test_wall_destroyed_flag_follows_hits() {
        let mut entity = Entity::Wall(Wall::new(EntityId(0), Position::default(), 1));
        assert!(!entity.is_destroyed());
        if let Entity::Wall(w) = &mut entity {
            w.take_hit();
        }
        assert!(entity.is_destroyed());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut mine = Entity::Mine(Mine::new(EntityId(1), Position::new(0, 1)));
        assert!(mine.destroy());
        assert!(!mine.destroy());
        assert!(mine.is_destroyed());
    }

    #[test]
    fn test_symbols_and_kinds() {
        let shell = Entity::Shell(Shell::new(
            EntityId(2),
            Position::default(),
            Direction::Down,
            EntityId(9),
        ));
        assert_eq!(shell.symbol(), '*');
        assert_eq!(shell.kind(), EntityKind::Shell);
        assert_eq!(shell.direction(), Some(Direction::Down));

        let wall = Entity::Wall(Wall::new(EntityId(3), Position::default(), 2));
        assert_eq!(wall.symbol(), '#');
        assert_eq!(wall.direction(), None);
    }

    #[test]
    fn test_draw_priority_order() {
        let mut kinds = vec![
            EntityKind::Shell,
            EntityKind::Tank,
            EntityKind::Wall,
            EntityKind::Mine,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![EntityKind::Wall, EntityKind::Mine, EntityKind::Tank, EntityKind::Shell]
        );
    }
}
