//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation step counter
pub type Step = u64;

/// Stable handle for a battlefield entity
///
/// Handles index the battlefield arena and are never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two competing players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Board symbol for this player's tanks
    pub fn symbol(self) -> char {
        match self {
            PlayerId::One => '1',
            PlayerId::Two => '2',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '1' => Some(PlayerId::One),
            '2' => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// Facing given to tanks that spawn without an explicit direction
    pub fn default_facing(self) -> Direction {
        match self {
            PlayerId::One => Direction::Right,
            PlayerId::Two => Direction::Left,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Integer grid position
///
/// Positions are not wrapped on construction; call [`Position::wrapped`]
/// with the board dimensions to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Toroidal normalization into `[0, width) x [0, height)`
    #[inline]
    pub fn wrapped(self, width: u32, height: u32) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }

    /// Neighbouring position one cell along `direction` (unwrapped)
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Eight compass directions, ordered clockwise from `Up`
///
/// The ordinal encoding makes rotation plain modular arithmetic:
/// one eighth is +/-1, one quarter is +/-2, reversal is +4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[default]
    Up = 0,
    UpRight = 1,
    Right = 2,
    DownRight = 3,
    Down = 4,
    DownLeft = 5,
    Left = 6,
    UpLeft = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Self {
        Self::ALL[(ordinal % 8) as usize]
    }

    /// Rotate by `eighths` steps; positive is clockwise
    pub fn rotated(self, eighths: i8) -> Self {
        let ordinal = (self.ordinal() as i16 + eighths as i16).rem_euclid(8);
        Self::from_ordinal(ordinal as u8)
    }

    pub fn reversed(self) -> Self {
        self.rotated(4)
    }

    /// Cell offset for one step; y grows downward
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }

    /// Signed eighth-turns to go from `self` to `target`, in `-3..=4`
    pub fn eighths_to(self, target: Direction) -> i8 {
        let diff = (target.ordinal() as i8 - self.ordinal() as i8).rem_euclid(8);
        if diff > 4 {
            diff - 8
        } else {
            diff
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative_and_overflow() {
        assert_eq!(Position::new(-1, -1).wrapped(5, 4), Position::new(4, 3));
        assert_eq!(Position::new(5, 4).wrapped(5, 4), Position::new(0, 0));
        assert_eq!(Position::new(12, -9).wrapped(5, 4), Position::new(2, 3));
    }

    #[test]
    fn test_step_follows_offset() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::Up), Position::new(2, 1));
        assert_eq!(origin.step(Direction::DownLeft), Position::new(1, 3));
    }

    #[test]
    fn test_rotation_arithmetic() {
        assert_eq!(Direction::Up.rotated(1), Direction::UpRight);
        assert_eq!(Direction::Up.rotated(-1), Direction::UpLeft);
        assert_eq!(Direction::Left.rotated(2), Direction::Up);
        assert_eq!(Direction::Right.reversed(), Direction::Left);
        assert_eq!(Direction::UpLeft.reversed(), Direction::DownRight);
    }

    #[test]
    fn test_eighths_to_takes_short_way() {
        assert_eq!(Direction::Up.eighths_to(Direction::UpLeft), -1);
        assert_eq!(Direction::Up.eighths_to(Direction::Right), 2);
        assert_eq!(Direction::Up.eighths_to(Direction::Down), 4);
        assert_eq!(Direction::Right.eighths_to(Direction::Right), 0);
    }

    #[test]
    fn test_player_symbols() {
        assert_eq!(PlayerId::One.symbol(), '1');
        assert_eq!(PlayerId::from_symbol('2'), Some(PlayerId::Two));
        assert_eq!(PlayerId::from_symbol('3'), None);
        assert_eq!(PlayerId::One.opponent(), PlayerId::Two);
        assert_eq!(PlayerId::Two.default_facing(), Direction::Left);
    }
}
