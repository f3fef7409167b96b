//! Per-turn tank actions returned by strategies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotation amounts a tank can apply in one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    EighthLeft,
    EighthRight,
    QuarterLeft,
    QuarterRight,
}

impl Rotation {
    /// Signed eighth-turns; positive is clockwise
    pub fn eighths(self) -> i8 {
        match self {
            Rotation::EighthLeft => -1,
            Rotation::EighthRight => 1,
            Rotation::QuarterLeft => -2,
            Rotation::QuarterRight => 2,
        }
    }
}

/// One decision per tank per turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    /// Starts the reverse wait, or reverses at once right after a reverse
    RequestReverse,
    RotateEighthLeft,
    RotateEighthRight,
    RotateQuarterLeft,
    RotateQuarterRight,
    Shoot,
    /// Ask for a battlefield snapshot; takes the whole turn
    RequestIntel,
    #[default]
    NoOp,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::MoveForward,
        Action::RequestReverse,
        Action::RotateEighthLeft,
        Action::RotateEighthRight,
        Action::RotateQuarterLeft,
        Action::RotateQuarterRight,
        Action::Shoot,
        Action::RequestIntel,
        Action::NoOp,
    ];

    pub fn rotation(self) -> Option<Rotation> {
        match self {
            Action::RotateEighthLeft => Some(Rotation::EighthLeft),
            Action::RotateEighthRight => Some(Rotation::EighthRight),
            Action::RotateQuarterLeft => Some(Rotation::QuarterLeft),
            Action::RotateQuarterRight => Some(Rotation::QuarterRight),
            _ => None,
        }
    }

    /// Rotation action turning by `eighths` (clamped to a quarter)
    pub fn rotate_by(eighths: i8) -> Option<Action> {
        match eighths {
            0 => None,
            1 => Some(Action::RotateEighthRight),
            -1 => Some(Action::RotateEighthLeft),
            e if e > 1 => Some(Action::RotateQuarterRight),
            _ => Some(Action::RotateQuarterLeft),
        }
    }

    /// Actions resolved in the movement phase rather than their own phase
    pub fn is_maneuver(self) -> bool {
        !matches!(self, Action::Shoot | Action::RequestIntel)
    }

    /// Label used in run output
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveForward => "Move Forward",
            Action::RequestReverse => "Move Backward",
            Action::RotateEighthLeft => "Rotate Left 45",
            Action::RotateEighthRight => "Rotate Right 45",
            Action::RotateQuarterLeft => "Rotate Left 90",
            Action::RotateQuarterRight => "Rotate Right 90",
            Action::Shoot => "Shoot",
            Action::RequestIntel => "Get Battle Info",
            Action::NoOp => "Do Nothing",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
