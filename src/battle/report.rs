//! Per-step run reports and the terminal verdict

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::actions::Action;
use crate::battle::collision::Collision;
use crate::core::types::{EntityId, PlayerId, Position, Step};

/// What a single tank did this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankStepOutcome {
    /// Tank was alive when the step began
    Acted {
        action: Action,
        ignored: bool,
        /// Destroyed during this step
        killed: bool,
    },
    /// Tank was already destroyed before the step
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankStepReport {
    pub tank: EntityId,
    pub player: PlayerId,
    pub outcome: TankStepOutcome,
}

impl TankStepReport {
    pub fn is_ignored(&self) -> bool {
        matches!(self.outcome, TankStepOutcome::Acted { ignored: true, .. })
    }

    pub fn is_killed(&self) -> bool {
        matches!(self.outcome, TankStepOutcome::Acted { killed: true, .. })
    }

    pub fn action(&self) -> Option<Action> {
        match self.outcome {
            TankStepOutcome::Acted { action, .. } => Some(action),
            TankStepOutcome::Dead => None,
        }
    }
}

impl fmt::Display for TankStepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            TankStepOutcome::Dead => f.write_str("killed"),
            TankStepOutcome::Acted {
                action,
                ignored,
                killed,
            } => {
                f.write_str(action.label())?;
                if ignored {
                    f.write_str(" (ignored)")?;
                }
                if killed {
                    f.write_str(" (killed)")?;
                }
                Ok(())
            }
        }
    }
}

/// Notable things that happened during a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    ShellFired {
        tank: EntityId,
        shell: EntityId,
        position: Position,
    },
    Collision(Collision),
    IntelDelivered {
        tank: EntityId,
    },
    ReverseCompleted {
        tank: EntityId,
        /// A wall stopped the movement; the state transition still happened
        blocked: bool,
    },
    /// Every living tank is out of shells; the countdown has started
    ShellsExhausted {
        steps_left: u32,
    },
    BattleEnded(Verdict),
}

/// Everything the engine reports for one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: Step,
    /// Ordered by spawn position: top to bottom, then left to right
    pub tanks: Vec<TankStepReport>,
    pub events: Vec<BattleEvent>,
}

impl StepReport {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty() && self.events.is_empty()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn tank(&self, id: EntityId) -> Option<&TankStepReport> {
        self.tanks.iter().find(|t| t.tank == id)
    }

    pub fn collisions(&self) -> impl Iterator<Item = &Collision> {
        self.events.iter().filter_map(|e| match e {
            BattleEvent::Collision(c) => Some(c),
            _ => None,
        })
    }
}

/// Renders the step line, e.g. `Move Forward, Shoot (ignored), killed`
impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tank) in self.tanks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", tank)?;
        }
        Ok(())
    }
}

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    PlayerWins {
        player: PlayerId,
        tanks_alive: usize,
    },
    TieBothEliminated,
    TieShellsExhausted {
        grace_steps: u32,
    },
    TieMaxSteps {
        max_steps: Step,
        player_one_tanks: usize,
        player_two_tanks: usize,
    },
}

impl Verdict {
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Verdict::PlayerWins { player, .. } => Some(*player),
            _ => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.winner().is_none()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::PlayerWins {
                player,
                tanks_alive,
            } => write!(f, "{} won with {} tanks still alive", player, tanks_alive),
            Verdict::TieBothEliminated => f.write_str("Tie, both players have zero tanks"),
            Verdict::TieShellsExhausted { grace_steps } => write!(
                f,
                "Tie, both players have zero shells for <{}> steps",
                grace_steps
            ),
            Verdict::TieMaxSteps {
                max_steps,
                player_one_tanks,
                player_two_tanks,
            } => write!(
                f,
                "Tie, reached max steps = {}, player 1 has {} tanks, player 2 has {} tanks",
                max_steps, player_one_tanks, player_two_tanks
            ),
        }
    }
}
