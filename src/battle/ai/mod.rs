//! Tank decision-making
//!
//! Architecture: trait boundary + built-in implementations
//! - TankStrategy is the per-tank capability the engine consumes
//! - StrategyFactory hands the engine one strategy per spawned tank
//! - ScriptedStrategy, HunterStrategy and ZoneControlStrategy are the
//!   bundled implementations
//!
//! The engine never inspects which concrete strategy it holds.

mod hunter;
mod scripted;
mod tracker;
mod zone_control;

pub use hunter::HunterStrategy;
pub use scripted::{ScriptedStrategy, SnapshotLog};
pub use zone_control::{ColumnZone, ZoneControlStrategy, ZoneObjective};

use crate::battle::actions::Action;
use crate::battle::snapshot::BattleView;
use crate::core::types::PlayerId;

/// Decision source for a single tank
pub trait TankStrategy {
    /// Choose this turn's action
    fn decide(&mut self) -> Action;

    /// Deliver a snapshot requested via [`Action::RequestIntel`]
    ///
    /// The view reflects the board at the start of the requesting turn.
    /// Implementations copy what they need; the reference does not outlive
    /// the call.
    fn receive_snapshot(&mut self, view: &BattleView);
}

/// Creates the strategy controlling each tank at battle setup
pub trait StrategyFactory {
    /// `tank_index` is the tank's creation order within its player
    fn create(&self, player: PlayerId, tank_index: usize) -> Box<dyn TankStrategy>;
}

impl<F> StrategyFactory for F
where
    F: Fn(PlayerId, usize) -> Box<dyn TankStrategy>,
{
    fn create(&self, player: PlayerId, tank_index: usize) -> Box<dyn TankStrategy> {
        self(player, tank_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_factory() {
        let factory = |player: PlayerId, index: usize| -> Box<dyn TankStrategy> {
            let action = match (player, index) {
                (PlayerId::One, 0) => Action::Shoot,
                _ => Action::NoOp,
            };
            Box::new(ScriptedStrategy::new(vec![action]))
        };

        assert_eq!(factory.create(PlayerId::One, 0).decide(), Action::Shoot);
        assert_eq!(factory.create(PlayerId::One, 1).decide(), Action::NoOp);
        assert_eq!(factory.create(PlayerId::Two, 0).decide(), Action::NoOp);
    }
}
