//! Fixed action scripts, mainly for tests and replays

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::TankStrategy;
use crate::battle::actions::Action;
use crate::battle::snapshot::BattleView;

/// Shared record of every snapshot a scripted tank received
pub type SnapshotLog = Rc<RefCell<Vec<BattleView>>>;

/// Plays a queued list of actions, then repeats a fallback forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedStrategy {
    script: VecDeque<Action>,
    fallback: Action,
    snapshots: Option<SnapshotLog>,
}

impl ScriptedStrategy {
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: Action::NoOp,
            snapshots: None,
        }
    }

    /// Strategy that always returns `action`
    pub fn repeating(action: Action) -> Self {
        Self::new([]).with_fallback(action)
    }

    pub fn with_fallback(mut self, fallback: Action) -> Self {
        self.fallback = fallback;
        self
    }

    /// Record received snapshots into `log`
    pub fn recording(mut self, log: SnapshotLog) -> Self {
        self.snapshots = Some(log);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TankStrategy for ScriptedStrategy {
    fn decide(&mut self) -> Action {
        self.script.pop_front().unwrap_or(self.fallback)
    }

    fn receive_snapshot(&mut self, view: &BattleView) {
        if let Some(log) = &self.snapshots {
            log.borrow_mut().push(view.clone());
        }
    }
}
