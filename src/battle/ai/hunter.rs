//! Hunter strategy: chase and shoot the nearest enemy
//!
//! Works purely from snapshots. Between snapshots it dead-reckons its own
//! position and facing from the actions it issued, and asks for fresh intel
//! every few turns to pick up enemy movement.

use std::collections::VecDeque;

use super::tracker::SelfTracker;
use super::TankStrategy;
use crate::battle::actions::Action;
use crate::battle::snapshot::{BattleView, CellSymbol};
use crate::core::config::GameConfig;
use crate::core::types::{Direction, PlayerId, Position};

/// Turns a snapshot stays trusted before intel is requested again
pub const DEFAULT_REFRESH_INTERVAL: u32 = 3;

#[derive(Debug, Clone)]
pub struct HunterStrategy {
    refresh_interval: u32,
    turns_since_intel: u32,
    view: Option<BattleView>,
    me: SelfTracker,
}

impl HunterStrategy {
    pub fn new(player: PlayerId, config: &GameConfig) -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            turns_since_intel: 0,
            view: None,
            me: SelfTracker::new(player, config),
        }
    }

    pub fn with_refresh_interval(mut self, turns: u32) -> Self {
        self.refresh_interval = turns.max(1);
        self
    }

    pub fn facing(&self) -> Direction {
        self.me.facing
    }

    /// Walk a firing line until something would stop the shell
    fn enemy_in_line(&self, view: &BattleView, direction: Direction) -> bool {
        let reach = view.width().max(view.height());
        let mut pos = self.me.position;
        for _ in 0..reach {
            pos = pos.step(direction).wrapped(view.width(), view.height());
            match self.me.cell(view, pos) {
                CellSymbol::EnemyTank => return true,
                CellSymbol::Wall | CellSymbol::AllyTank | CellSymbol::SelfTank => return false,
                _ => {}
            }
        }
        false
    }

    /// First step of a shortest toroidal path to any enemy
    fn first_step_toward_enemy(&self, view: &BattleView) -> Option<Direction> {
        let width = view.width() as usize;
        let index = |p: Position| p.y as usize * width + p.x as usize;

        let mut first: Vec<Option<Direction>> = vec![None; width * view.height() as usize];
        let mut visited = vec![false; first.len()];
        let mut queue = VecDeque::new();

        visited[index(self.me.position)] = true;
        queue.push_back(self.me.position);

        while let Some(current) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = current.step(direction).wrapped(view.width(), view.height());
                let slot = index(next);
                if visited[slot] {
                    continue;
                }
                visited[slot] = true;

                let step = first[index(current)].or(Some(direction));
                match self.me.cell(view, next) {
                    CellSymbol::EnemyTank => return step,
                    CellSymbol::Wall | CellSymbol::Mine | CellSymbol::AllyTank => continue,
                    _ => {
                        first[slot] = step;
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    fn plan(&mut self, view: &BattleView) -> Action {
        let firing_lines: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| self.enemy_in_line(view, d))
            .collect();

        if self.me.has_shells() && !firing_lines.is_empty() {
            if firing_lines.contains(&self.me.facing) {
                if self.me.can_fire() {
                    return self.me.shoot();
                }
                return Action::NoOp;
            }
            let facing = self.me.facing;
            let target = firing_lines
                .iter()
                .copied()
                .min_by_key(|&d| facing.eighths_to(d).abs())
                .unwrap_or(facing);
            return self.me.rotate_toward(target);
        }

        match self.first_step_toward_enemy(view) {
            Some(direction) if direction == self.me.facing => self.me.advance(view),
            Some(direction) => self.me.rotate_toward(direction),
            None => Action::NoOp,
        }
    }
}

impl TankStrategy for HunterStrategy {
    fn decide(&mut self) -> Action {
        self.turns_since_intel += 1;
        self.me.tick();

        let stale = self.turns_since_intel > self.refresh_interval;
        let Some(view) = self.view.take().filter(|_| !stale) else {
            return Action::RequestIntel;
        };
        let action = self.plan(&view);
        self.view = Some(view);
        action
    }

    fn receive_snapshot(&mut self, view: &BattleView) {
        self.me.sync(view);
        self.view = Some(view.clone());
        self.turns_since_intel = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battlefield::Battlefield;
    use crate::core::types::EntityId;

    fn view_for(field: &Battlefield, tank: EntityId) -> BattleView {
        BattleView::capture(field, field.tank(tank).expect("tank"))
    }

    #[test]
    fn test_requests_intel_first() {
        let mut hunter = HunterStrategy::new(PlayerId::One, &GameConfig::default());
        assert_eq!(hunter.decide(), Action::RequestIntel);
    }

    #[test]
    fn test_shoots_enemy_in_line() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(8, 3).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(1, 1), Direction::Right, &config);
        field.spawn_tank(PlayerId::Two, Position::new(6, 1), Direction::Left, &config);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config);
        hunter.receive_snapshot(&view_for(&field, me));
        assert_eq!(hunter.decide(), Action::Shoot);
        // Still cooling down next turn
        assert_eq!(hunter.decide(), Action::NoOp);
    }

    #[test]
    fn test_wall_blocks_line_of_fire() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(8, 3).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(1, 1), Direction::Right, &config);
        field.spawn_wall(Position::new(3, 1), 2);
        field.spawn_tank(PlayerId::Two, Position::new(6, 1), Direction::Left, &config);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config);
        hunter.receive_snapshot(&view_for(&field, me));
        assert_ne!(hunter.decide(), Action::Shoot);
    }

    #[test]
    fn test_rotates_toward_diagonal_target() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(9, 9).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(2, 2), Direction::Right, &config);
        field.spawn_tank(PlayerId::Two, Position::new(5, 5), Direction::Left, &config);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config);
        hunter.receive_snapshot(&view_for(&field, me));
        assert_eq!(hunter.decide(), Action::RotateEighthRight);
        assert_eq!(hunter.facing(), Direction::DownRight);
        assert_eq!(hunter.decide(), Action::Shoot);
    }

    #[test]
    fn test_paths_toward_hidden_enemy() {
        // No straight or diagonal line connects the two tanks
        let config = GameConfig::default();
        let mut field = Battlefield::new(7, 7).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(0, 0), Direction::Right, &config);
        field.spawn_tank(PlayerId::Two, Position::new(3, 5), Direction::Left, &config);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config);
        hunter.receive_snapshot(&view_for(&field, me));

        // Shortest route climbs over the top edge
        assert_eq!(hunter.decide(), Action::RotateEighthLeft);
        assert_eq!(hunter.facing(), Direction::UpRight);
        assert_eq!(hunter.decide(), Action::MoveForward);
    }

    #[test]
    fn test_avoids_mined_cell() {
        // Same layout as above, but the diagonal first step is mined
        let config = GameConfig::default();
        let mut field = Battlefield::new(7, 7).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(0, 0), Direction::Right, &config);
        field.spawn_mine(Position::new(1, 6));
        field.spawn_tank(PlayerId::Two, Position::new(3, 5), Direction::Left, &config);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config);
        hunter.receive_snapshot(&view_for(&field, me));
        assert_eq!(hunter.decide(), Action::MoveForward);
        assert_eq!(hunter.facing(), Direction::Right);
    }

    #[test]
    fn test_refreshes_stale_view() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(5, 5).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(0, 0), Direction::Right, &config);
        field.spawn_wall(Position::new(1, 0), 2);

        let mut hunter = HunterStrategy::new(PlayerId::One, &config).with_refresh_interval(2);
        hunter.receive_snapshot(&view_for(&field, me));
        // No enemies visible
        assert_eq!(hunter.decide(), Action::NoOp);
        assert_eq!(hunter.decide(), Action::NoOp);
        assert_eq!(hunter.decide(), Action::RequestIntel);
    }
}
