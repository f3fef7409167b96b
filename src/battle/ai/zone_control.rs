//! Zone control strategy: hold a column band of the board
//!
//! Each side's tanks split the board into equal column zones, left to right
//! in row-major order of their positions. Every turn the tank works down a
//! fixed list of objectives and acts on the first one that applies:
//! - Rejoin: drive horizontally back to the zone's centre column
//! - Dodge: step out of the row or column of a nearby shell
//! - Engage: shoot an enemy in the zone along a row or column, even through walls
//! - TakeCover: move next to the closest wall inside the zone
//! - Hold: do nothing
//!
//! Zones are recomputed whenever a snapshot shows fewer allies than before.

use serde::{Deserialize, Serialize};

use super::tracker::SelfTracker;
use super::TankStrategy;
use crate::battle::actions::Action;
use crate::battle::snapshot::{BattleView, CellSymbol};
use crate::core::config::GameConfig;
use crate::core::types::{Direction, PlayerId, Position};

/// Snapshot age, in turns, that triggers a fresh intel request
pub const ZONE_REFRESH_INTERVAL: u32 = 4;

/// Shells this many cells away along a row or column are dodged
pub const SHELL_DANGER_RANGE: i32 = 7;

/// Inclusive band of columns one tank is responsible for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnZone {
    pub start: i32,
    pub end: i32,
}

impl ColumnZone {
    /// Zone `index` of `count` equal bands; the last band takes the remainder
    pub fn split(width: u32, count: usize, index: usize) -> Self {
        let width = width.max(1) as i32;
        let count = count.max(1) as i32;
        let index = (index as i32).min(count - 1);
        let band = (width / count).max(1);

        let start = (index * band).min(width - 1);
        let end = if index == count - 1 {
            width - 1
        } else {
            ((index + 1) * band - 1).min(width - 1)
        };
        Self { start, end }
    }

    pub fn contains(&self, x: i32) -> bool {
        (self.start..=self.end).contains(&x)
    }

    pub fn center(&self) -> i32 {
        (self.start + self.end) / 2
    }
}

/// What the last decision was trying to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneObjective {
    Refresh,
    Rejoin,
    Dodge,
    Engage,
    TakeCover,
    Hold,
}

#[derive(Debug, Clone)]
pub struct ZoneControlStrategy {
    refresh_interval: u32,
    turns_since_intel: u32,
    force_refresh: bool,
    view: Option<BattleView>,
    me: SelfTracker,

    zone: Option<ColumnZone>,
    known_allies: usize,
    known_enemies: usize,
    objective: ZoneObjective,
}

impl ZoneControlStrategy {
    pub fn new(player: PlayerId, config: &GameConfig) -> Self {
        Self {
            refresh_interval: ZONE_REFRESH_INTERVAL,
            turns_since_intel: 0,
            force_refresh: false,
            view: None,
            me: SelfTracker::new(player, config),
            zone: None,
            known_allies: 0,
            known_enemies: 0,
            objective: ZoneObjective::Refresh,
        }
    }

    pub fn with_refresh_interval(mut self, turns: u32) -> Self {
        self.refresh_interval = turns.max(1);
        self
    }

    pub fn zone(&self) -> Option<ColumnZone> {
        self.zone
    }

    pub fn objective(&self) -> ZoneObjective {
        self.objective
    }

    pub fn facing(&self) -> Direction {
        self.me.facing
    }

    /// Drive forward unless the next cell would stop or kill the tank
    fn drive(&mut self, view: &BattleView) -> Option<Action> {
        match self.me.forward_cell(view) {
            CellSymbol::Wall | CellSymbol::Mine | CellSymbol::AllyTank => None,
            _ => Some(self.me.advance(view)),
        }
    }

    /// Face `direction`, then drive; `None` when the way is blocked
    fn head(&mut self, view: &BattleView, direction: Direction) -> Option<Action> {
        if self.me.facing != direction {
            return Some(self.me.rotate_toward(direction));
        }
        self.drive(view)
    }

    fn rejoin(&mut self, view: &BattleView, zone: ColumnZone) -> Option<Action> {
        let dx = zone.center() - self.me.position.x;
        let direction = match dx {
            0 => return None,
            d if d > 0 => Direction::Right,
            _ => Direction::Left,
        };
        self.head(view, direction)
    }

    fn dodge(&mut self, view: &BattleView) -> Option<Action> {
        let here = self.me.position;
        let threat = view.positions_of(CellSymbol::Shell).find_map(|shell| {
            let (dx, dy) = ((shell.x - here.x).abs(), (shell.y - here.y).abs());
            if shell.y == here.y && (1..=SHELL_DANGER_RANGE).contains(&dx) {
                Some([Direction::Left, Direction::Right])
            } else if shell.x == here.x && (1..=SHELL_DANGER_RANGE).contains(&dy) {
                Some([Direction::Up, Direction::Down])
            } else {
                None
            }
        })?;

        // Any facing off the shell's axis leaves its path
        if !threat.contains(&self.me.facing) {
            if let Some(action) = self.drive(view) {
                return Some(action);
            }
        }
        let escape = self.me.facing.rotated(2);
        Some(self.me.rotate_toward(escape))
    }

    /// Straight row or column line to `target`, reporting whether walls
    /// sit in between; `None` if an ally blocks it
    fn line_to(&self, view: &BattleView, target: Position) -> Option<(Direction, bool)> {
        let here = self.me.position;
        let direction = match (target.x - here.x, target.y - here.y) {
            (0, dy) if dy > 0 => Direction::Down,
            (0, dy) if dy < 0 => Direction::Up,
            (dx, 0) if dx > 0 => Direction::Right,
            (dx, 0) if dx < 0 => Direction::Left,
            _ => return None,
        };

        let mut walled = false;
        let mut pos = here.step(direction);
        while pos != target {
            match self.me.cell(view, pos) {
                CellSymbol::Wall => walled = true,
                CellSymbol::AllyTank | CellSymbol::SelfTank => return None,
                _ => {}
            }
            pos = pos.step(direction);
        }
        Some((direction, walled))
    }

    fn engage(&mut self, view: &BattleView, zone: ColumnZone) -> Option<Action> {
        if !self.me.has_shells() {
            return None;
        }
        let facing = self.me.facing;
        let (direction, _) = view
            .enemies()
            .filter(|e| zone.contains(e.x))
            .filter_map(|e| self.line_to(view, e))
            .min_by_key(|&(direction, walled)| (walled, facing.eighths_to(direction).abs()))?;

        if self.me.facing != direction {
            return Some(self.me.rotate_toward(direction));
        }
        if self.me.can_fire() {
            return Some(self.me.shoot());
        }
        Some(Action::NoOp)
    }

    /// Closest free cell next to a wall, both inside the zone
    fn cover_spot(&self, view: &BattleView, zone: ColumnZone) -> Option<Position> {
        let here = self.me.position;
        let mut best: Option<(i32, Position)> = None;
        for wall in view.positions_of(CellSymbol::Wall).filter(|w| zone.contains(w.x)) {
            for direction in [Direction::Right, Direction::Left, Direction::Down, Direction::Up] {
                let spot = wall.step(direction);
                if !zone.contains(spot.x) {
                    continue;
                }
                let free = spot == here || view.cell_at(spot.x, spot.y) == CellSymbol::Empty;
                if !free {
                    continue;
                }
                let distance = (spot.x - here.x).abs() + (spot.y - here.y).abs();
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, spot));
                }
            }
        }
        best.map(|(_, spot)| spot)
    }

    fn take_cover(&mut self, view: &BattleView, zone: ColumnZone) -> Option<Action> {
        let spot = self.cover_spot(view, zone)?;
        let here = self.me.position;
        let direction = if spot.x > here.x {
            Direction::Right
        } else if spot.x < here.x {
            Direction::Left
        } else if spot.y > here.y {
            Direction::Down
        } else if spot.y < here.y {
            Direction::Up
        } else {
            return None;
        };
        self.head(view, direction)
    }

    fn commit(&mut self, objective: ZoneObjective, action: Action) -> Action {
        self.objective = objective;
        action
    }

    fn plan(&mut self, view: &BattleView) -> Action {
        let zone = self
            .zone
            .unwrap_or_else(|| ColumnZone::split(view.width(), 1, 0));

        if let Some(action) = self.rejoin(view, zone) {
            return self.commit(ZoneObjective::Rejoin, action);
        }
        if let Some(action) = self.dodge(view) {
            return self.commit(ZoneObjective::Dodge, action);
        }
        if let Some(action) = self.engage(view, zone) {
            return self.commit(ZoneObjective::Engage, action);
        }
        if let Some(action) = self.take_cover(view, zone) {
            return self.commit(ZoneObjective::TakeCover, action);
        }
        self.commit(ZoneObjective::Hold, Action::NoOp)
    }

    /// Own index among allies in row-major order, and the ally count
    fn rank(view: &BattleView) -> (usize, usize) {
        let me = view.self_position();
        let mut allies: Vec<Position> = view.positions_of(CellSymbol::AllyTank).collect();
        allies.push(me);
        allies.sort_by_key(|p| (p.y, p.x));
        let index = allies.iter().position(|&p| p == me).unwrap_or(0);
        (index, allies.len())
    }
}

impl TankStrategy for ZoneControlStrategy {
    fn decide(&mut self) -> Action {
        self.turns_since_intel += 1;
        self.me.tick();

        let forced = std::mem::take(&mut self.force_refresh);
        let stale = self.turns_since_intel > self.refresh_interval;
        let Some(view) = self.view.take().filter(|_| !stale && !forced) else {
            return self.commit(ZoneObjective::Refresh, Action::RequestIntel);
        };
        let action = self.plan(&view);
        self.view = Some(view);
        action
    }

    fn receive_snapshot(&mut self, view: &BattleView) {
        self.me.sync(view);
        self.view = Some(view.clone());
        self.turns_since_intel = 0;

        let (index, allies) = Self::rank(view);
        let enemies = view.enemies().count();
        let ally_lost = allies < self.known_allies;
        let enemy_lost = enemies < self.known_enemies;

        if self.zone.is_none() || ally_lost {
            self.zone = Some(ColumnZone::split(view.width(), allies, index));
        }
        // A kill changes the picture; look again next turn
        self.force_refresh = ally_lost || enemy_lost;
        self.known_allies = allies;
        self.known_enemies = enemies;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battlefield::Battlefield;
    use crate::battle::entities::EntityKind;
    use crate::core::types::EntityId;

    fn view_for(field: &Battlefield, tank: EntityId) -> BattleView {
        BattleView::capture(field, field.tank(tank).expect("tank"))
    }

    fn kill(field: &mut Battlefield, tank: EntityId) {
        if let Some(t) = field.tank_mut(tank) {
            t.destroy();
        }
        field.prune(&[EntityKind::Tank]);
    }

    fn strategy_for(field: &Battlefield, tank: EntityId) -> ZoneControlStrategy {
        let mut zone = ZoneControlStrategy::new(PlayerId::One, &GameConfig::default());
        zone.receive_snapshot(&view_for(field, tank));
        zone
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(ColumnZone::split(20, 1, 0), ColumnZone { start: 0, end: 19 });
        assert_eq!(ColumnZone::split(20, 3, 0), ColumnZone { start: 0, end: 5 });
        assert_eq!(ColumnZone::split(20, 3, 1), ColumnZone { start: 6, end: 11 });
        assert_eq!(ColumnZone::split(20, 3, 2), ColumnZone { start: 12, end: 19 });
        // More tanks than columns still yields non-empty zones
        assert_eq!(ColumnZone::split(2, 4, 3), ColumnZone { start: 1, end: 1 });
        assert_eq!(ColumnZone::split(20, 2, 1).center(), 14);
    }

    #[test]
    fn test_requests_intel_first() {
        let mut zone = ZoneControlStrategy::new(PlayerId::One, &GameConfig::default());
        assert_eq!(zone.decide(), Action::RequestIntel);
        assert_eq!(zone.objective(), ZoneObjective::Refresh);
    }

    #[test]
    fn test_zones_follow_row_major_rank() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(12, 4).expect("valid size");
        let top = field.spawn_tank(PlayerId::One, Position::new(9, 0), Direction::Right, &config);
        let lower = field.spawn_tank(PlayerId::One, Position::new(1, 2), Direction::Right, &config);
        field.spawn_tank(PlayerId::Two, Position::new(5, 3), Direction::Left, &config);

        // Rank is by row first, so the tank at (9, 0) owns the left half
        let first = ColumnZone { start: 0, end: 5 };
        let second = ColumnZone { start: 6, end: 11 };
        assert_eq!(strategy_for(&field, top).zone(), Some(first));
        assert_eq!(strategy_for(&field, lower).zone(), Some(second));
    }

    #[test]
    fn test_rejoins_zone_center() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(12, 4).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(9, 0), Direction::Right, &config);
        field.spawn_tank(PlayerId::One, Position::new(1, 2), Direction::Right, &config);
        field.spawn_tank(PlayerId::Two, Position::new(5, 3), Direction::Left, &config);

        let mut zone = strategy_for(&field, me);
        // Centre of columns 0..=5 is column 2, behind the tank
        assert_eq!(zone.decide(), Action::RotateQuarterRight);
        assert_eq!(zone.facing(), Direction::Down);
        assert_eq!(zone.decide(), Action::RotateQuarterRight);
        assert_eq!(zone.decide(), Action::MoveForward);
        assert_eq!(zone.objective(), ZoneObjective::Rejoin);
    }

    #[test]
    fn test_resplits_when_ally_lost() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(12, 4).expect("valid size");
        let ally = field.spawn_tank(PlayerId::One, Position::new(1, 0), Direction::Right, &config);
        let me = field.spawn_tank(PlayerId::One, Position::new(8, 2), Direction::Right, &config);
        let enemy = field.spawn_tank(PlayerId::Two, Position::new(5, 3), Direction::Left, &config);

        let mut zone = strategy_for(&field, me);
        assert_eq!(zone.zone(), Some(ColumnZone { start: 6, end: 11 }));

        kill(&mut field, ally);
        zone.receive_snapshot(&view_for(&field, me));
        assert_eq!(zone.zone(), Some(ColumnZone { start: 0, end: 11 }));
        // Losing a tank triggers an immediate second look
        assert_eq!(zone.decide(), Action::RequestIntel);

        // Losing an enemy only refreshes; the zone stays
        zone.receive_snapshot(&view_for(&field, me));
        kill(&mut field, enemy);
        zone.receive_snapshot(&view_for(&field, me));
        assert_eq!(zone.zone(), Some(ColumnZone { start: 0, end: 11 }));
        assert_eq!(zone.decide(), Action::RequestIntel);
    }

    #[test]
    fn test_dodges_shell_in_row() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(7, 5).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(3, 2), Direction::Right, &config);
        let enemy = field.spawn_tank(PlayerId::Two, Position::new(0, 0), Direction::Left, &config);
        let shell = field.spawn_shell(enemy).expect("enemy can fire");
        field.relocate(shell, Position::new(6, 2));

        let mut zone = strategy_for(&field, me);
        // Facing along the shell's row: turn off it, then drive out
        assert_eq!(zone.decide(), Action::RotateQuarterRight);
        assert_eq!(zone.objective(), ZoneObjective::Dodge);
        assert_eq!(zone.facing(), Direction::Down);
        assert_eq!(zone.decide(), Action::MoveForward);
    }

    #[test]
    fn test_shoots_through_wall_in_zone() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(7, 3).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(3, 1), Direction::Right, &config);
        field.spawn_wall(Position::new(4, 1), 2);
        field.spawn_tank(PlayerId::Two, Position::new(6, 1), Direction::Left, &config);

        let mut zone = strategy_for(&field, me);
        assert_eq!(zone.decide(), Action::Shoot);
        assert_eq!(zone.objective(), ZoneObjective::Engage);
        // Waits out the cooldown instead of wandering off
        assert_eq!(zone.decide(), Action::NoOp);
        assert_eq!(zone.objective(), ZoneObjective::Engage);
    }

    #[test]
    fn test_ignores_enemy_outside_zone() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(8, 3).expect("valid size");
        field.spawn_tank(PlayerId::One, Position::new(1, 0), Direction::Right, &config);
        let me = field.spawn_tank(PlayerId::One, Position::new(6, 1), Direction::Left, &config);
        field.spawn_tank(PlayerId::Two, Position::new(2, 1), Direction::Left, &config);

        let mut zone = strategy_for(&field, me);
        assert_eq!(zone.zone(), Some(ColumnZone { start: 4, end: 7 }));
        // Enemy at column 2 is the other tank's business
        assert_ne!(zone.decide(), Action::Shoot);
        assert_ne!(zone.objective(), ZoneObjective::Engage);
    }

    #[test]
    fn test_moves_into_cover_then_holds() {
        let config = GameConfig::default();
        let mut field = Battlefield::new(5, 5).expect("valid size");
        let me = field.spawn_tank(PlayerId::One, Position::new(2, 3), Direction::Right, &config);
        field.spawn_wall(Position::new(2, 0), 2);
        field.spawn_tank(PlayerId::Two, Position::new(0, 4), Direction::Left, &config);

        let mut zone = strategy_for(&field, me);
        // Nearest spot beside the wall is (2, 1), straight up
        assert_eq!(zone.decide(), Action::RotateQuarterLeft);
        assert_eq!(zone.objective(), ZoneObjective::TakeCover);
        assert_eq!(zone.decide(), Action::MoveForward);
        assert_eq!(zone.decide(), Action::MoveForward);
        assert_eq!(zone.decide(), Action::NoOp);
        assert_eq!(zone.objective(), ZoneObjective::Hold);
    }
}
