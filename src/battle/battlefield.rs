//! Entity arena paired with the occupancy grid
//!
//! The battlefield is the single owner of every entity. Slots are indexed by
//! [`EntityId`] and never reused. The board only holds handles, and every
//! spawn, move and removal goes through this type so the two never drift.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::battle::entities::{Entity, EntityKind, Mine, Shell, Wall};
use crate::battle::grid::Board;
use crate::battle::tank::Tank;
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{Direction, EntityId, PlayerId, Position};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battlefield {
    board: Board,
    slots: Vec<Option<Entity>>,
    /// Tank handles per player in creation order, including destroyed tanks
    rosters: [Vec<EntityId>; 2],
}

fn roster_index(player: PlayerId) -> usize {
    match player {
        PlayerId::One => 0,
        PlayerId::Two => 1,
    }
}

impl Battlefield {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            board: Board::new(width, height)?,
            slots: Vec::new(),
            rosters: [Vec::new(), Vec::new()],
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn width(&self) -> u32 {
        self.board.width
    }

    pub fn height(&self) -> u32 {
        self.board.height
    }

    fn next_id(&self) -> EntityId {
        EntityId(self.slots.len() as u32)
    }

    fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = entity.id();
        let requested = entity.position();
        let pos = self.board.wrap(requested);
        if pos != requested {
            warn!(entity = %id, from = %requested, to = %pos, "placement wrapped onto board");
        }
        entity.set_position(pos);
        self.board.place(id, pos);
        self.slots.push(Some(entity));
        id
    }

    pub fn spawn_wall(&mut self, pos: Position, hit_points: u32) -> EntityId {
        let id = self.next_id();
        self.insert(Entity::Wall(Wall::new(id, pos, hit_points)))
    }

    pub fn spawn_mine(&mut self, pos: Position) -> EntityId {
        let id = self.next_id();
        self.insert(Entity::Mine(Mine::new(id, pos)))
    }

    pub fn spawn_tank(
        &mut self,
        player: PlayerId,
        pos: Position,
        direction: Direction,
        config: &GameConfig,
    ) -> EntityId {
        let id = self.next_id();
        let index = self.rosters[roster_index(player)].len();
        self.rosters[roster_index(player)].push(id);
        self.insert(Entity::Tank(Tank::new(id, player, index, pos, direction, config)))
    }

    /// Spawn a shell on the firing tank's cell, facing the tank's direction
    pub fn spawn_shell(&mut self, owner: EntityId) -> Option<EntityId> {
        let (pos, direction) = {
            let tank = self.tank(owner)?;
            (tank.position, tank.direction)
        };
        let id = self.next_id();
        Some(self.insert(Entity::Shell(Shell::new(id, pos, direction, owner))))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        match self.get(id) {
            Some(Entity::Tank(t)) => Some(t),
            _ => None,
        }
    }

    pub fn tank_mut(&mut self, id: EntityId) -> Option<&mut Tank> {
        match self.get_mut(id) {
            Some(Entity::Tank(t)) => Some(t),
            _ => None,
        }
    }

    pub fn wall(&self, id: EntityId) -> Option<&Wall> {
        match self.get(id) {
            Some(Entity::Wall(w)) => Some(w),
            _ => None,
        }
    }

    pub fn shell(&self, id: EntityId) -> Option<&Shell> {
        match self.get(id) {
            Some(Entity::Shell(s)) => Some(s),
            _ => None,
        }
    }

    /// All tanks a player ever had, in creation order
    pub fn roster(&self, player: PlayerId) -> &[EntityId] {
        &self.rosters[roster_index(player)]
    }

    /// Living tanks, player 1 first, creation order within a player
    pub fn live_tanks(&self) -> Vec<EntityId> {
        PlayerId::ALL
            .iter()
            .flat_map(|&p| self.roster(p).iter().copied())
            .filter(|&id| self.tank(id).is_some_and(|t| !t.is_destroyed()))
            .collect()
    }

    pub fn living_count(&self, player: PlayerId) -> usize {
        self.roster(player)
            .iter()
            .filter(|&&id| self.tank(id).is_some_and(|t| !t.is_destroyed()))
            .count()
    }

    /// Shells held by living tanks; shells in flight are not counted
    pub fn total_shells_left(&self) -> u32 {
        self.live_tanks()
            .into_iter()
            .filter_map(|id| self.tank(id))
            .map(Tank::shells_left)
            .sum()
    }

    /// Live shells in creation order
    pub fn live_shells(&self) -> Vec<EntityId> {
        self.live_of_kind(EntityKind::Shell)
    }

    pub fn live_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.slots
            .iter()
            .flatten()
            .filter(|e| e.kind() == kind && !e.is_destroyed())
            .map(Entity::id)
            .collect()
    }

    pub fn occupants_at(&self, pos: Position) -> &[EntityId] {
        self.board.occupants_at(pos)
    }

    /// A standing wall occupies the cell
    pub fn has_wall_at(&self, pos: Position) -> bool {
        self.board.occupants_at(pos).iter().any(|&id| {
            matches!(self.get(id), Some(e @ Entity::Wall(_)) if !e.is_destroyed())
        })
    }

    /// Move an entity, updating its grid cell in the same operation
    pub fn relocate(&mut self, id: EntityId, target: Position) -> bool {
        let target = self.board.wrap(target);
        let Some(entity) = self.slots.get_mut(id.index()).and_then(Option::as_mut) else {
            return false;
        };
        let old = entity.position();
        entity.set_position(target);
        self.board.remove_at(id, old);
        self.board.place(id, target);
        true
    }

    /// Move a tank unless a wall stands on the target cell
    pub fn move_tank(&mut self, id: EntityId, target: Position) -> bool {
        if self.has_wall_at(target) {
            return false;
        }
        self.relocate(id, target)
    }

    /// Advance a shell one cell along its direction
    pub fn advance_shell(&mut self, id: EntityId) -> bool {
        let Some(target) = self.shell(id).map(|s| s.position.step(s.direction)) else {
            return false;
        };
        self.relocate(id, target)
    }

    /// Remove destroyed entities of the given kinds from grid and arena
    ///
    /// Destroyed tanks leave the grid but keep their slot so the roster can
    /// still report them.
    pub fn prune(&mut self, kinds: &[EntityKind]) -> Vec<EntityId> {
        let mut removed = Vec::new();
        for slot in self.slots.iter_mut() {
            let Some(entity) = slot else { continue };
            if !entity.is_destroyed() || !kinds.contains(&entity.kind()) {
                continue;
            }
            let id = entity.id();
            let on_board = self.board.remove_at(id, entity.position());
            if entity.kind() == EntityKind::Tank {
                if on_board {
                    removed.push(id);
                }
            } else {
                *slot = None;
                removed.push(id);
            }
        }
        removed
    }

    /// Audit that grid and arena agree
    ///
    /// Every grid handle must resolve to an entity recorded at that cell, and
    /// every live entity must appear on the grid exactly once.
    pub fn is_consistent(&self) -> bool {
        for (pos, occupants) in self.board.cells() {
            for &id in occupants {
                match self.get(id) {
                    Some(e) if e.position() == pos => {}
                    _ => return false,
                }
            }
        }

        self.slots.iter().flatten().all(|e| {
            let count = self
                .board
                .occupants_at(e.position())
                .iter()
                .filter(|&&id| id == e.id())
                .count();
            if e.is_destroyed() {
                count <= 1
            } else {
                count == 1
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Battlefield {
        Battlefield::new(6, 4).expect("valid size")
    }

    fn tank_at(
        f: &mut Battlefield,
        player: PlayerId,
        pos: Position,
        facing: Direction,
    ) -> EntityId {
        f.spawn_tank(player, pos, facing, &GameConfig::default())
    }

    #[test]
    fn test_zero_sized_field_rejected() {
        assert!(matches!(
            Battlefield::new(0, 0),
            Err(crate::core::error::BattleError::InvalidDimensions { width: 0, height: 0 })
        ));
    }

    #[test]
    fn test_spawn_places_on_grid() {
        let mut f = field();
        let wall = f.spawn_wall(Position::new(1, 1), 2);
        let tank = tank_at(&mut f, PlayerId::One, Position::new(7, 1), Direction::Right);

        assert_eq!(f.occupants_at(Position::new(1, 1)), &[wall, tank]);
        assert_eq!(f.tank(tank).map(|t| t.position), Some(Position::new(1, 1)));
        assert!(f.is_consistent());
    }

    #[test]
    fn test_relocate_keeps_grid_in_step() {
        let mut f = field();
        let tank = tank_at(&mut f, PlayerId::Two, Position::new(0, 0), Direction::Left);
        assert!(f.relocate(tank, Position::new(-1, 0)));

        assert!(f.occupants_at(Position::new(0, 0)).is_empty());
        assert_eq!(f.occupants_at(Position::new(5, 0)), &[tank]);
        assert!(f.is_consistent());
    }

    #[test]
    fn test_move_tank_blocked_by_wall() {
        let mut f = field();
        f.spawn_wall(Position::new(2, 0), 2);
        let tank = tank_at(&mut f, PlayerId::One, Position::new(1, 0), Direction::Right);
        assert!(!f.move_tank(tank, Position::new(2, 0)));
        assert_eq!(f.tank(tank).map(|t| t.position), Some(Position::new(1, 0)));
    }

    #[test]
    fn test_shell_wraps_at_edge() {
        let mut f = field();
        let tank = tank_at(&mut f, PlayerId::One, Position::new(5, 2), Direction::Right);
        let shell = f.spawn_shell(tank).expect("tank exists");
        assert!(f.advance_shell(shell));
        assert_eq!(f.shell(shell).map(|s| s.position), Some(Position::new(0, 2)));
        assert!(f.is_consistent());
    }

    #[test]
    fn test_prune_removes_slot_and_reference() {
        let mut f = field();
        let mine = f.spawn_mine(Position::new(3, 3));
        let wall = f.spawn_wall(Position::new(3, 3), 1);
        if let Some(e) = f.get_mut(mine) {
            e.destroy();
        }

        // Walls are not requested, so only the mine goes
        let removed = f.prune(&[EntityKind::Mine, EntityKind::Shell]);
        assert_eq!(removed, vec![mine]);
        assert!(f.get(mine).is_none());
        assert_eq!(f.occupants_at(Position::new(3, 3)), &[wall]);
        assert!(f.is_consistent());
    }

    #[test]
    fn test_destroyed_tank_stays_in_roster() {
        let mut f = field();
        let config = GameConfig::default();
        let a = f.spawn_tank(PlayerId::One, Position::new(0, 0), Direction::Right, &config);
        let b = f.spawn_tank(PlayerId::One, Position::new(1, 0), Direction::Right, &config);
        if let Some(t) = f.tank_mut(a) {
            t.destroy();
        }

        assert_eq!(f.prune(&[EntityKind::Tank]), vec![a]);
        assert_eq!(f.roster(PlayerId::One), &[a, b]);
        assert_eq!(f.living_count(PlayerId::One), 1);
        assert!(f.tank(a).is_some_and(Tank::is_destroyed));
        assert!(f.occupants_at(Position::new(0, 0)).is_empty());

        // A second prune finds nothing new
        assert!(f.prune(&[EntityKind::Tank]).is_empty());
        assert!(f.is_consistent());
    }

    #[test]
    fn test_live_tanks_order_and_shell_total() {
        let mut f = field();
        let config = GameConfig::default().with_shells_per_tank(3);
        let p2 = f.spawn_tank(PlayerId::Two, Position::new(4, 0), Direction::Left, &config);
        let p1a = f.spawn_tank(PlayerId::One, Position::new(0, 1), Direction::Right, &config);
        let p1b = f.spawn_tank(PlayerId::One, Position::new(0, 2), Direction::Right, &config);

        assert_eq!(f.live_tanks(), vec![p1a, p1b, p2]);
        assert_eq!(f.total_shells_left(), 9);
    }
}
