//! Collision rules for co-located entities
//!
//! Rules are a match over (mover kind, occupant kind). A scan walks the
//! mover's cell in insertion order and skips itself and anything already
//! destroyed, so no rule can fire twice against the same entity.

use serde::{Deserialize, Serialize};

use crate::battle::battlefield::Battlefield;
use crate::battle::entities::{Entity, EntityKind};
use crate::core::types::EntityId;

/// A rule that fired during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    ShellHitWall {
        shell: EntityId,
        wall: EntityId,
        wall_destroyed: bool,
    },
    ShellsCollided {
        a: EntityId,
        b: EntityId,
    },
    ShellHitTank {
        shell: EntityId,
        tank: EntityId,
    },
    TankHitMine {
        tank: EntityId,
        mine: EntityId,
    },
    TanksCollided {
        a: EntityId,
        b: EntityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    ShellWall,
    ShellShell,
    ShellTank,
    TankMine,
    TankTank,
}

fn rule_for(mover: EntityKind, occupant: EntityKind) -> Option<Rule> {
    match (mover, occupant) {
        (EntityKind::Shell, EntityKind::Wall) => Some(Rule::ShellWall),
        (EntityKind::Shell, EntityKind::Shell) => Some(Rule::ShellShell),
        (EntityKind::Shell, EntityKind::Tank) => Some(Rule::ShellTank),
        (EntityKind::Tank, EntityKind::Mine) => Some(Rule::TankMine),
        (EntityKind::Tank, EntityKind::Tank) => Some(Rule::TankTank),
        // Shells fly over mines; tank-on-shell contact is settled when the shell moves
        _ => None,
    }
}

fn destroy(field: &mut Battlefield, id: EntityId) {
    if let Some(entity) = field.get_mut(id) {
        entity.destroy();
    }
}

/// Live co-occupants of `mover`'s cell, excluding itself
fn live_neighbours(field: &Battlefield, mover: EntityId) -> Vec<(EntityId, EntityKind)> {
    let Some(pos) = field.get(mover).map(Entity::position) else {
        return Vec::new();
    };
    field
        .occupants_at(pos)
        .iter()
        .filter(|&&id| id != mover)
        .filter_map(|&id| field.get(id).map(|e| (id, e)))
        .filter(|(_, e)| !e.is_destroyed())
        .map(|(id, e)| (id, e.kind()))
        .collect()
}

fn is_live(field: &Battlefield, id: EntityId) -> bool {
    field.get(id).is_some_and(|e| !e.is_destroyed())
}

/// Resolve a shell that just entered its cell
///
/// Every shell rule destroys the shell, so the scan stops at the first rule
/// that fires.
pub fn resolve_shell(field: &mut Battlefield, shell: EntityId) -> Option<Collision> {
    if !is_live(field, shell) {
        return None;
    }

    for (other, kind) in live_neighbours(field, shell) {
        let Some(rule) = rule_for(EntityKind::Shell, kind) else {
            continue;
        };
        let collision = match rule {
            Rule::ShellWall => {
                let wall_destroyed = match field.get_mut(other) {
                    Some(Entity::Wall(wall)) => wall.take_hit(),
                    _ => false,
                };
                Collision::ShellHitWall {
                    shell,
                    wall: other,
                    wall_destroyed,
                }
            }
            Rule::ShellShell => {
                destroy(field, other);
                Collision::ShellsCollided { a: shell, b: other }
            }
            Rule::ShellTank => {
                destroy(field, other);
                Collision::ShellHitTank { shell, tank: other }
            }
            Rule::TankMine | Rule::TankTank => continue,
        };
        destroy(field, shell);
        return Some(collision);
    }
    None
}

/// Resolve a tank against everything sharing its cell
///
/// Unlike shells, a tank keeps scanning after it is destroyed so every live
/// co-occupant meets its rule: three tanks in one cell all die.
pub fn resolve_tank(field: &mut Battlefield, tank: EntityId) -> Vec<Collision> {
    let mut collisions = Vec::new();
    if !is_live(field, tank) {
        return collisions;
    }

    for (other, kind) in live_neighbours(field, tank) {
        // An earlier rule in this scan may already have taken it out
        if !is_live(field, other) {
            continue;
        }
        match rule_for(EntityKind::Tank, kind) {
            Some(Rule::TankMine) => {
                destroy(field, other);
                destroy(field, tank);
                collisions.push(Collision::TankHitMine { tank, mine: other });
            }
            Some(Rule::TankTank) => {
                destroy(field, other);
                destroy(field, tank);
                collisions.push(Collision::TanksCollided { a: tank, b: other });
            }
            _ => {}
        }
    }
    collisions
}
