//! Tank entity and its cooldown state machine
//!
//! Three independent axes:
//! - shoot cooldown: flag + counter, armed by a successful shot
//! - reverse wait: flag + counter, armed by a reverse request
//! - just-reversed: one-turn privilege to reverse again immediately
//!
//! Counters decay exactly once per turn in [`Tank::decay_counters`]. Every
//! other transition reports failure instead of erroring; the engine turns a
//! failure into an ignored step.

use serde::{Deserialize, Serialize};

use crate::battle::actions::Rotation;
use crate::core::config::GameConfig;
use crate::core::types::{Direction, EntityId, PlayerId, Position};

/// Result of a reverse request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseRequest {
    /// Wait started; the tank reverses automatically when it runs out
    Queued,
    /// Tank just reversed, so it may reverse again right now
    Immediate,
    /// Already waiting; the request is ignored
    Rejected,
}

/// Result of asking a tank to move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMove {
    /// Forward cancels a pending reverse; the tank stays put
    CancelledReverse,
    /// Move to this (unwrapped) cell unless a wall blocks it
    Advance(Position),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub id: EntityId,
    pub player: PlayerId,
    /// Creation order within the owning player
    pub index: usize,
    pub position: Position,
    pub direction: Direction,

    shells_left: u32,
    cooldown_turns: u32,
    reverse_turns: u32,

    in_cooldown: bool,
    cooldown_counter: u32,

    waiting_to_reverse: bool,
    reverse_counter: u32,

    just_reversed: bool,
    destroyed: bool,
}

impl Tank {
    pub fn new(
        id: EntityId,
        player: PlayerId,
        index: usize,
        position: Position,
        direction: Direction,
        config: &GameConfig,
    ) -> Self {
        Self {
            id,
            player,
            index,
            position,
            direction,
            shells_left: config.shells_per_tank,
            cooldown_turns: config.shoot_cooldown,
            reverse_turns: config.reverse_wait,
            in_cooldown: false,
            cooldown_counter: 0,
            waiting_to_reverse: false,
            reverse_counter: 0,
            just_reversed: false,
            destroyed: false,
        }
    }

    pub fn symbol(&self) -> char {
        self.player.symbol()
    }

    pub fn shells_left(&self) -> u32 {
        self.shells_left
    }

    pub fn is_in_cooldown(&self) -> bool {
        self.in_cooldown
    }

    pub fn cooldown_counter(&self) -> u32 {
        self.cooldown_counter
    }

    pub fn is_waiting_to_reverse(&self) -> bool {
        self.waiting_to_reverse
    }

    pub fn reverse_counter(&self) -> u32 {
        self.reverse_counter
    }

    pub fn is_just_reversed(&self) -> bool {
        self.just_reversed
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark destroyed; returns false if it already was
    pub fn destroy(&mut self) -> bool {
        !std::mem::replace(&mut self.destroyed, true)
    }

    /// Start-of-turn decay of both counters
    ///
    /// The shoot flag clears when its counter reaches zero. The reverse flag
    /// stays set at zero: that is the turn the automatic reverse happens.
    pub fn decay_counters(&mut self) {
        if self.in_cooldown && self.cooldown_counter > 0 {
            self.cooldown_counter -= 1;
        }
        if self.in_cooldown && self.cooldown_counter == 0 {
            self.in_cooldown = false;
        }

        if self.waiting_to_reverse && self.reverse_counter > 0 {
            self.reverse_counter -= 1;
        }
    }

    /// The automatic reverse must happen this turn
    pub fn reverse_due(&self) -> bool {
        self.waiting_to_reverse && self.reverse_counter == 0
    }

    pub fn can_fire(&self) -> bool {
        !self.waiting_to_reverse && !self.in_cooldown && self.shells_left > 0
    }

    /// Attempt to fire; on success spends a shell and arms the cooldown
    pub fn fire(&mut self) -> bool {
        self.just_reversed = false;
        if !self.can_fire() {
            return false;
        }
        self.shells_left -= 1;
        self.in_cooldown = true;
        self.cooldown_counter = self.cooldown_turns;
        true
    }

    pub fn rotate(&mut self, rotation: Rotation) -> bool {
        self.just_reversed = false;
        if self.waiting_to_reverse {
            return false;
        }
        self.direction = self.direction.rotated(rotation.eighths());
        true
    }

    /// Do-nothing and intel requests forfeit the reverse privilege
    pub fn forfeit_reverse_privilege(&mut self) {
        self.just_reversed = false;
    }

    pub fn move_forward(&mut self) -> ForwardMove {
        if self.waiting_to_reverse {
            self.waiting_to_reverse = false;
            self.reverse_counter = 0;
            return ForwardMove::CancelledReverse;
        }
        self.just_reversed = false;
        ForwardMove::Advance(self.forward_position())
    }

    pub fn request_reverse(&mut self) -> ReverseRequest {
        if self.just_reversed {
            return ReverseRequest::Immediate;
        }
        if self.waiting_to_reverse {
            return ReverseRequest::Rejected;
        }
        self.waiting_to_reverse = true;
        self.reverse_counter = self.reverse_turns;
        ReverseRequest::Queued
    }

    /// Finish a reverse, whether or not the move itself was blocked
    pub fn complete_reverse(&mut self) {
        self.waiting_to_reverse = false;
        self.reverse_counter = 0;
        self.just_reversed = true;
    }

    pub fn forward_position(&self) -> Position {
        self.position.step(self.direction)
    }

    pub fn backward_position(&self) -> Position {
        self.position.step(self.direction.reversed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Tank {
        Tank::new(
            EntityId(0),
            PlayerId::One,
            0,
            Position::new(3, 3),
            Direction::Right,
            &GameConfig::default(),
        )
    }

    #[test]
    fn test_fire_arms_cooldown() {
        let mut t = tank();
        assert!(t.fire());
        assert_eq!(t.shells_left(), 15);
        assert!(t.is_in_cooldown());
        assert_eq!(t.cooldown_counter(), 4);
        assert!(!t.fire());
        assert_eq!(t.shells_left(), 15);
    }

    #[test]
    fn test_cooldown_clears_after_four_decays() {
        let mut t = tank();
        t.fire();
        for expected in [3, 2, 1] {
            t.decay_counters();
            assert_eq!(t.cooldown_counter(), expected);
            assert!(t.is_in_cooldown());
        }
        t.decay_counters();
        assert_eq!(t.cooldown_counter(), 0);
        assert!(!t.is_in_cooldown());
        assert!(t.fire());
    }

    #[test]
    fn test_empty_magazine_never_fires() {
        let config = GameConfig::default().with_shells_per_tank(0);
        let mut t = Tank::new(
            EntityId(0),
            PlayerId::Two,
            0,
            Position::default(),
            Direction::Left,
            &config,
        );
        assert!(!t.fire());
        t.decay_counters();
        assert!(!t.fire());
        assert_eq!(t.shells_left(), 0);
    }

    #[test]
    fn test_reverse_wait_then_due() {
        let mut t = tank();
        assert_eq!(t.request_reverse(), ReverseRequest::Queued);
        assert_eq!(t.reverse_counter(), 2);
        assert_eq!(t.request_reverse(), ReverseRequest::Rejected);

        t.decay_counters();
        assert!(!t.reverse_due());
        t.decay_counters();
        assert!(t.reverse_due());
        assert!(t.is_waiting_to_reverse());

        t.complete_reverse();
        assert!(!t.is_waiting_to_reverse());
        assert!(t.is_just_reversed());
        assert_eq!(t.request_reverse(), ReverseRequest::Immediate);
    }

    #[test]
    fn test_waiting_blocks_rotate_and_fire() {
        let mut t = tank();
        t.request_reverse();
        assert!(!t.rotate(Rotation::EighthLeft));
        assert_eq!(t.direction, Direction::Right);
        assert!(!t.fire());
        assert_eq!(t.shells_left(), 16);
    }

    #[test]
    fn test_forward_cancels_pending_reverse() {
        let mut t = tank();
        t.request_reverse();
        assert_eq!(t.move_forward(), ForwardMove::CancelledReverse);
        assert!(!t.is_waiting_to_reverse());
        assert_eq!(t.move_forward(), ForwardMove::Advance(Position::new(4, 3)));
    }

    #[test]
    fn test_other_actions_clear_privilege() {
        let mut t = tank();
        t.complete_reverse();
        assert!(t.rotate(Rotation::QuarterRight));
        assert!(!t.is_just_reversed());

        t.complete_reverse();
        t.fire();
        assert!(!t.is_just_reversed());

        t.complete_reverse();
        t.move_forward();
        assert!(!t.is_just_reversed());
    }

    #[test]
    fn test_backward_position() {
        let mut t = tank();
        t.direction = Direction::UpRight;
        assert_eq!(t.backward_position(), Position::new(2, 4));
    }

    #[test]
    fn test_destroy_idempotent() {
        let mut t = tank();
        assert!(t.destroy());
        assert!(!t.destroy());
        assert!(t.is_destroyed());
    }
}
