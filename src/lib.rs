//! Tank Duel - deterministic two-player tank battles on a toroidal grid

pub mod battle;
pub mod core;
pub mod scenario;
