pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{BattleError, Result};
pub use types::{Direction, EntityId, PlayerId, Position, Step};
