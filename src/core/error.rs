use thiserror::Error;

use crate::battle::constants::MAX_BOARD_SIDE;
use crate::core::types::PlayerId;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("{0} has no tanks")]
    NoTanks(PlayerId),

    #[error("Board sides must be 1 to {max} cells, got {width}x{height}", max = MAX_BOARD_SIDE)]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scenario parse error on line {line}: {message}")]
    ScenarioParse { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
