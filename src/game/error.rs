use std::fmt;

use serde::{Deserialize, Serialize};

use super::tile::TileId;

/// 基础符号集合不合法，启动阶段即失败。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConfigurationError {
    EmptySymbolSet,
    DuplicateIdentity { identity: String },
    UnpairedIdentity { identity: String, count: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameError {
    Configuration { error: ConfigurationError },
    InvalidConfigJson { message: String },
    BoardAlreadyBuilt,
    TileNotMounted { tile_id: TileId },
    Surface { message: String },
    SessionBusy,
}

impl From<ConfigurationError> for GameError {
    fn from(error: ConfigurationError) -> Self {
        GameError::Configuration { error }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptySymbolSet => write!(f, "symbol set is empty"),
            ConfigurationError::DuplicateIdentity { identity } => {
                write!(f, "duplicate symbol identity `{identity}`")
            }
            ConfigurationError::UnpairedIdentity { identity, count } => {
                write!(f, "symbol `{identity}` appears {count} times, expected 2")
            }
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Configuration { error } => write!(f, "invalid configuration: {error}"),
            GameError::InvalidConfigJson { message } => write!(f, "invalid config json: {message}"),
            GameError::BoardAlreadyBuilt => write!(f, "board is already built"),
            GameError::TileNotMounted { tile_id } => write!(f, "tile {tile_id} is not mounted"),
            GameError::Surface { message } => write!(f, "surface error: {message}"),
            GameError::SessionBusy => write!(f, "game session is busy"),
        }
    }
}

impl std::error::Error for ConfigurationError {}
impl std::error::Error for GameError {}
