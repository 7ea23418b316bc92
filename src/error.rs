use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a level file could not be turned into a [`Level`](crate::level::Level).
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("level file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("unable to read level file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("token {index} is not an integer: {token:?}")]
    Malformed { index: usize, token: String },

    #[error("invalid level dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("expected {expected} tokens for the level, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("unknown cell code {code} at cell {index}")]
    UnknownCell { index: usize, code: i64 },
}

/// Failures while populating a level with entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("pacman not found in level")]
    PlayerNotFound,

    #[error("level has {available} free tunnel cells but {needed} ghosts still need a spot")]
    InsufficientFreeCells { needed: usize, available: usize },
}

/// `PACMAN_MODE` names neither mode.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown game mode {0:?}, expected classic or first-person")]
pub struct ParseModeError(pub String);

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Load(#[from] LevelLoadError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

pub type GameResult<T> = Result<T, GameError>;
