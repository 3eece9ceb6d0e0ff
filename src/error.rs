//! Error types
//!
//! Rule violations are ordinary values: the session hands a [`MoveError`] back
//! to the caller, which can show it to the player and keep the game going.

use thiserror::Error;

use crate::rules::ForbiddenVerdict;

/// Why a move request was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MoveError {
    #[error("position ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("position ({x}, {y}) is already occupied")]
    PositionOccupied { x: i32, y: i32 },
    #[error("the game has already finished")]
    GameFinished,
    #[error("forbidden move: {}", .0.kind)]
    ForbiddenMove(ForbiddenVerdict),
    #[error("a move must be made by black or white")]
    InvalidPlayer,
}

impl MoveError {
    /// Short machine-friendly code, used in logs and the UI
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::OutOfBounds { .. } => "out_of_bounds",
            MoveError::PositionOccupied { .. } => "position_occupied",
            MoveError::GameFinished => "game_finished",
            MoveError::ForbiddenMove(_) => "forbidden_move",
            MoveError::InvalidPlayer => "invalid_player",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board size {0} is outside the supported range 5..=19")]
    InvalidBoardSize(usize),
    #[error("first player must be black or white")]
    InvalidFirstPlayer,
}

/// Problems rebuilding a session from a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot board size {0} is not supported")]
    BoardSize(usize),
    #[error("snapshot settings are invalid: {0}")]
    Settings(#[from] ConfigError),
    #[error("snapshot side to move must be black or white")]
    InvalidPlayer,
    #[error("snapshot move {step} is invalid: {source}")]
    InvalidMove {
        step: usize,
        #[source]
        source: MoveError,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt save data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no save with id {0}")]
    NotFound(String),
}

/// A difficulty label that matches no tier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}")]
pub struct UnknownDifficulty(pub String);
