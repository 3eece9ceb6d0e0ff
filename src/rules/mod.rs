//! Game rules for Renju
//!
//! This module implements the rule set:
//! - Win and draw detection (five or more in a row wins)
//! - Forbidden moves for the attacking side (long line, double-three, double-four)
//! - Move validation combining bounds, occupancy, game status and forbidden checks

pub mod forbidden;
pub mod win;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{Board, Pos, Stone};
use crate::error::MoveError;

// Re-exports for convenient access
pub use forbidden::{
    detect_forbidden, FourDetail, ForbiddenKind, ForbiddenVerdict, LineSignature, ThreeDetail,
};
pub use win::{check_win, collect_run, run_length, WinResult};

/// The four line directions, in the order they are examined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// Step vector `(dx, dy)`
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Horizontal => (1, 0),
            Direction::Vertical => (0, 1),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagonalDown => "diagonal-down",
            Direction::DiagonalUp => "diagonal-up",
        }
    }
}

/// Lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Ready,
    Playing,
    Finished,
}

/// Which side the forbidden-move rule restricts, and whether it is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub forbidden_enabled: bool,
    pub attacker: Stone,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            forbidden_enabled: true,
            attacker: Stone::Black,
        }
    }
}

/// Move adjudication: legality, forbidden patterns, wins and draws
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> RuleConfig {
        self.config
    }

    /// Whether forbidden-move checks restrict `player`
    #[inline]
    pub fn restricts(&self, player: Stone) -> bool {
        self.config.forbidden_enabled && player == self.config.attacker
    }

    /// Validate a move request.
    ///
    /// Checks run in order: finished game, bounds, occupancy, then (for the
    /// restricted side only) forbidden patterns. On success the forbidden
    /// analysis is returned as information; it is empty for the defender.
    ///
    /// ```
    /// use renju::{Board, Pos, Stone};
    /// use renju::rules::{GameStatus, RuleEngine};
    ///
    /// let rules = RuleEngine::default();
    /// let mut board = Board::new();
    /// board.place_stone(Pos::new(7, 7), Stone::White);
    ///
    /// assert!(rules.validate_move(&board, GameStatus::Playing, 7, 7, Stone::Black).is_err());
    /// assert!(rules.validate_move(&board, GameStatus::Playing, 8, 7, Stone::Black).is_ok());
    /// ```
    pub fn validate_move(
        &self,
        board: &Board,
        status: GameStatus,
        x: i32,
        y: i32,
        player: Stone,
    ) -> Result<ForbiddenVerdict, MoveError> {
        if status == GameStatus::Finished {
            return Err(MoveError::GameFinished);
        }
        if !board.contains(x, y) {
            return Err(MoveError::OutOfBounds { x, y });
        }
        let pos = Pos::new(x as u8, y as u8);
        if !board.is_empty(pos) {
            return Err(MoveError::PositionOccupied { x, y });
        }

        if !self.restricts(player) {
            return Ok(ForbiddenVerdict::default());
        }
        let verdict = detect_forbidden(board, pos, player);
        if verdict.is_forbidden() {
            warn!(x, y, kind = %verdict.kind, "forbidden move rejected");
            return Err(MoveError::ForbiddenMove(verdict));
        }
        Ok(verdict)
    }

    /// Status-free legality for an on-board point, used inside searches
    #[inline]
    pub fn is_legal(&self, board: &Board, pos: Pos, player: Stone) -> bool {
        board.is_empty(pos)
            && !(self.restricts(player) && detect_forbidden(board, pos, player).is_forbidden())
    }

    /// Win/draw check for a stone of `player` at `pos` (placed or hypothetical)
    #[inline]
    pub fn check_win(&self, board: &Board, pos: Pos, player: Stone) -> WinResult {
        check_win(board, pos, player)
    }

    /// Forbidden analysis for `player` at `pos`.
    ///
    /// Only the configured attacker is ever restricted; any other player gets
    /// an empty, non-forbidden verdict.
    pub fn detect_forbidden(&self, board: &Board, pos: Pos, player: Stone) -> ForbiddenVerdict {
        if player != self.config.attacker {
            return ForbiddenVerdict::default();
        }
        detect_forbidden(board, pos, player)
    }
}
