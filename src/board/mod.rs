//! Board representation for Renju

pub mod bitboard;
pub mod board;
pub mod notation;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Placement};
pub use notation::{notation_to_position, position_to_notation};

/// Default board size (15x15)
pub const BOARD_SIZE: usize = 15;
/// Smallest board that can still hold a five
pub const MIN_BOARD_SIZE: usize = 5;
/// Largest supported board (bitboard capacity)
pub const MAX_BOARD_SIZE: usize = 19;
pub const MAX_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE; // 361

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    #[default]
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Human readable color name
    pub fn name(self) -> &'static str {
        match self {
            Stone::Black => "Black",
            Stone::White => "White",
            Stone::Empty => "Empty",
        }
    }
}

/// Position on the board, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!((x as usize) < MAX_BOARD_SIZE && (y as usize) < MAX_BOARD_SIZE);
        Self { x, y }
    }

    /// Row-major cell index on a board of the given size
    #[inline]
    pub fn to_index(self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    #[inline]
    pub fn from_index(idx: usize, size: usize) -> Self {
        Self {
            x: (idx % size) as u8,
            y: (idx / size) as u8,
        }
    }

    /// Step `steps` cells along `(dx, dy)`, `None` when leaving the board
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, steps: i32, size: usize) -> Option<Pos> {
        let x = self.x as i32 + dx * steps;
        let y = self.y as i32 + dy * steps;
        if Pos::is_valid(x, y, size) {
            Some(Pos::new(x as u8, y as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid(x: i32, y: i32, size: usize) -> bool {
        x >= 0 && x < size as i32 && y >= 0 && y < size as i32
    }
}

/// Center-distance weight: `max(0, size/2 - manhattan(pos, center))`
///
/// Shared by the candidate generator (move priority) and the evaluator
/// (positional bias). On 15x15 the center scores 7.5 and corners score 0.
#[must_use]
pub fn positional_weight(size: usize, pos: Pos) -> f64 {
    let center = (size as f64 - 1.0) / 2.0;
    let distance = (pos.x as f64 - center).abs() + (pos.y as f64 - center).abs();
    (size as f64 / 2.0 - distance).max(0.0)
}
