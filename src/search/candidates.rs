//! Candidate move generation
//!
//! Only empty cells near existing stones are worth searching. Each candidate
//! gets a priority from its neighbor count and its distance to the center,
//! and the list is sorted best first.

use serde::{Deserialize, Serialize};

use crate::board::{positional_weight, Board, Pos, Stone};

/// Default neighborhood radius (Chebyshev distance)
pub const DEFAULT_RADIUS: i32 = 2;

/// Priority of the opening move on an empty board
pub const OPENING_PRIORITY: f64 = 999.0;

/// Priority of the fallback move when nothing else qualifies
pub const FALLBACK_PRIORITY: f64 = 1.0;

/// Points per occupied neighbor
const NEIGHBOR_WEIGHT: f64 = 10.0;

/// An empty cell proposed for search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub pos: Pos,
    pub priority: f64,
}

/// Proposes and ranks plausible moves
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    radius: i32,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS)
    }
}

impl CandidateGenerator {
    pub fn new(radius: i32) -> Self {
        Self {
            radius: radius.max(1),
        }
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Ranked candidates, best first. Never empty.
    ///
    /// `player` and `opponent` identify the sides; the ranking itself is
    /// color-blind.
    ///
    /// ```
    /// use renju::{Board, Pos};
    /// use renju::search::CandidateGenerator;
    /// use renju::Stone;
    ///
    /// let generator = CandidateGenerator::default();
    /// let board = Board::new();
    /// let candidates = generator.generate(&board, Stone::Black, Stone::White);
    /// assert_eq!(candidates.len(), 1);
    /// assert_eq!(candidates[0].pos, Pos::new(7, 7));
    /// ```
    pub fn generate(&self, board: &Board, _player: Stone, _opponent: Stone) -> Vec<Candidate> {
        if board.is_board_empty() {
            return vec![Candidate {
                pos: board.center(),
                priority: OPENING_PRIORITY,
            }];
        }

        let size = board.size();
        let mut candidates: Vec<Candidate> = board
            .empty_cells()
            .filter_map(|pos| {
                let neighbors = self.count_neighbors(board, pos);
                (neighbors > 0).then(|| Candidate {
                    pos,
                    priority: neighbors as f64 * NEIGHBOR_WEIGHT + positional_weight(size, pos),
                })
            })
            .collect();

        if candidates.is_empty() {
            return vec![Candidate {
                pos: board.center(),
                priority: FALLBACK_PRIORITY,
            }];
        }

        // Stable sort: equal priorities keep row-major order
        candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        candidates
    }

    /// Occupied cells in the square neighborhood, excluding `pos` itself
    fn count_neighbors(&self, board: &Board, pos: Pos) -> usize {
        let r = self.radius;
        let (x, y) = (pos.x as i32, pos.y as i32);
        (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| (dx, dy) != (0, 0))
            .filter(|&(dx, dy)| {
                board
                    .get_xy(x + dx, y + dy)
                    .is_some_and(|stone| stone != Stone::Empty)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_center() {
        let generator = CandidateGenerator::default();
        let board = Board::new();
        let candidates = generator.generate(&board, Stone::Black, Stone::White);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].pos, Pos::new(7, 7));
        assert_eq!(candidates[0].priority, OPENING_PRIORITY);
    }

    #[test]
    fn test_even_board_center() {
        let generator = CandidateGenerator::default();
        let board = Board::with_size(10);
        let candidates = generator.generate(&board, Stone::White, Stone::Black);
        assert_eq!(candidates[0].pos, Pos::new(5, 5));
    }

    #[test]
    fn test_radius_neighborhood() {
        let generator = CandidateGenerator::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let candidates = generator.generate(&board, Stone::White, Stone::Black);

        // 5x5 square minus the stone itself
        assert_eq!(candidates.len(), 24);
        for c in &candidates {
            let dx = (c.pos.x as i32 - 7).abs();
            let dy = (c.pos.y as i32 - 7).abs();
            assert!(dx <= 2 && dy <= 2, "{:?} is outside radius 2", c.pos);
            assert!(board.is_empty(c.pos));
        }
    }

    #[test]
    fn test_priority_formula() {
        let generator = CandidateGenerator::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        board.place_stone(Pos::new(8, 7), Stone::White);
        let candidates = generator.generate(&board, Stone::Black, Stone::White);

        let at = |x, y| {
            candidates
                .iter()
                .find(|c| c.pos == Pos::new(x, y))
                .map(|c| c.priority)
        };
        // (7,8): both stones adjacent, manhattan distance 1 from center
        assert_eq!(at(7, 8), Some(2.0 * 10.0 + 6.5));
        // (10,7): only (8,7) within radius 2
        assert_eq!(at(10, 7), Some(10.0 + 4.5));
        assert_eq!(at(0, 0), None, "Cells without neighbors are pruned");
    }

    #[test]
    fn test_sorted_descending_ties_row_major() {
        let generator = CandidateGenerator::default();
        let mut board = Board::new();
        board.place_stone(Pos::new(7, 7), Stone::Black);
        let candidates = generator.generate(&board, Stone::White, Stone::Black);

        for pair in candidates.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                let a = pair[0].pos.to_index(15);
                let b = pair[1].pos.to_index(15);
                assert!(a < b, "Ties must keep row-major order: {:?}", pair);
            }
        }
        // (7,6) and (6,7) tie; (7,6) comes first in row-major order
        assert_eq!(candidates[0].pos, Pos::new(7, 6));
        assert_eq!(candidates[1].pos, Pos::new(6, 7));
    }

    #[test]
    fn test_full_board_falls_back_to_center() {
        let generator = CandidateGenerator::default();
        let mut board = Board::with_size(5);
        let cells: Vec<Pos> = board.empty_cells().collect();
        for pos in cells {
            board.place_stone(pos, Stone::Black);
        }
        let candidates = generator.generate(&board, Stone::White, Stone::Black);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].pos, Pos::new(2, 2));
        assert_eq!(candidates[0].priority, FALLBACK_PRIORITY);
    }
}
