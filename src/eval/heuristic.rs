//! Heuristic evaluation function for Renju board positions
//!
//! This module provides the static evaluation used by the alpha-beta search
//! and the one-ply tiers. A position is scored from one player's side by:
//! - Pattern counts over every row, column and diagonal, weighted by class
//! - Combination bonuses for simultaneous threats
//! - A positional bias toward the center
//!
//! [`PatternEvaluator::evaluate_board`] subtracts a discounted copy of the
//! opponent's score, which biases the engine toward attack.

use crate::board::{positional_weight, Board, Pos, Stone};

use super::patterns::{ComboBonus, PatternKind, PatternTable, KIND_COUNT};

/// Weight of the opponent's score in [`PatternEvaluator::evaluate_board`]
pub const OPPONENT_DISCOUNT: f64 = 0.9;

const OWN: u8 = b'1';
const EMPTY: u8 = b'0';
const OPPONENT: u8 = b'2';
const EDGE: u8 = b'3';

/// Shortest line that can hold a five
const MIN_LINE: usize = 5;

/// Per-class pattern totals for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternCounts {
    counts: [usize; KIND_COUNT],
}

impl PatternCounts {
    #[inline]
    pub fn get(&self, kind: PatternKind) -> usize {
        self.counts[kind.index()]
    }

    #[inline]
    fn add(&mut self, kind: PatternKind, n: usize) {
        self.counts[kind.index()] += n;
    }
}

/// Scores positions with a weighted pattern table.
///
/// The table is plain configuration data owned by each evaluator, so
/// evaluators can be shared freely across threads.
///
/// ```
/// use renju::{Board, Pos, Stone};
/// use renju::eval::PatternEvaluator;
///
/// let evaluator = PatternEvaluator::new();
/// let mut board = Board::new();
/// board.place_stone(Pos::new(7, 7), Stone::Black);
///
/// assert!(evaluator.evaluate_board(&board, Stone::Black) > 0.0);
/// assert!(evaluator.evaluate_board(&board, Stone::White) < 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatternEvaluator {
    table: PatternTable,
}

impl PatternEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: PatternTable) -> Self {
        Self { table }
    }

    #[inline]
    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Absolute score of `player`'s position (patterns, bonuses, center bias)
    #[must_use]
    pub fn evaluate(&self, board: &Board, player: Stone) -> f64 {
        let counts = self.pattern_counts(board, player);

        let pattern_score: f64 = self
            .table
            .classes()
            .iter()
            .map(|class| class.weight * counts.get(class.kind) as f64)
            .sum();

        pattern_score + combo_bonus(&counts) + positional_score(board, player)
    }

    /// Relative score: own evaluation minus the discounted opponent evaluation
    #[must_use]
    pub fn evaluate_board(&self, board: &Board, player: Stone) -> f64 {
        self.evaluate(board, player) - OPPONENT_DISCOUNT * self.evaluate(board, player.opponent())
    }

    /// One-ply score of playing `pos`: place, evaluate, restore
    #[must_use]
    pub fn evaluate_move(&self, board: &mut Board, pos: Pos, player: Stone) -> f64 {
        let placed = board.place_scoped(pos, player);
        self.evaluate_board(&placed, player)
    }

    /// Count every pattern class for `player` across all board lines
    pub fn pattern_counts(&self, board: &Board, player: Stone) -> PatternCounts {
        let mut counts = PatternCounts::default();
        for line in encode_lines(board, player) {
            for class in self.table.classes() {
                counts.add(class.kind, class.count_in(&line));
            }
        }
        counts
    }
}

/// Bonuses for threat combinations, each applied at most once
fn combo_bonus(counts: &PatternCounts) -> f64 {
    let open_four = counts.get(PatternKind::OpenFour);
    let closed_four = counts.get(PatternKind::ClosedFour);
    let open_three = counts.get(PatternKind::OpenThree);
    let broken_three = counts.get(PatternKind::BrokenThree);

    let mut bonus = 0.0;
    if open_four >= 2 {
        bonus += ComboBonus::DOUBLE_OPEN_FOUR;
    }
    if closed_four >= 2 {
        bonus += ComboBonus::DOUBLE_CLOSED_FOUR;
    }
    if open_four >= 1 && open_three >= 1 {
        bonus += ComboBonus::FOUR_THREE;
    }
    if open_three >= 2 {
        bonus += ComboBonus::DOUBLE_OPEN_THREE;
    }
    if open_three >= 1 && broken_three >= 1 {
        bonus += ComboBonus::THREE_BROKEN_THREE;
    }
    bonus
}

/// Sum of center weights over the player's stones
fn positional_score(board: &Board, player: Stone) -> f64 {
    let size = board.size();
    board
        .positions(player)
        .map(|pos| positional_weight(size, pos))
        .sum()
}

/// Encode every row, column and diagonal (length >= 5) as an edge-wrapped byte line
fn encode_lines(board: &Board, player: Stone) -> Vec<Vec<u8>> {
    let size = board.size() as i32;
    let encode = |x: i32, y: i32| match board.get_xy(x, y) {
        Some(stone) if stone == player => OWN,
        Some(Stone::Empty) => EMPTY,
        Some(_) => OPPONENT,
        None => EDGE,
    };
    let walk = |x0: i32, y0: i32, dx: i32, dy: i32| {
        let mut line = vec![EDGE];
        let (mut x, mut y) = (x0, y0);
        while board.contains(x, y) {
            line.push(encode(x, y));
            x += dx;
            y += dy;
        }
        line.push(EDGE);
        line
    };

    let mut lines = Vec::with_capacity(6 * size as usize);
    for i in 0..size {
        lines.push(walk(0, i, 1, 0));
        lines.push(walk(i, 0, 0, 1));
    }

    // Diagonals: every start on the top row or left column going down-right,
    // and on the bottom row or left column going up-right
    let mut diagonals = Vec::new();
    for x in 0..size {
        diagonals.push(walk(x, 0, 1, 1));
        diagonals.push(walk(x, size - 1, 1, -1));
    }
    for y in 1..size {
        diagonals.push(walk(0, y, 1, 1));
    }
    for y in 0..size - 1 {
        diagonals.push(walk(0, y, 1, -1));
    }
    lines.extend(diagonals.into_iter().filter(|line| line.len() - 2 >= MIN_LINE));
    lines
}
