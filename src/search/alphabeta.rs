//! Alpha-Beta search
//!
//! Depth-bounded minimax with alpha-beta pruning over a shared board. Every
//! child is visited with place -> recurse -> restore through a scoped
//! placement guard, so no board copies are made and every exit path restores
//! the position.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use renju::{Board, Pos, Stone};
//! use renju::eval::PatternEvaluator;
//! use renju::rules::RuleEngine;
//! use renju::search::{AlphaBetaSearch, CandidateGenerator};
//!
//! let search = AlphaBetaSearch::new(
//!     Arc::new(RuleEngine::default()),
//!     Arc::new(PatternEvaluator::new()),
//!     Arc::new(CandidateGenerator::default()),
//!     2,
//!     8,
//! );
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let result = search.find_best_move(&mut board, Stone::White);
//! let best = result.best_move.expect("a move exists");
//! assert!(board.is_empty(best.pos));
//! ```

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::board::{Board, Stone};
use crate::eval::PatternEvaluator;
use crate::rules::RuleEngine;

use super::candidates::{Candidate, CandidateGenerator};

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Score relative to the root player; wins and losses are infinite
    pub score: f64,
    /// Best move found, if any
    pub best_move: Option<Candidate>,
    /// Total nodes visited
    pub nodes: u64,
}

/// Minimax with alpha-beta pruning, parameterised by depth and breadth
#[derive(Debug, Clone)]
pub struct AlphaBetaSearch {
    rules: Arc<RuleEngine>,
    evaluator: Arc<PatternEvaluator>,
    generator: Arc<CandidateGenerator>,
    depth: u8,
    breadth: usize,
}

impl AlphaBetaSearch {
    pub fn new(
        rules: Arc<RuleEngine>,
        evaluator: Arc<PatternEvaluator>,
        generator: Arc<CandidateGenerator>,
        depth: u8,
        breadth: usize,
    ) -> Self {
        Self {
            rules,
            evaluator,
            generator,
            depth,
            breadth: breadth.max(1),
        }
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn breadth(&self) -> usize {
        self.breadth
    }

    /// Search for `root`'s best move. The board is restored before returning.
    ///
    /// Whenever the board has an empty cell the result carries a move; it is
    /// legal unless every empty cell is forbidden for `root`.
    pub fn find_best_move(&self, board: &mut Board, root: Stone) -> SearchResult {
        let start = Instant::now();
        let mut nodes = 0u64;
        let (score, best) = self.minimax(
            board,
            root,
            root,
            self.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            &mut nodes,
        );

        let best_move = best.or_else(|| self.fallback_move(board, root));

        debug!(
            depth = self.depth,
            breadth = self.breadth,
            nodes,
            score,
            time_ms = start.elapsed().as_millis() as u64,
            "alpha-beta search finished"
        );

        SearchResult {
            score,
            best_move,
            nodes,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        board: &mut Board,
        to_move: Stone,
        root: Stone,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        nodes: &mut u64,
    ) -> (f64, Option<Candidate>) {
        *nodes += 1;

        if depth == 0 {
            return (self.evaluator.evaluate_board(board, root), None);
        }

        let legal: Vec<Candidate> = self
            .generator
            .generate(board, to_move, to_move.opponent())
            .into_iter()
            .take(self.breadth)
            .filter(|c| self.rules.is_legal(board, c.pos, to_move))
            .collect();

        if legal.is_empty() {
            return (self.evaluator.evaluate_board(board, root), None);
        }

        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for candidate in legal {
            let mut placed = board.place_scoped(candidate.pos, to_move);
            let score = if self.rules.check_win(&placed, candidate.pos, to_move).is_win {
                if maximizing {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                }
            } else {
                self.minimax(
                    &mut placed,
                    to_move.opponent(),
                    root,
                    depth - 1,
                    alpha,
                    beta,
                    !maximizing,
                    nodes,
                )
                .0
            };
            drop(placed);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(candidate);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(candidate);
                }
                beta = beta.min(best_score);
            }
            if beta <= alpha {
                break;
            }
        }

        (best_score, best_move)
    }

    fn fallback_move(&self, board: &Board, root: Stone) -> Option<Candidate> {
        let ranked = self.generator.generate(board, root, root.opponent());
        fallback_move(&self.rules, board, &ranked, root)
    }
}

/// Move to return when nothing improved on the initial bound.
///
/// Prefers the first legal candidate in ranked order, then any legal empty
/// cell, and finally the top-ranked empty candidate even if it is forbidden.
/// `None` only when the board is full.
pub fn fallback_move(
    rules: &RuleEngine,
    board: &Board,
    ranked: &[Candidate],
    player: Stone,
) -> Option<Candidate> {
    if board.is_full() {
        return None;
    }
    ranked
        .iter()
        .find(|c| rules.is_legal(board, c.pos, player))
        .copied()
        .or_else(|| {
            board
                .empty_cells()
                .find(|&pos| rules.is_legal(board, pos, player))
                .map(|pos| Candidate { pos, priority: 0.0 })
        })
        .or_else(|| ranked.iter().find(|c| board.is_empty(c.pos)).copied())
        .or_else(|| {
            board
                .empty_cells()
                .next()
                .map(|pos| Candidate { pos, priority: 0.0 })
        })
}
