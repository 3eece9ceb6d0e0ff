//! AI engine facade
//!
//! [`AiEngine`] holds the tier dispatcher and a difficulty per side. The game
//! layer asks it for a move; it picks the side's tier, runs it, and keeps the
//! decision and the ranked root candidates for inspection.
//!
//! # Example
//!
//! ```
//! use renju::{AiEngine, Board, Pos, Stone};
//! use renju::strategy::Difficulty;
//!
//! let mut engine = AiEngine::default();
//! engine.set_difficulty(Stone::White, Difficulty::Casual);
//!
//! let mut board = Board::new();
//! board.place_stone(Pos::new(7, 7), Stone::Black);
//!
//! let decision = engine.compute_move(&mut board, Stone::White).expect("board has room");
//! assert!(board.is_empty(decision.pos));
//! assert!(!engine.last_candidates().is_empty());
//! ```

use tracing::info;

use crate::board::{Board, Stone};
use crate::rules::{RuleConfig, RuleEngine};
use crate::search::Candidate;
use crate::strategy::{Difficulty, MoveDecision, StrategyDispatcher};

/// Per-side AI configuration plus the shared tier cache
#[derive(Debug)]
pub struct AiEngine {
    dispatcher: StrategyDispatcher,
    black: Difficulty,
    white: Difficulty,
    seed: Option<u64>,
    last_result: Option<MoveDecision>,
    last_candidates: Vec<Candidate>,
}

impl AiEngine {
    pub fn new(rules: RuleConfig) -> Self {
        Self {
            dispatcher: StrategyDispatcher::new(RuleEngine::new(rules)),
            black: Difficulty::default(),
            white: Difficulty::default(),
            seed: None,
            last_result: None,
            last_candidates: Vec::new(),
        }
    }

    /// Make the Casual tier's choices reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.dispatcher = StrategyDispatcher::new(self.dispatcher.rules().clone()).with_seed(seed);
        self
    }

    pub fn set_difficulty(&mut self, player: Stone, difficulty: Difficulty) {
        match player {
            Stone::Black => self.black = difficulty,
            Stone::White => self.white = difficulty,
            Stone::Empty => {}
        }
    }

    pub fn difficulty(&self, player: Stone) -> Difficulty {
        match player {
            Stone::White => self.white,
            _ => self.black,
        }
    }

    pub fn rules(&self) -> &RuleEngine {
        self.dispatcher.rules()
    }

    /// Swap the rule configuration. Cached tiers are dropped so the next
    /// search sees the new forbidden settings.
    pub fn set_rules(&mut self, config: RuleConfig) {
        if self.rules().config() == config {
            return;
        }
        let dispatcher = StrategyDispatcher::new(RuleEngine::new(config));
        self.dispatcher = match self.seed {
            Some(seed) => dispatcher.with_seed(seed),
            None => dispatcher,
        };
    }

    /// Run the side's tier on `board`. The board is restored before returning.
    pub fn compute_move(&mut self, board: &mut Board, player: Stone) -> Option<MoveDecision> {
        let difficulty = self.difficulty(player);
        info!(player = player.name(), %difficulty, "AI thinking");

        let strategy = self.dispatcher.get_tier(difficulty);
        let decision = strategy.compute_move(board, player);
        self.last_candidates = strategy.last_candidates().to_vec();
        if let Some(decision) = &decision {
            info!(
                player = player.name(),
                notation = %decision.notation,
                score = decision.score,
                time_ms = decision.thinking_time_ms,
                "AI moved"
            );
        }
        self.last_result = decision.clone();
        decision
    }

    pub fn last_result(&self) -> Option<&MoveDecision> {
        self.last_result.as_ref()
    }

    /// Ranked root candidates of the last computed move
    pub fn last_candidates(&self) -> &[Candidate] {
        &self.last_candidates
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn board_with(black: &[(u8, u8)], white: &[(u8, u8)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in black {
            board.place_stone(Pos::new(x, y), Stone::Black);
        }
        for &(x, y) in white {
            board.place_stone(Pos::new(x, y), Stone::White);
        }
        board
    }

    #[test]
    fn test_engine_default_difficulties() {
        let engine = AiEngine::default();
        assert_eq!(engine.difficulty(Stone::Black), Difficulty::Standard);
        assert_eq!(engine.difficulty(Stone::White), Difficulty::Standard);
        assert!(engine.last_result().is_none());
        assert!(engine.last_candidates().is_empty());
    }

    #[test]
    fn test_engine_per_side_difficulty() {
        let mut engine = AiEngine::default();
        engine.set_difficulty(Stone::Black, Difficulty::Expert);
        engine.set_difficulty(Stone::White, Difficulty::Casual);
        assert_eq!(engine.difficulty(Stone::Black), Difficulty::Expert);
        assert_eq!(engine.difficulty(Stone::White), Difficulty::Casual);
    }

    #[test]
    fn test_engine_opening_move() {
        let mut engine = AiEngine::default();
        let mut board = Board::new();
        let decision = engine.compute_move(&mut board, Stone::Black).unwrap();
        assert_eq!(decision.pos, Pos::new(7, 7));
        assert_eq!(engine.last_result(), Some(&decision));
        assert_eq!(engine.last_candidates().len(), 1);
        assert_eq!(engine.last_candidates()[0].pos, Pos::new(7, 7));
    }

    #[test]
    fn test_engine_blocks_with_strong_tier() {
        let mut engine = AiEngine::default();
        engine.set_difficulty(Stone::White, Difficulty::Strong);
        let mut board = board_with(&[(4, 7), (5, 7), (7, 7), (8, 7)], &[(6, 6), (12, 12)]);
        let decision = engine.compute_move(&mut board, Stone::White).unwrap();
        assert_eq!(decision.pos, Pos::new(6, 7));
        assert_eq!(decision.difficulty, Difficulty::Strong);
    }

    #[test]
    fn test_engine_set_rules_takes_effect() {
        // (7,7) blocks White's five but is a double-three for Black
        let mut board = board_with(
            &[(5, 7), (6, 7), (7, 5), (7, 6), (2, 2)],
            &[(3, 3), (4, 4), (5, 5), (6, 6)],
        );
        let mut engine = AiEngine::default();
        engine.set_difficulty(Stone::Black, Difficulty::Casual);

        let restricted = engine.compute_move(&mut board, Stone::Black).unwrap();
        assert_ne!(restricted.pos, Pos::new(7, 7));

        engine.set_rules(RuleConfig {
            forbidden_enabled: false,
            attacker: Stone::Black,
        });
        assert!(!engine.rules().config().forbidden_enabled);
        let free = engine.compute_move(&mut board, Stone::Black).unwrap();
        assert_eq!(free.pos, Pos::new(7, 7));
    }

    #[test]
    fn test_engine_full_board() {
        let mut board = Board::with_size(5);
        let cells: Vec<Pos> = board.empty_cells().collect();
        for pos in cells {
            let stone = if ((pos.x / 2) + pos.y) % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            };
            board.place_stone(pos, stone);
        }
        let mut engine = AiEngine::default();
        assert!(engine.compute_move(&mut board, Stone::White).is_none());
        assert!(engine.last_result().is_none());
    }
}
