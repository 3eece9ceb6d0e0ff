//! Renju engine with forbidden-move rules and tiered AI opponents
//!
//! A five-in-a-row engine for boards from 5x5 up to 19x19 (15x15 by default):
//! - Five or more in a row wins
//! - The attacking side may optionally be barred from long lines,
//!   double-threes and double-fours
//! - Four AI tiers, from a randomised one-ply player to a reply-aware
//!   alpha-beta search
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards and move notation
//! - [`rules`]: Move validation, win detection and forbidden moves
//! - [`eval`]: Pattern-based position evaluation
//! - [`search`]: Candidate generation and alpha-beta search
//! - [`strategy`]: Difficulty tiers and the memoising dispatcher
//! - [`engine`]: Per-side AI facade used by the game layer
//! - [`session`], [`replay`], [`storage`], [`config`]: Game lifecycle,
//!   history playback, save files and settings
//!
//! # Quick Start
//!
//! ```
//! use renju::{AiEngine, Difficulty, GameSession, GameSettings, Stone};
//!
//! let mut session = GameSession::new(GameSettings::default());
//! session.play(7, 7).unwrap();
//!
//! let mut engine = AiEngine::new(session.settings().rule_config());
//! engine.set_difficulty(Stone::White, Difficulty::Casual);
//!
//! let mut board = session.board().clone();
//! let decision = engine.compute_move(&mut board, Stone::White).unwrap();
//! session
//!     .play_ai(decision.pos.x as i32, decision.pos.y as i32, decision.score)
//!     .unwrap();
//! assert_eq!(session.history().len(), 2);
//! println!("AI plays {}", decision.notation);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod replay;
pub mod rules;
pub mod search;
pub mod session;
pub mod storage;
pub mod strategy;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{notation_to_position, position_to_notation, Board, Pos, Stone, BOARD_SIZE};
pub use config::{GameMode, GameSettings};
pub use engine::AiEngine;
pub use error::{MoveError, StorageError};
pub use rules::{GameStatus, RuleConfig, RuleEngine};
pub use session::{GameSession, MoveOutcome, MoveRecord, Snapshot};
pub use strategy::{Difficulty, MoveDecision};
