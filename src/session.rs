//! Game session: the single owner of the board during a game.
//!
//! The session validates requests, records moves, detects the end of the game
//! and supports undo and snapshot/restore. AI moves go through the same path
//! as human moves via [`GameSession::play_ai`].

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Board, Pos, Stone, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::config::GameSettings;
use crate::error::{MoveError, SnapshotError};
use crate::rules::{ForbiddenVerdict, GameStatus, RuleEngine};
use crate::strategy::Difficulty;

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One recorded move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based move number
    pub step: usize,
    pub player: Stone,
    pub pos: Pos,
    pub timestamp_ms: u64,
    /// Score reported by the AI tier that chose this move
    pub ai_score: Option<f64>,
    /// Forbidden analysis for moves by the restricted side
    pub forbidden_check: Option<ForbiddenVerdict>,
}

/// What a successful move led to
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Continue,
    Win { winner: Stone, line: Vec<Pos> },
    Draw,
}

/// Serialisable session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: usize,
    pub settings: GameSettings,
    pub current_player: Stone,
    pub status: GameStatus,
    pub history: Vec<MoveRecord>,
    pub winner: Option<Stone>,
    pub win_line: Vec<Pos>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    settings: GameSettings,
    rules: RuleEngine,
    board: Board,
    status: GameStatus,
    current: Stone,
    history: Vec<MoveRecord>,
    winner: Option<Stone>,
    win_line: Vec<Pos>,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            rules: RuleEngine::new(settings.rule_config()),
            board: Board::with_size(settings.board_size),
            status: GameStatus::Ready,
            current: settings.first_player,
            history: Vec::new(),
            winner: None,
            win_line: Vec::new(),
            settings,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[inline]
    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn current_player(&self) -> Stone {
        self.current
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    pub fn win_line(&self) -> &[Pos] {
        &self.win_line
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn difficulty(&self, player: Stone) -> Difficulty {
        self.settings.difficulty(player)
    }

    pub fn set_difficulty(&mut self, player: Stone, difficulty: Difficulty) {
        self.settings.set_difficulty(player, difficulty);
    }

    /// Toggle the forbidden-move rule; applies from the next validation
    pub fn set_forbidden_rules(&mut self, enabled: bool) {
        self.settings.forbidden_rules = enabled;
        self.rules = RuleEngine::new(self.settings.rule_config());
    }

    /// Whether the side to move is AI-controlled
    pub fn is_ai_turn(&self) -> bool {
        !self.is_finished() && self.settings.is_ai(self.current)
    }

    pub fn start(&mut self) {
        if self.status == GameStatus::Ready {
            self.status = GameStatus::Playing;
        }
    }

    /// Check a move for the side to move without playing it
    pub fn validate(&self, x: i32, y: i32) -> Result<ForbiddenVerdict, MoveError> {
        self.rules
            .validate_move(&self.board, self.status, x, y, self.current)
    }

    pub fn play(&mut self, x: i32, y: i32) -> Result<MoveOutcome, MoveError> {
        self.play_scored(x, y, None)
    }

    /// Play a move chosen by the AI, keeping its score on the record
    pub fn play_ai(&mut self, x: i32, y: i32, score: f64) -> Result<MoveOutcome, MoveError> {
        self.play_scored(x, y, Some(score))
    }

    fn play_scored(&mut self, x: i32, y: i32, ai_score: Option<f64>) -> Result<MoveOutcome, MoveError> {
        let verdict = self.validate(x, y)?;
        let player = self.current;
        let record = MoveRecord {
            step: self.history.len() + 1,
            player,
            pos: Pos::new(x as u8, y as u8),
            timestamp_ms: now_ms(),
            ai_score,
            forbidden_check: self.rules.restricts(player).then_some(verdict),
        };
        Ok(self.apply(record))
    }

    /// Place a recorded move without forbidden checks (replay and restore)
    pub(crate) fn apply_record(&mut self, record: MoveRecord) -> Result<MoveOutcome, MoveError> {
        let Pos { x, y } = record.pos;
        let (x, y) = (x as i32, y as i32);
        if record.player == Stone::Empty {
            return Err(MoveError::InvalidPlayer);
        }
        if !self.board.contains(x, y) {
            return Err(MoveError::OutOfBounds { x, y });
        }
        if !self.board.is_empty(record.pos) {
            return Err(MoveError::PositionOccupied { x, y });
        }
        Ok(self.apply(record))
    }

    fn apply(&mut self, record: MoveRecord) -> MoveOutcome {
        let (pos, player) = (record.pos, record.player);
        self.start();
        self.board.place_stone(pos, player);
        self.history.push(record);

        let result = self.rules.check_win(&self.board, pos, player);
        if result.is_win {
            info!(winner = player.name(), moves = self.history.len(), "game won");
            self.status = GameStatus::Finished;
            self.winner = Some(player);
            self.win_line = result.win_line.clone();
            return MoveOutcome::Win {
                winner: player,
                line: result.win_line,
            };
        }
        if result.is_draw {
            info!(moves = self.history.len(), "game drawn");
            self.status = GameStatus::Finished;
            return MoveOutcome::Draw;
        }
        self.current = player.opponent();
        MoveOutcome::Continue
    }

    /// Take back the last move. The undone side is to move again.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        self.board.remove_stone(record.pos);
        self.current = record.player;
        self.winner = None;
        self.win_line.clear();
        self.status = if self.history.is_empty() {
            GameStatus::Ready
        } else {
            GameStatus::Playing
        };
        Some(record)
    }

    /// Empty cells in row-major order
    pub fn available_moves(&self) -> Vec<Pos> {
        self.board.empty_cells().collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.board.size(),
            settings: self.settings.clone(),
            current_player: self.current,
            status: self.status,
            history: self.history.clone(),
            winner: self.winner,
            win_line: self.win_line.clone(),
        }
    }

    /// Rebuild a session by replaying a snapshot's history on a fresh board
    pub fn restore(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&snapshot.size) {
            return Err(SnapshotError::BoardSize(snapshot.size));
        }
        if snapshot.current_player == Stone::Empty || snapshot.winner == Some(Stone::Empty) {
            return Err(SnapshotError::InvalidPlayer);
        }
        let settings = GameSettings {
            board_size: snapshot.size,
            ..snapshot.settings.clone()
        };
        settings.validate()?;
        let mut session = GameSession::new(settings);
        for record in &snapshot.history {
            session
                .apply_record(record.clone())
                .map_err(|source| SnapshotError::InvalidMove {
                    step: record.step,
                    source,
                })?;
        }
        session.current = snapshot.current_player;
        session.status = snapshot.status;
        session.winner = snapshot.winner;
        session.win_line = snapshot.win_line.clone();
        Ok(session)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
