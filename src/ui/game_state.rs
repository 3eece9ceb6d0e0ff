//! Game state for the renju GUI: the session, the AI worker and the
//! save/replay plumbing around it

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::{GameMode, GameSettings};
use crate::replay::Replay;
use crate::search::Candidate;
use crate::session::{GameSession, MoveOutcome};
use crate::storage::SaveStore;
use crate::strategy::{Difficulty, MoveDecision};
use crate::{AiEngine, Board, Pos, Stone};

/// What the worker thread hands back: the engine itself and its decision
pub struct AiReply {
    engine: AiEngine,
    decision: Option<MoveDecision>,
}

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<AiReply>,
        start_time: Instant,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub last_move_duration: Option<Duration>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_move_duration: None,
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) -> Duration {
        let duration = self.elapsed();
        self.last_move_duration = Some(duration);
        self.start_time = None;
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

pub struct GameState {
    pub session: GameSession,
    /// `None` while the engine is out on the worker thread
    engine: Option<AiEngine>,
    pub ai_state: AiState,
    pub last_ai_result: Option<MoveDecision>,
    pub last_candidates: Vec<Candidate>,
    pub move_timer: MoveTimer,
    pub suggested_move: Option<Pos>,
    pub message: Option<String>,
    pub replay: Option<Replay>,
    store: SaveStore,
}

impl GameState {
    pub fn new(settings: GameSettings, store: SaveStore) -> Self {
        Self {
            session: GameSession::new(settings),
            engine: None,
            ai_state: AiState::Idle,
            last_ai_result: None,
            last_candidates: Vec::new(),
            move_timer: MoveTimer::default(),
            suggested_move: None,
            message: None,
            replay: None,
            store,
        }
    }

    /// Start over with the current settings
    pub fn reset(&mut self) {
        let settings = self.session.settings().clone();
        self.new_game(settings);
    }

    pub fn new_game(&mut self, settings: GameSettings) {
        self.session = GameSession::new(settings);
        self.ai_state = AiState::Idle;
        self.last_ai_result = None;
        self.last_candidates.clear();
        self.move_timer = MoveTimer::default();
        self.suggested_move = None;
        self.message = None;
        self.replay = None;
    }

    /// New game in `mode`; in PvE the human takes `human`
    pub fn new_game_with_mode(&mut self, mode: GameMode, human: Stone) {
        let settings = GameSettings {
            mode,
            human_player: human,
            ..self.session.settings().clone()
        };
        self.new_game(settings);
    }

    pub fn mode(&self) -> GameMode {
        self.session.settings().mode
    }

    /// Board currently on screen: the replay cursor or the live game
    pub fn display_board(&self) -> &Board {
        match &self.replay {
            Some(replay) => replay.session().board(),
            None => self.session.board(),
        }
    }

    pub fn is_human_turn(&self) -> bool {
        self.replay.is_none() && !self.session.is_finished() && !self.session.is_ai_turn()
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    pub fn set_difficulty(&mut self, player: Stone, difficulty: Difficulty) {
        self.session.set_difficulty(player, difficulty);
    }

    pub fn set_forbidden_rules(&mut self, enabled: bool) {
        self.session.set_forbidden_rules(enabled);
    }

    /// Attempt to place a stone for the human side
    pub fn try_place_stone(&mut self, pos: Pos) -> Result<(), String> {
        if self.replay.is_some() {
            return Err("Replay in progress".to_string());
        }
        if self.is_ai_thinking() {
            return Err("AI is thinking".to_string());
        }
        if !self.is_human_turn() && !self.session.is_finished() {
            return Err("Not your turn".to_string());
        }

        let outcome = self
            .session
            .play(pos.x as i32, pos.y as i32)
            .map_err(|err| format!("Invalid move: {err}"))?;
        self.after_move(outcome);
        Ok(())
    }

    fn after_move(&mut self, outcome: MoveOutcome) {
        self.suggested_move = None;
        self.move_timer.stop();
        self.message = match outcome {
            MoveOutcome::Continue => {
                self.move_timer.start();
                None
            }
            MoveOutcome::Win { winner, .. } => Some(format!("{} wins!", winner.name())),
            MoveOutcome::Draw => Some("Draw - the board is full".to_string()),
        };
        self.autosave();
    }

    fn autosave(&self) {
        if let Err(err) = self.store.autosave(self.session.snapshot()) {
            warn!(%err, "autosave failed");
        }
    }

    /// Take the engine, rebuilt if it was lost with a discarded worker, and
    /// bring it in line with the session's settings
    fn take_engine(&mut self) -> AiEngine {
        let settings = self.session.settings();
        let mut engine = self
            .engine
            .take()
            .unwrap_or_else(|| AiEngine::new(settings.rule_config()));
        engine.set_rules(settings.rule_config());
        for player in [Stone::Black, Stone::White] {
            engine.set_difficulty(player, settings.difficulty(player));
        }
        engine
    }

    /// Hand the position to a worker thread; at most one request is in flight
    pub fn start_ai_thinking(&mut self) {
        if self.replay.is_some() || !self.session.is_ai_turn() || self.is_ai_thinking() {
            return;
        }

        let mut engine = self.take_engine();
        let mut board = self.session.board().clone();
        let player = self.session.current_player();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let decision = engine.compute_move(&mut board, player);
            let _ = tx.send(AiReply { engine, decision });
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Check if the worker has finished and play its move
    pub fn check_ai_result(&mut self) {
        let reply = match &self.ai_state {
            AiState::Thinking { receiver, start_time } => match receiver.try_recv() {
                Ok(reply) => Some((reply, start_time.elapsed())),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.ai_state = AiState::Idle;
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => None,
        };

        let Some((reply, elapsed)) = reply else {
            return;
        };
        self.ai_state = AiState::Idle;
        self.move_timer.set_ai_time(elapsed);
        self.last_candidates = reply.engine.last_candidates().to_vec();
        self.engine = Some(reply.engine);

        let Some(decision) = reply.decision else {
            self.message = Some("AI could not find a move".to_string());
            return;
        };
        let played = self
            .session
            .play_ai(decision.pos.x as i32, decision.pos.y as i32, decision.score);
        self.last_ai_result = Some(decision);
        match played {
            Ok(outcome) => self.after_move(outcome),
            Err(err) => self.message = Some(format!("AI move rejected: {err}")),
        }
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Suggest a move for the side to move, computed on the UI thread
    pub fn request_suggestion(&mut self) {
        if self.session.is_finished() || self.is_ai_thinking() || self.replay.is_some() {
            return;
        }
        let mut engine = self.take_engine();
        let mut board = self.session.board().clone();
        let player = self.session.current_player();
        engine.set_difficulty(player, Difficulty::Standard);

        let decision = engine.compute_move(&mut board, player);
        self.suggested_move = decision.as_ref().map(|d| d.pos);
        self.last_candidates = engine.last_candidates().to_vec();
        self.last_ai_result = decision;
        self.engine = Some(engine);
    }

    /// Undo the last move; in PvE also the AI reply before it
    pub fn undo(&mut self) {
        if self.is_ai_thinking() || self.replay.is_some() {
            return;
        }
        if self.session.undo().is_none() {
            return;
        }
        if self.mode() == GameMode::PvE && self.session.is_ai_turn() {
            self.session.undo();
        }
        self.suggested_move = None;
        self.message = None;
        self.move_timer.start();
    }

    pub fn save_game(&mut self) {
        let name = format!("Move {}", self.session.history().len());
        self.message = Some(match self.store.save(&name, self.session.snapshot()) {
            Ok(record) => format!("Saved as {}", record.id),
            Err(err) => format!("Save failed: {err}"),
        });
    }

    pub fn load_autosave(&mut self) {
        if self.is_ai_thinking() {
            return;
        }
        let restored = match self.store.load_autosave() {
            Ok(Some(snapshot)) => GameSession::restore(&snapshot).map_err(|err| err.to_string()),
            Ok(None) => Err("No autosave found".to_string()),
            Err(err) => Err(err.to_string()),
        };
        match restored {
            Ok(session) => {
                self.new_game(session.settings().clone());
                self.session = session;
                self.message = Some("Autosave loaded".to_string());
            }
            Err(msg) => self.message = Some(msg),
        }
    }

    /// Replay the current game from the start
    pub fn start_replay(&mut self) {
        if self.is_ai_thinking() || self.session.history().is_empty() {
            return;
        }
        self.replay = Some(Replay::new(
            self.session.history().to_vec(),
            self.session.settings().clone(),
        ));
        self.message = Some("Replay: use the arrow keys".to_string());
    }

    pub fn stop_replay(&mut self) {
        self.replay = None;
        self.message = None;
    }

    pub fn replay_step(&mut self, forward: bool) {
        if let Some(replay) = &mut self.replay {
            if forward {
                replay.step_forward();
            } else {
                replay.step_backward();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pvp_state(dir: &TempDir) -> GameState {
        let settings = GameSettings {
            mode: GameMode::PvP,
            ..GameSettings::default()
        };
        GameState::new(settings, SaveStore::new(dir.path()))
    }

    #[test]
    fn test_moves_autosave() {
        let dir = TempDir::new().unwrap();
        let mut state = pvp_state(&dir);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.try_place_stone(Pos::new(8, 8)).unwrap();

        let snapshot = SaveStore::new(dir.path()).load_autosave().unwrap().unwrap();
        assert_eq!(snapshot.history.len(), 2);
    }

    #[test]
    fn test_occupied_click_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut state = pvp_state(&dir);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        assert!(state.try_place_stone(Pos::new(7, 7)).is_err());
    }

    #[test]
    fn test_pve_undo_takes_back_ai_reply() {
        let dir = TempDir::new().unwrap();
        let mut state = GameState::new(GameSettings::default(), SaveStore::new(dir.path()));
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        assert!(state.try_place_stone(Pos::new(8, 8)).is_err(), "White belongs to the AI");

        state.session.play_ai(8, 8, 0.0).unwrap();
        state.undo();
        assert!(state.session.history().is_empty());
        assert_eq!(state.session.current_player(), Stone::Black);
    }

    #[test]
    fn test_replay_blocks_play() {
        let dir = TempDir::new().unwrap();
        let mut state = pvp_state(&dir);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.start_replay();
        assert!(state.display_board().is_board_empty());
        state.replay_step(true);
        assert_eq!(state.display_board().get(Pos::new(7, 7)), Stone::Black);
        assert!(state.try_place_stone(Pos::new(0, 0)).is_err());
        state.stop_replay();
        assert!(state.try_place_stone(Pos::new(0, 0)).is_ok());
    }
}
