//! Step-through playback of a recorded game

use tracing::warn;

use crate::config::GameSettings;
use crate::session::{GameSession, MoveOutcome, MoveRecord};

/// Cursor over a move history, backed by its own session
#[derive(Debug, Clone)]
pub struct Replay {
    history: Vec<MoveRecord>,
    session: GameSession,
    cursor: usize,
}

impl Replay {
    pub fn new(history: Vec<MoveRecord>, settings: GameSettings) -> Self {
        Self {
            history,
            session: GameSession::new(settings),
            cursor: 0,
        }
    }

    /// Apply the next move. Returns whether more moves remain.
    ///
    /// A move that cannot be placed (corrupt history) stops playback there.
    pub fn step_forward(&mut self) -> bool {
        let Some(record) = self.history.get(self.cursor).cloned() else {
            return false;
        };
        match self.session.apply_record(record) {
            Ok(_) => {
                self.cursor += 1;
                self.cursor < self.history.len()
            }
            Err(err) => {
                warn!(step = self.cursor + 1, %err, "replay stopped at invalid move");
                self.history.truncate(self.cursor);
                false
            }
        }
    }

    /// Undo one move. Returns whether earlier moves remain.
    pub fn step_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.session.undo();
        self.cursor -= 1;
        self.cursor > 0
    }

    /// Number of moves currently applied
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.history.len()
    }

    /// Outcome of the game at the current cursor
    pub fn outcome(&self) -> MoveOutcome {
        match self.session.winner() {
            Some(winner) => MoveOutcome::Win {
                winner,
                line: self.session.win_line().to_vec(),
            },
            None if self.session.is_finished() => MoveOutcome::Draw,
            None => MoveOutcome::Continue,
        }
    }

    /// Session state at the cursor, for rendering
    pub fn session(&self) -> &GameSession {
        &self.session
    }
}
