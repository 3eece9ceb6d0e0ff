//! Game settings
//!
//! Settings are plain JSON; every field is optional and falls back to its
//! default, so `{}` is a valid settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{Stone, BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::ConfigError;
use crate::rules::RuleConfig;
use crate::strategy::Difficulty;

/// Who controls which side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Two humans at one board
    PvP,
    /// Human against the AI
    #[default]
    PvE,
    /// AI against AI
    EvE,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub board_size: usize,
    pub forbidden_rules: bool,
    pub black_ai: Difficulty,
    pub white_ai: Difficulty,
    pub first_player: Stone,
    pub mode: GameMode,
    /// The human's side in [`GameMode::PvE`]
    pub human_player: Stone,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            forbidden_rules: true,
            black_ai: Difficulty::Standard,
            white_ai: Difficulty::Standard,
            first_player: Stone::Black,
            mode: GameMode::PvE,
            human_player: Stone::Black,
        }
    }
}

impl GameSettings {
    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: GameSettings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::InvalidBoardSize(self.board_size));
        }
        if self.first_player == Stone::Empty {
            return Err(ConfigError::InvalidFirstPlayer);
        }
        Ok(())
    }

    /// The first mover is the side the forbidden-move rule restricts
    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            forbidden_enabled: self.forbidden_rules,
            attacker: self.first_player,
        }
    }

    pub fn difficulty(&self, player: Stone) -> Difficulty {
        match player {
            Stone::White => self.white_ai,
            _ => self.black_ai,
        }
    }

    pub fn set_difficulty(&mut self, player: Stone, difficulty: Difficulty) {
        match player {
            Stone::Black => self.black_ai = difficulty,
            Stone::White => self.white_ai = difficulty,
            Stone::Empty => {}
        }
    }

    /// Whether the AI plays `player` under the current mode
    pub fn is_ai(&self, player: Stone) -> bool {
        match self.mode {
            GameMode::PvP => false,
            GameMode::PvE => player != self.human_player,
            GameMode::EvE => true,
        }
    }
}
