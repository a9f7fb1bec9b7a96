use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Title,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
    GameWon,
}

/// Signals that can move the session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateEvent {
    Start,
    TogglePause,
    PlayerDied,
    LevelEnded,
    NextLevel,
    FinalLevelCleared,
    Restart,
}

impl GameState {
    /// Target state for `event`, or `None` when the event means nothing here.
    pub fn next(self, event: StateEvent) -> Option<GameState> {
        use GameState::*;
        use StateEvent::*;

        match (self, event) {
            (Title, Start) => Some(Playing),
            (Playing, TogglePause) => Some(Paused),
            (Paused, TogglePause) => Some(Playing),
            (Playing, PlayerDied) => Some(GameOver),
            (Playing, LevelEnded) => Some(LevelComplete),
            (LevelComplete, NextLevel) => Some(Playing),
            (LevelComplete, FinalLevelCleared) => Some(GameWon),
            (GameOver | GameWon, Restart) => Some(Title),
            _ => None,
        }
    }

    /// Whether the simulation advances in this state.
    pub fn is_simulating(self) -> bool {
        self == GameState::Playing
    }

    /// Whether the session has ended and only a restart leaves this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::GameOver | GameState::GameWon)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "TITLE",
            Self::Playing => "PLAYING",
            Self::Paused => "PAUSED",
            Self::GameOver => "GAME_OVER",
            Self::LevelComplete => "LEVEL_COMPLETE",
            Self::GameWon => "GAME_WON",
        };
        f.write_str(name)
    }
}
