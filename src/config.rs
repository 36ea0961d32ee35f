//! Game configuration.
//!
//! The rule knobs the engine consumes. Values deserialize from JSON with
//! every field optional; missing fields take the defaults below.

use serde::{Deserialize, Serialize};

/// Largest accepted `max_stones`. Keeps every per-cell and whole-board stone
/// sum well inside `u32`.
pub const STONE_LIMIT: u32 = 100_000;

/// Errors reported by [`GameConfig::validate`] and [`GameConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("board size must be between 2 and 64, got {0}")]
    BoardSize(usize),

    #[error("turns per game must be at least 1")]
    NoTurns,

    #[error("max stones per territory must be at least 1")]
    NoCapacity,

    #[error("max stones per territory must be at most {STONE_LIMIT}, got {0}")]
    TooManyStones(u32),

    #[error("growth per turn must be at most max stones ({max}), got {got}")]
    Growth { got: u32, max: u32 },

    #[error("initial stones must be between 1 and max stones ({max}), got {got}")]
    InitialStones { got: u32, max: u32 },

    #[error("combat hit chance must be in (0, 1], got {0}")]
    HitChance(f64),

    #[error("expansion success rate must be in [0, 1], got {0}")]
    SuccessRate(f64),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rule parameters for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board.
    pub board_size: usize,
    /// Number of turns before the game ends.
    pub turns_per_game: u32,
    /// Stones gained by a territory that chose GROW.
    pub growth_per_turn: u32,
    /// Upper bound on stones in any single territory.
    pub max_stones: u32,
    /// Probability that a single combat roll removes an enemy stone.
    pub combat_hit_chance: f64,
    /// Probability that a single expanding stone succeeds.
    pub expansion_success_rate: f64,
    /// Stones placed by each player during setup.
    pub initial_stones: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 5,
            turns_per_game: 30,
            growth_per_turn: 1,
            max_stones: 20,
            combat_hit_chance: 0.5,
            expansion_success_rate: 0.5,
            initial_stones: 1,
        }
    }
}

impl GameConfig {
    /// Checks every field against its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=64).contains(&self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if self.turns_per_game == 0 {
            return Err(ConfigError::NoTurns);
        }
        if self.max_stones == 0 {
            return Err(ConfigError::NoCapacity);
        }
        if self.max_stones > STONE_LIMIT {
            return Err(ConfigError::TooManyStones(self.max_stones));
        }
        if self.growth_per_turn > self.max_stones {
            return Err(ConfigError::Growth {
                got: self.growth_per_turn,
                max: self.max_stones,
            });
        }
        if self.initial_stones == 0 || self.initial_stones > self.max_stones {
            return Err(ConfigError::InitialStones {
                got: self.initial_stones,
                max: self.max_stones,
            });
        }
        if !(self.combat_hit_chance > 0.0 && self.combat_hit_chance <= 1.0) {
            return Err(ConfigError::HitChance(self.combat_hit_chance));
        }
        if !(0.0..=1.0).contains(&self.expansion_success_rate) {
            return Err(ConfigError::SuccessRate(self.expansion_success_rate));
        }
        Ok(())
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
