//! Cairn game engine library.
//!
//! A two-player territorial strategy core: an immutable board of stone
//! piles, a six-phase simultaneous turn resolver with explicit randomness,
//! the setup/play/complete game state machine, and adversarial search
//! agents (paranoid minimax and Monte Carlo expectimax) built on
//! top of the resolver.

pub mod agent;
pub mod board;
pub mod config;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod resolve;
pub mod search;
pub mod selfplay;

pub use agent::{Agent, ExpectimaxAgent, MinimaxAgent, RandomAgent};
pub use config::{ConfigError, GameConfig};
pub use game::{GamePhase, GameState, SetupError, TurnRecord};
