//! Game state machine and turn history.

pub mod record;
pub mod state;

pub use record::TurnRecord;
pub use state::{is_game_over, territory_leader, GamePhase, GameState, SetupError};
