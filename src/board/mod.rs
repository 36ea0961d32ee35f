//! Board representation and per-turn action types.
//!
//! Contains owners, grid positions, territories, the immutable board
//! snapshot, and the actions players submit each turn.

pub mod action;
pub mod owner;
pub mod position;
pub mod state;
pub mod territory;

pub use action::{PlayerTurnActions, StoneMovement, TerritoryAction, TurnActions};
pub use owner::{Owner, PLAYERS};
pub use position::Position;
pub use state::Board;
pub use territory::Territory;
