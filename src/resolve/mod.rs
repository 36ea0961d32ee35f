//! Turn resolution.
//!
//! Turns a board plus both players' simultaneous actions into the next
//! board. Combat and expansion are the only sources of chance; both take
//! an explicit random source.

pub mod combat;
pub mod expansion;
pub mod retreat;
pub mod turn;
pub mod validate;

pub use combat::{
    resolve_combat, resolve_combat_deterministic, CombatOutcome, CombatResult, CombatRoll,
    CombatSide,
};
pub use expansion::{
    resolve_expansion, resolve_expansion_deterministic, ExpansionOutcome, ExpansionResult,
    ExpansionRoll,
};
pub use retreat::distribute_retreat;
pub use turn::{
    resolve_turn, Attack, ContestedExpansion, Reinforcement, TurnResolution, UncontestedExpansion,
};
pub use validate::{validate_player, validate_turn, ActionError};
