//! Per-turn history entries.

use serde::Serialize;

use crate::board::{Board, TurnActions};
use crate::resolve::TurnResolution;

/// One resolved turn: what was submitted, the board it was applied to, and
/// every roll that decided it. Read-only once pushed onto the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub before: Board,
    pub actions: TurnActions,
    pub resolution: TurnResolution,
}

impl TurnRecord {
    /// Board after the turn resolved.
    pub fn after(&self) -> &Board {
        &self.resolution.board
    }

    /// Number of combats fought this turn, contested expansions included.
    pub fn combat_count(&self) -> usize {
        self.resolution.attacks.len()
            + self
                .resolution
                .contested
                .iter()
                .filter(|c| c.combat.is_some())
                .count()
    }
}
