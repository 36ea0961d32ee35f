//! A single board cell: owner plus stone count.

use serde::Serialize;

use super::owner::Owner;

/// Ownership and garrison of one cell.
///
/// Invariant: `owner == Neutral` exactly when `stones == 0`. The fields are
/// private so the only ways to build a territory are the normalizing
/// constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Territory {
    owner: Owner,
    stones: u32,
}

impl Territory {
    pub const NEUTRAL: Territory = Territory {
        owner: Owner::Neutral,
        stones: 0,
    };

    /// Builds a territory, collapsing to neutral when either the owner is
    /// Neutral or there are no stones.
    pub const fn new(owner: Owner, stones: u32) -> Self {
        if stones == 0 || !owner.is_player() {
            Territory::NEUTRAL
        } else {
            Territory { owner, stones }
        }
    }

    pub const fn owner(self) -> Owner {
        self.owner
    }

    pub const fn stones(self) -> u32 {
        self.stones
    }

    pub const fn is_neutral(self) -> bool {
        !self.owner.is_player()
    }

    pub fn is_owned_by(self, player: Owner) -> bool {
        player.is_player() && self.owner == player
    }

    /// Same owner, `stones` more stones. Saturates instead of wrapping, so
    /// an owned territory never drops to zero by overflow.
    pub const fn reinforced(self, stones: u32) -> Self {
        Territory::new(self.owner, self.stones.saturating_add(stones))
    }

    /// Same owner, `stones` fewer stones; neutral when emptied.
    pub const fn depleted(self, stones: u32) -> Self {
        Territory::new(self.owner, self.stones.saturating_sub(stones))
    }

    /// Clamps the garrison to `max`.
    pub fn capped(self, max: u32) -> Self {
        Territory::new(self.owner, self.stones.min(max))
    }
}

impl Default for Territory {
    fn default() -> Self {
        Territory::NEUTRAL
    }
}
