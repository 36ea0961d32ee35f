//! Territory ownership.
//!
//! Every territory belongs to one of the two players or to nobody.

use serde::{Deserialize, Serialize};

/// Who holds a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    Neutral,
    Player1,
    Player2,
}

/// The two players, in seating order.
pub const PLAYERS: [Owner; 2] = [Owner::Player1, Owner::Player2];

impl Owner {
    /// Returns the other player. Neutral maps to itself.
    pub const fn opponent(self) -> Owner {
        match self {
            Owner::Neutral => Owner::Neutral,
            Owner::Player1 => Owner::Player2,
            Owner::Player2 => Owner::Player1,
        }
    }

    /// Returns true for either player.
    pub const fn is_player(self) -> bool {
        !matches!(self, Owner::Neutral)
    }

    /// Single-character tag used by the board's text rendering.
    pub const fn glyph(self) -> char {
        match self {
            Owner::Neutral => '.',
            Owner::Player1 => 'a',
            Owner::Player2 => 'b',
        }
    }

    /// Seat index (0 or 1) for a player, None for Neutral.
    pub const fn seat(self) -> Option<usize> {
        match self {
            Owner::Neutral => None,
            Owner::Player1 => Some(0),
            Owner::Player2 => Some(1),
        }
    }
}
