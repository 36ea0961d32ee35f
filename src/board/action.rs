//! Per-turn intents.
//!
//! Each owned territory gets exactly one action per turn: grow in place, or
//! send stones to adjacent cells. A move may split a pile across several
//! destinations. Both players' actions for a turn are bundled in
//! [`TurnActions`], the unit the resolver applies simultaneously.

use serde::{Deserialize, Serialize};

use super::owner::Owner;
use super::position::Position;

/// `count` stones leaving `source` for the adjacent `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoneMovement {
    pub source: Position,
    pub destination: Position,
    pub count: u32,
}

impl StoneMovement {
    pub const fn new(source: Position, destination: Position, count: u32) -> Self {
        StoneMovement {
            source,
            destination,
            count,
        }
    }
}

/// One territory's decision for the turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerritoryAction {
    /// Stay put and gain stones at the end of the turn.
    Grow { position: Position },
    /// Send stones out. Every movement's source must equal `source`.
    Move {
        source: Position,
        movements: Vec<StoneMovement>,
    },
}

impl TerritoryAction {
    pub const fn grow(position: Position) -> Self {
        TerritoryAction::Grow { position }
    }

    /// A move to a single destination.
    pub fn move_to(source: Position, destination: Position, count: u32) -> Self {
        TerritoryAction::Move {
            source,
            movements: vec![StoneMovement::new(source, destination, count)],
        }
    }

    /// A move split across several destinations.
    pub fn split(source: Position, parts: &[(Position, u32)]) -> Self {
        TerritoryAction::Move {
            source,
            movements: parts
                .iter()
                .map(|&(dest, count)| StoneMovement::new(source, dest, count))
                .collect(),
        }
    }

    /// The territory this action belongs to.
    pub const fn position(&self) -> Position {
        match self {
            TerritoryAction::Grow { position } => *position,
            TerritoryAction::Move { source, .. } => *source,
        }
    }

    pub fn movements(&self) -> &[StoneMovement] {
        match self {
            TerritoryAction::Grow { .. } => &[],
            TerritoryAction::Move { movements, .. } => movements,
        }
    }

    pub const fn is_grow(&self) -> bool {
        matches!(self, TerritoryAction::Grow { .. })
    }

    /// Total stones leaving the territory.
    pub fn total_moved(&self) -> u32 {
        self.movements().iter().map(|m| m.count).sum()
    }
}

/// All of one player's actions for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerTurnActions {
    pub player: Owner,
    pub actions: Vec<TerritoryAction>,
}

impl PlayerTurnActions {
    pub fn new(player: Owner, actions: Vec<TerritoryAction>) -> Self {
        PlayerTurnActions { player, actions }
    }

    /// Every stone movement this player issues.
    pub fn movements(&self) -> impl Iterator<Item = &StoneMovement> {
        self.actions.iter().flat_map(|a| a.movements())
    }

    /// Positions whose action is GROW.
    pub fn growing(&self) -> impl Iterator<Item = Position> + '_ {
        self.actions
            .iter()
            .filter(|a| a.is_grow())
            .map(TerritoryAction::position)
    }
}

/// Both players' actions for the same turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnActions {
    pub turn: u32,
    pub player1: PlayerTurnActions,
    pub player2: PlayerTurnActions,
}

impl TurnActions {
    pub fn new(turn: u32, player1: PlayerTurnActions, player2: PlayerTurnActions) -> Self {
        TurnActions {
            turn,
            player1,
            player2,
        }
    }

    /// Assembles a turn from two players' actions in either order.
    pub fn from_pair(turn: u32, a: PlayerTurnActions, b: PlayerTurnActions) -> Self {
        if a.player == Owner::Player2 {
            TurnActions::new(turn, b, a)
        } else {
            TurnActions::new(turn, a, b)
        }
    }

    /// Actions for the given seat.
    pub fn for_player(&self, player: Owner) -> Option<&PlayerTurnActions> {
        match player {
            Owner::Player1 => Some(&self.player1),
            Owner::Player2 => Some(&self.player2),
            Owner::Neutral => None,
        }
    }

    /// Both players' actions in seat order.
    pub fn both(&self) -> [&PlayerTurnActions; 2] {
        [&self.player1, &self.player2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_has_no_movements() {
        let a = TerritoryAction::grow(Position::new(1, 1));
        assert!(a.is_grow());
        assert!(a.movements().is_empty());
        assert_eq!(a.total_moved(), 0);
    }

    #[test]
    fn split_sums_counts() {
        let src = Position::new(1, 1);
        let a = TerritoryAction::split(src, &[(Position::new(0, 1), 2), (Position::new(1, 2), 3)]);
        assert_eq!(a.position(), src);
        assert_eq!(a.total_moved(), 5);
        assert!(a.movements().iter().all(|m| m.source == src));
    }

    #[test]
    fn player_actions_report_growers() {
        let actions = PlayerTurnActions::new(
            Owner::Player1,
            vec![
                TerritoryAction::grow(Position::new(0, 0)),
                TerritoryAction::move_to(Position::new(0, 1), Position::new(0, 2), 1),
            ],
        );
        let growing: Vec<_> = actions.growing().collect();
        assert_eq!(growing, vec![Position::new(0, 0)]);
        assert_eq!(actions.movements().count(), 1);
    }

    #[test]
    fn from_pair_orders_seats() {
        let p1 = PlayerTurnActions::new(Owner::Player1, vec![]);
        let p2 = PlayerTurnActions::new(Owner::Player2, vec![]);
        let turn = TurnActions::from_pair(3, p2.clone(), p1.clone());
        assert_eq!(turn.player1, p1);
        assert_eq!(turn.player2, p2);
        assert_eq!(turn.for_player(Owner::Player2), Some(&p2));
        assert_eq!(turn.for_player(Owner::Neutral), None);
    }
}
