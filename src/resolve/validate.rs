//! Turn validation.
//!
//! A turn is checked in full before any resolution begins. The resolver
//! never applies part of a malformed turn.

use std::collections::HashSet;

use crate::board::{Board, Owner, PlayerTurnActions, Position, TurnActions};

/// Why a submitted turn was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("actions submitted for {got:?} in the {expected:?} slot")]
    WrongPlayer { expected: Owner, got: Owner },

    #[error("actions are for turn {got}, but the game is on turn {expected}")]
    TurnMismatch { expected: u32, got: u32 },

    #[error("{player:?} owns {position} but gave it no action")]
    MissingAction { player: Owner, position: Position },

    #[error("{position} has more than one action")]
    DuplicateAction { position: Position },

    #[error("{player:?} does not own {position}")]
    NotOwned { player: Owner, position: Position },

    #[error("move from {position} has no movements")]
    EmptyMove { position: Position },

    #[error("movement from {movement_source} listed under the action for {position}")]
    SourceMismatch {
        position: Position,
        movement_source: Position,
    },

    #[error("{position} is off the board")]
    OutOfBounds { position: Position },

    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: Position, to: Position },

    #[error("movement from {from} to {to} carries no stones")]
    ZeroCount { from: Position, to: Position },

    #[error("{position} sends {requested} stones but holds {available}")]
    OverCommitted {
        position: Position,
        requested: u32,
        available: u32,
    },
}

/// Validates both players' actions against `board`.
pub fn validate_turn(board: &Board, actions: &TurnActions) -> Result<(), ActionError> {
    validate_player(board, &actions.player1, Owner::Player1)?;
    validate_player(board, &actions.player2, Owner::Player2)
}

/// Validates one player's actions: exactly one action per owned territory,
/// and every movement legal against the territory it leaves.
pub fn validate_player(
    board: &Board,
    actions: &PlayerTurnActions,
    expected: Owner,
) -> Result<(), ActionError> {
    if actions.player != expected {
        return Err(ActionError::WrongPlayer {
            expected,
            got: actions.player,
        });
    }
    let player = expected;
    let mut seen: HashSet<Position> = HashSet::with_capacity(actions.actions.len());

    for action in &actions.actions {
        let position = action.position();
        if !board.contains(position) {
            return Err(ActionError::OutOfBounds { position });
        }
        let territory = board.territory(position);
        if !territory.is_owned_by(player) {
            return Err(ActionError::NotOwned { player, position });
        }
        if !seen.insert(position) {
            return Err(ActionError::DuplicateAction { position });
        }

        if action.is_grow() {
            continue;
        }

        let movements = action.movements();
        if movements.is_empty() {
            return Err(ActionError::EmptyMove { position });
        }
        let mut requested = 0u32;
        for m in movements {
            if m.source != position {
                return Err(ActionError::SourceMismatch {
                    position,
                    movement_source: m.source,
                });
            }
            if !board.contains(m.destination) {
                return Err(ActionError::OutOfBounds {
                    position: m.destination,
                });
            }
            if !m.source.is_adjacent(m.destination) {
                return Err(ActionError::NotAdjacent {
                    from: m.source,
                    to: m.destination,
                });
            }
            if m.count == 0 {
                return Err(ActionError::ZeroCount {
                    from: m.source,
                    to: m.destination,
                });
            }
            requested = requested.saturating_add(m.count);
        }
        if requested > territory.stones() {
            return Err(ActionError::OverCommitted {
                position,
                requested,
                available: territory.stones(),
            });
        }
    }

    if let Some((position, _)) = board.owned_by(player).find(|(p, _)| !seen.contains(p)) {
        return Err(ActionError::MissingAction { player, position });
    }

    Ok(())
}
