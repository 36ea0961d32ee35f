//! Move generation.
//!
//! Enumerates actions for a player's territories: the generated option set
//! per territory, uniformly random turns, and the pruned, ordered candidate
//! turns search works from.

pub mod candidates;
pub mod legal;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Owner, PlayerTurnActions};

pub use candidates::{
    candidate_turns, greedy_turn, territory_candidates, threat, CandidateKind, ScoredAction,
};
pub use legal::legal_actions;

/// Picks one generated action uniformly at random for each of `player`'s
/// territories.
pub fn random_turn<R: Rng>(board: &Board, player: Owner, rng: &mut R) -> PlayerTurnActions {
    let mut actions = Vec::new();
    for (pos, _) in board.owned_by(player) {
        let legal = legal_actions(board, pos);
        if let Some(action) = legal.choose(rng) {
            actions.push(action.clone());
        }
    }
    PlayerTurnActions::new(player, actions)
}
