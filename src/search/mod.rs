//! Search and planning.
//!
//! Chooses a player's actions by simulating future turns of the stochastic
//! resolver. Two searches share the same substrate: paranoid minimax with
//! shallow alpha pruning and Monte Carlo expectimax. Both average each chance
//! node over several independently seeded outcomes (see [`chance`]) and
//! both stop at a wall-clock deadline, returning the best answer so far.

pub mod chance;
pub mod expectimax;
pub mod minimax;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::board::{Board, PlayerTurnActions, TurnActions};
use crate::config::GameConfig;
use crate::resolve::turn::resolve_validated;

pub use expectimax::{expectimax_search, expected_value, ExpectimaxOptions};
pub use minimax::{minimax_search, MinimaxOptions};

/// Result of a search: the chosen actions and associated info.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub actions: PlayerTurnActions,
    pub score: f32,
    pub nodes: u64,
    /// Deepest fully searched depth; 0 if none finished.
    pub depth: u32,
    /// True if the deadline cut the search short.
    pub timed_out: bool,
}

/// Returned up the stack when the deadline passes mid-search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbortedEarly;

/// Wall-clock cutoff. `None` never expires.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    pub(crate) fn after(budget: Option<Duration>) -> Self {
        Deadline(budget.map(|b| Instant::now() + b))
    }

    pub(crate) fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    pub(crate) fn check(&self) -> Result<(), AbortedEarly> {
        if self.expired() {
            Err(AbortedEarly)
        } else {
            Ok(())
        }
    }
}

/// Resolves one hypothetical turn with its own seeded random source.
///
/// Both sides' actions come from the move generator, so validation is
/// skipped.
pub(crate) fn simulate(
    board: &Board,
    turns_played: u32,
    a: &PlayerTurnActions,
    b: &PlayerTurnActions,
    config: &GameConfig,
    seed: u64,
) -> Board {
    let actions = TurnActions::from_pair(turns_played, a.clone(), b.clone());
    let mut rng = chance::sample_rng(seed);
    resolve_validated(board, &actions, config, &mut rng).board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Owner, Position, Territory, TerritoryAction};

    #[test]
    fn unbounded_deadline_never_expires() {
        assert!(!Deadline::after(None).expired());
        assert_eq!(Deadline::after(None).check(), Ok(()));
    }

    #[test]
    fn zero_budget_expires_immediately() {
        let d = Deadline::after(Some(Duration::ZERO));
        assert!(d.expired());
        assert_eq!(d.check(), Err(AbortedEarly));
    }

    #[test]
    fn simulate_is_seed_deterministic() {
        let board = Board::empty(3).with_territories([
            (Position::new(0, 1), Territory::new(Owner::Player1, 5)),
            (Position::new(1, 1), Territory::new(Owner::Player2, 4)),
        ]);
        let mine = PlayerTurnActions::new(
            Owner::Player1,
            vec![TerritoryAction::move_to(Position::new(0, 1), Position::new(1, 1), 4)],
        );
        let theirs = PlayerTurnActions::new(
            Owner::Player2,
            vec![TerritoryAction::grow(Position::new(1, 1))],
        );
        let config = GameConfig::default();
        let a = simulate(&board, 0, &mine, &theirs, &config, 17);
        let b = simulate(&board, 0, &theirs, &mine, &config, 17);
        assert_eq!(a, b);
    }
}
