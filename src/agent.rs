//! Players.
//!
//! Anything that can set up and play a game implements [`Agent`]. Each
//! agent owns its random source, seeded explicitly at construction; search
//! agents draw a fresh search seed from it on every decision.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::board::{Owner, PlayerTurnActions, Position};
use crate::config::GameConfig;
use crate::game::GameState;
use crate::movegen::random_turn;
use crate::search::{
    expectimax_search, minimax_search, ExpectimaxOptions, MinimaxOptions, SearchResult,
};

/// A participant in a game.
pub trait Agent: Send {
    /// Short label used in game records.
    fn name(&self) -> &str;

    /// Picks where `player` places its initial stones.
    fn choose_setup(&mut self, state: &GameState, player: Owner, config: &GameConfig) -> Position;

    /// Picks one action for every territory `player` owns.
    fn choose_actions(
        &mut self,
        state: &GameState,
        player: Owner,
        config: &GameConfig,
    ) -> PlayerTurnActions;

    /// Clears anything remembered from a previous game.
    fn reset(&mut self);
}

/// The open setup cell with the most on-board neighbours, first in
/// row-major order on ties. Falls back to the origin if the zone is full.
fn roomiest_setup(state: &GameState, player: Owner) -> Position {
    let size = state.board().size();
    state
        .open_setup_positions(player)
        .into_iter()
        .rev()
        .max_by_key(|pos| pos.neighbors(size).count())
        .unwrap_or(Position::new(0, 0))
}

/// Plays uniformly random generated actions.
#[derive(Debug)]
pub struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_setup(&mut self, state: &GameState, player: Owner, _config: &GameConfig) -> Position {
        state
            .open_setup_positions(player)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Position::new(0, 0))
    }

    fn choose_actions(
        &mut self,
        state: &GameState,
        player: Owner,
        _config: &GameConfig,
    ) -> PlayerTurnActions {
        random_turn(state.board(), player, &mut self.rng)
    }

    fn reset(&mut self) {}
}

/// Paranoid minimax search agent.
#[derive(Debug)]
pub struct MinimaxAgent {
    options: MinimaxOptions,
    rng: SmallRng,
    last: Option<SearchResult>,
}

impl MinimaxAgent {
    pub fn new(options: MinimaxOptions, seed: u64) -> Self {
        MinimaxAgent {
            options,
            rng: SmallRng::seed_from_u64(seed),
            last: None,
        }
    }

    /// The result behind the most recent decision.
    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_setup(&mut self, state: &GameState, player: Owner, _config: &GameConfig) -> Position {
        roomiest_setup(state, player)
    }

    fn choose_actions(
        &mut self,
        state: &GameState,
        player: Owner,
        config: &GameConfig,
    ) -> PlayerTurnActions {
        let seed: u64 = self.rng.gen();
        let result = minimax_search(
            state.board(),
            player,
            state.current_turn(),
            config,
            &self.options,
            seed,
        );
        debug!(
            ?player,
            depth = result.depth,
            nodes = result.nodes,
            score = result.score,
            timed_out = result.timed_out,
            "minimax decision"
        );
        let actions = result.actions.clone();
        self.last = Some(result);
        actions
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Monte Carlo expectimax agent.
#[derive(Debug)]
pub struct ExpectimaxAgent {
    options: ExpectimaxOptions,
    rng: SmallRng,
    last: Option<SearchResult>,
}

impl ExpectimaxAgent {
    pub fn new(options: ExpectimaxOptions, seed: u64) -> Self {
        ExpectimaxAgent {
            options,
            rng: SmallRng::seed_from_u64(seed),
            last: None,
        }
    }

    pub fn last_search(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }
}

impl Agent for ExpectimaxAgent {
    fn name(&self) -> &str {
        "expectimax"
    }

    fn choose_setup(&mut self, state: &GameState, player: Owner, _config: &GameConfig) -> Position {
        roomiest_setup(state, player)
    }

    fn choose_actions(
        &mut self,
        state: &GameState,
        player: Owner,
        config: &GameConfig,
    ) -> PlayerTurnActions {
        let seed: u64 = self.rng.gen();
        let result = expectimax_search(
            state.board(),
            player,
            state.current_turn(),
            config,
            &self.options,
            seed,
        );
        debug!(
            ?player,
            nodes = result.nodes,
            score = result.score,
            timed_out = result.timed_out,
            "expectimax decision"
        );
        let actions = result.actions.clone();
        self.last = Some(result);
        actions
    }

    fn reset(&mut self) {
        self.last = None;
    }
}
