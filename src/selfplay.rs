//! Self-play game generation.
//!
//! Plays full games between two agents through the game state machine and
//! records every turn, for replay, agent comparison, and offline analysis.
//! Games are independent, so batches run on the rayon pool.

use std::io::Write;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::{Agent, ExpectimaxAgent, MinimaxAgent, RandomAgent};
use crate::board::{Board, Owner, TurnActions};
use crate::config::{ConfigError, GameConfig};
use crate::game::{GamePhase, GameState, SetupError, TurnRecord};
use crate::resolve::ActionError;
use crate::search::chance::splitmix64;
use crate::search::{ExpectimaxOptions, MinimaxOptions};

/// Errors that stop a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),

    #[error("agent made an illegal setup placement: {0}")]
    Setup(#[from] SetupError),

    #[error("agent submitted an illegal turn: {0}")]
    Action(#[from] ActionError),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write game record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode game record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which agent sits in a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Random,
    Minimax,
    Expectimax,
}

/// Configuration for a self-play batch.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub game: GameConfig,
    pub num_games: usize,
    pub player1: AgentKind,
    pub player2: AgentKind,
    pub minimax: MinimaxOptions,
    pub expectimax: ExpectimaxOptions,
    /// Worker threads; 1 plays games one after another.
    pub threads: usize,
    /// Base seed. Game `i` is seeded from `seed` and `i` alone.
    pub seed: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            game: GameConfig::default(),
            num_games: 10,
            player1: AgentKind::Expectimax,
            player2: AgentKind::Minimax,
            minimax: MinimaxOptions {
                time_budget: Some(Duration::from_millis(200)),
                ..MinimaxOptions::default()
            },
            expectimax: ExpectimaxOptions {
                time_budget: Some(Duration::from_millis(200)),
                ..ExpectimaxOptions::default()
            },
            threads: 4,
            seed: 1,
        }
    }
}

impl SelfPlayConfig {
    /// Builds the agent for `kind` with its own seed.
    pub fn build_agent(&self, kind: AgentKind, seed: u64) -> Box<dyn Agent> {
        match kind {
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
            AgentKind::Minimax => Box::new(MinimaxAgent::new(self.minimax.clone(), seed)),
            AgentKind::Expectimax => {
                Box::new(ExpectimaxAgent::new(self.expectimax.clone(), seed))
            }
        }
    }
}

/// A complete self-play game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub player1: String,
    pub player2: String,
    pub config: GameConfig,
    /// Board as it stood once both players had placed.
    pub initial_board: Board,
    pub turns: Vec<TurnRecord>,
    pub final_board: Board,
    pub winner: Option<Owner>,
    /// Territories held at the end, by seat.
    pub territories: [usize; 2],
    /// Stones held at the end, by seat.
    pub stones: [u32; 2],
}

/// Plays one game between `player1` and `player2`.
///
/// `rng` drives the resolver; the agents use their own sources.
pub fn play_game(
    game_id: usize,
    config: &GameConfig,
    player1: &mut dyn Agent,
    player2: &mut dyn Agent,
    rng: &mut SmallRng,
) -> Result<GameRecord, SelfPlayError> {
    let mut state = GameState::new(config.clone())?;
    player1.reset();
    player2.reset();

    let p1 = player1.choose_setup(&state, Owner::Player1, config);
    state.place_setup(Owner::Player1, p1)?;
    let p2 = player2.choose_setup(&state, Owner::Player2, config);
    state.place_setup(Owner::Player2, p2)?;
    let initial_board = state.board().clone();

    while state.phase() == GamePhase::Playing {
        let first = player1.choose_actions(&state, Owner::Player1, config);
        let second = player2.choose_actions(&state, Owner::Player2, config);
        let actions = TurnActions::new(state.current_turn(), first, second);
        state.apply_turn(&actions, rng)?;
    }

    let board = state.board().clone();
    Ok(GameRecord {
        game_id,
        player1: player1.name().to_string(),
        player2: player2.name().to_string(),
        config: config.clone(),
        initial_board,
        turns: state.history().to_vec(),
        territories: [
            board.territory_count(Owner::Player1),
            board.territory_count(Owner::Player2),
        ],
        stones: [
            board.stone_count(Owner::Player1),
            board.stone_count(Owner::Player2),
        ],
        winner: state.winner(),
        final_board: board,
    })
}

/// Plays game `game_id` of a batch with seeds derived from the batch seed.
fn play_seeded(config: &SelfPlayConfig, game_id: usize) -> Result<GameRecord, SelfPlayError> {
    let base = splitmix64(config.seed.wrapping_add(game_id as u64));
    let mut player1 = config.build_agent(config.player1, splitmix64(base ^ 1));
    let mut player2 = config.build_agent(config.player2, splitmix64(base ^ 2));
    let mut rng = SmallRng::seed_from_u64(base);

    let start = Instant::now();
    let game = play_game(
        game_id,
        &config.game,
        player1.as_mut(),
        player2.as_mut(),
        &mut rng,
    )?;
    debug!(
        game_id,
        winner = ?game.winner,
        turns = game.turns.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "self-play game finished"
    );
    Ok(game)
}

/// Runs a self-play batch, returning games in id order.
///
/// With `threads > 1` games are played concurrently. Records do not depend
/// on the thread count only when every search runs with `time_budget: None`.
/// A wall-clock budget cuts searches short depending on CPU load, and the
/// default options use one.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    config.game.validate()?;
    let games = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            (0..config.num_games)
                .into_par_iter()
                .map(|i| play_seeded(config, i))
                .collect::<Result<Vec<_>, _>>()
        })?
    } else {
        (0..config.num_games)
            .map(|i| play_seeded(config, i))
            .collect::<Result<Vec<_>, _>>()?
    };

    let summary = SelfPlaySummary::from_games(&games);
    info!(
        games = summary.games,
        player1_wins = summary.player1_wins,
        player2_wins = summary.player2_wins,
        draws = summary.draws,
        avg_turns = summary.avg_turns,
        "self-play batch complete"
    );
    Ok(games)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SelfPlayError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Win/draw tally over a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfPlaySummary {
    pub games: usize,
    pub player1_wins: usize,
    pub player2_wins: usize,
    pub draws: usize,
    pub avg_turns: f64,
}

impl SelfPlaySummary {
    pub fn from_games(games: &[GameRecord]) -> Self {
        let count = |w: Option<Owner>| games.iter().filter(|g| g.winner == w).count();
        let turns: usize = games.iter().map(|g| g.turns.len()).sum();
        SelfPlaySummary {
            games: games.len(),
            player1_wins: count(Some(Owner::Player1)),
            player2_wins: count(Some(Owner::Player2)),
            draws: count(None),
            avg_turns: turns as f64 / games.len().max(1) as f64,
        }
    }
}
