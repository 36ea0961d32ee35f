//! Monte Carlo expectimax.
//!
//! The opponent's reply is predicted once per node as its greedy turn. Each
//! of my candidate turns is then valued as the mean over `samples`
//! independently seeded resolutions of the joint turn; below the root a
//! sampled successor is worth the best of my candidates from there, down to
//! `depth` turns. Root candidates are scored in parallel on the rayon pool.
//! Seeds come from [`super::chance`], so the result does not depend on how
//! the work is scheduled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::board::{Board, Owner, PlayerTurnActions};
use crate::config::GameConfig;
use crate::eval::{evaluate, evaluate_terminal};
use crate::game::is_game_over;
use crate::movegen::{candidate_turns, greedy_turn};

use super::chance::{child_seed, sample_seed};
use super::{simulate, AbortedEarly, Deadline, SearchResult};

/// Knobs for [`expectimax_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectimaxOptions {
    /// Turns simulated below the root.
    pub depth: u32,
    /// Sampled outcomes averaged per chance node.
    pub samples: usize,
    /// Candidate turns considered per node.
    pub max_candidates: usize,
    pub time_budget: Option<Duration>,
    /// Score root candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for ExpectimaxOptions {
    fn default() -> Self {
        ExpectimaxOptions {
            depth: 1,
            samples: 16,
            max_candidates: 8,
            time_budget: Some(Duration::from_millis(1000)),
            parallel: true,
        }
    }
}

struct Expectimax<'a> {
    me: Owner,
    config: &'a GameConfig,
    options: &'a ExpectimaxOptions,
    deadline: Deadline,
    nodes: AtomicU64,
}

impl Expectimax<'_> {
    /// Mean value of playing `mine` against `theirs` from `board`.
    fn chance_value(
        &self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        mine: &PlayerTurnActions,
        theirs: &PlayerTurnActions,
        seed: u64,
    ) -> Result<f32, AbortedEarly> {
        self.deadline.check()?;
        let samples = self.options.samples.max(1);
        let mut total = 0.0f64;
        for k in 0..samples {
            let s = sample_seed(seed, k);
            let next = simulate(board, turns_played, mine, theirs, self.config, s);
            total += self.node_value(&next, turns_played + 1, depth - 1, s)? as f64;
        }
        Ok((total / samples as f64) as f32)
    }

    /// Value of a sampled successor: a leaf score, or the best of my
    /// candidates against the predicted reply.
    fn node_value(
        &self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        seed: u64,
    ) -> Result<f32, AbortedEarly> {
        self.nodes.fetch_add(1, Ordering::Relaxed);
        if is_game_over(board, turns_played, self.config) {
            return Ok(evaluate_terminal(self.me, board));
        }
        if depth == 0 {
            return Ok(evaluate(self.me, board));
        }

        let theirs = greedy_turn(board, self.me.opponent());
        let mut best = f32::NEG_INFINITY;
        for (i, mine) in candidate_turns(board, self.me, self.options.max_candidates)
            .iter()
            .enumerate()
        {
            let v = self.chance_value(board, turns_played, depth, mine, &theirs, child_seed(seed, i, 0))?;
            best = best.max(v);
        }
        Ok(best)
    }
}

/// Chooses `player`'s turn by Monte Carlo expectimax.
///
/// `seed` drives every simulated turn; callers draw a fresh one per call.
/// Root candidates that did not finish before the deadline are ignored; if
/// none finished, the first (greedy) candidate is returned.
pub fn expectimax_search(
    board: &Board,
    player: Owner,
    turns_played: u32,
    config: &GameConfig,
    options: &ExpectimaxOptions,
    seed: u64,
) -> SearchResult {
    let start = Instant::now();
    let search = Expectimax {
        me: player,
        config,
        options,
        deadline: Deadline::after(options.time_budget),
        nodes: AtomicU64::new(0),
    };
    let depth = options.depth.max(1);

    let mine = candidate_turns(board, player, options.max_candidates);
    let theirs = greedy_turn(board, player.opponent());

    let score_one = |(i, turn): (usize, &PlayerTurnActions)| {
        search
            .chance_value(board, turns_played, depth, turn, &theirs, child_seed(seed, i, 0))
            .ok()
    };
    let scores: Vec<Option<f32>> = if options.parallel {
        mine.par_iter().enumerate().map(score_one).collect()
    } else {
        mine.iter().enumerate().map(score_one).collect()
    };

    let timed_out = scores.iter().any(Option::is_none);
    let mut best: Option<(usize, f32)> = None;
    for (i, score) in scores.iter().enumerate() {
        if let Some(s) = *score {
            if best.map_or(true, |(_, b)| s > b) {
                best = Some((i, s));
            }
        }
    }

    let nodes = search.nodes.load(Ordering::Relaxed);
    let (index, score, completed_depth) = match best {
        Some((i, s)) => (i, s, if timed_out { 0 } else { depth }),
        None => {
            warn!(?player, "expectimax deadline passed before any candidate was scored");
            (0, evaluate(player, board), 0)
        }
    };

    debug!(
        depth = completed_depth,
        nodes,
        score,
        candidates = mine.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "expectimax complete"
    );

    SearchResult {
        actions: mine
            .get(index)
            .cloned()
            .unwrap_or_else(|| PlayerTurnActions::new(player, Vec::new())),
        score,
        nodes,
        depth: completed_depth,
        timed_out,
    }
}

/// Monte Carlo estimate of one joint turn's value for `player`: the mean
/// leaf evaluation over `samples` independently seeded resolutions.
#[allow(clippy::too_many_arguments)]
pub fn expected_value(
    board: &Board,
    player: Owner,
    turns_played: u32,
    mine: &PlayerTurnActions,
    theirs: &PlayerTurnActions,
    config: &GameConfig,
    samples: usize,
    seed: u64,
) -> f32 {
    let options = ExpectimaxOptions {
        depth: 1,
        samples,
        time_budget: None,
        ..ExpectimaxOptions::default()
    };
    let search = Expectimax {
        me: player,
        config,
        options: &options,
        deadline: Deadline::after(None),
        nodes: AtomicU64::new(0),
    };
    // No deadline, so the estimate always completes.
    search
        .chance_value(board, turns_played, 1, mine, theirs, seed)
        .unwrap_or_else(|AbortedEarly| evaluate(player, board))
}
