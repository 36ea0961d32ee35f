//! Paranoid minimax with shallow alpha pruning.
//!
//! Moves are simultaneous, so the search approximates them: the searching
//! player commits to a candidate turn, the opponent is assumed to see it and
//! reply with the turn that hurts most, and the resulting transition is a
//! chance node valued as the mean over `samples` independently seeded
//! resolutions. Every sampled successor is searched again from the top with
//! one less depth.
//!
//! This is shallow pruning, not full alpha-beta. The only cutoff is an
//! alpha cut at min nodes: once an opponent reply pushes a candidate under
//! the best value its max node already secured, the remaining replies are
//! skipped. Max nodes never cut on beta, because bounds are not passed
//! through chance nodes. Chance nodes are always averaged in full and their
//! children start from a fresh window, so pruned and unpruned searches
//! return the same move and score.
//!
//! Depth is deepened iteratively from 1 up to `max_depth`. When the deadline
//! interrupts a depth, the last completed depth's answer is kept; if even
//! depth 1 did not finish, the best root candidate evaluated so far is used.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::{Board, Owner, PlayerTurnActions};
use crate::config::GameConfig;
use crate::eval::{evaluate, evaluate_terminal};
use crate::game::is_game_over;
use crate::movegen::candidate_turns;

use super::chance::{child_seed, sample_seed};
use super::{simulate, AbortedEarly, Deadline, SearchResult};

/// Knobs for [`minimax_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxOptions {
    /// Deepest number of full turns to look ahead.
    pub max_depth: u32,
    /// Sampled outcomes averaged at each chance node.
    pub samples: usize,
    /// Candidate turns considered per player per node.
    pub max_candidates: usize,
    /// Wall-clock budget; `None` searches to `max_depth` unconditionally.
    pub time_budget: Option<Duration>,
    /// Alpha-beta pruning. Turning it off gives plain minimax.
    pub prune: bool,
}

impl Default for MinimaxOptions {
    fn default() -> Self {
        MinimaxOptions {
            max_depth: 2,
            samples: 8,
            max_candidates: 8,
            time_budget: Some(Duration::from_millis(1000)),
            prune: true,
        }
    }
}

struct Minimax<'a> {
    me: Owner,
    config: &'a GameConfig,
    options: &'a MinimaxOptions,
    deadline: Deadline,
    nodes: u64,
}

/// Best root candidate found by one depth-limited pass.
#[derive(Debug, Clone, Copy)]
struct RootBest {
    index: usize,
    score: f32,
}

impl Minimax<'_> {
    fn candidates(&self, board: &Board, player: Owner) -> Vec<PlayerTurnActions> {
        candidate_turns(board, player, self.options.max_candidates)
    }

    fn leaf(&self, board: &Board, turns_played: u32, depth: u32) -> Option<f32> {
        if is_game_over(board, turns_played, self.config) {
            Some(evaluate_terminal(self.me, board))
        } else if depth == 0 {
            Some(evaluate(self.me, board))
        } else {
            None
        }
    }

    /// Searches the root at `depth`, recording progress into `best` as each
    /// candidate finishes so an abort still leaves something usable.
    fn root(
        &mut self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        seed: u64,
        mine: &[PlayerTurnActions],
        best: &mut Option<RootBest>,
    ) -> Result<(), AbortedEarly> {
        let theirs = self.candidates(board, self.me.opponent());
        let mut alpha = f32::NEG_INFINITY;

        for (i, turn) in mine.iter().enumerate() {
            self.deadline.check()?;
            let value = self.min_value(board, turns_played, depth, turn, i, &theirs, alpha, seed)?;
            if best.map_or(true, |b| value > b.score) {
                *best = Some(RootBest { index: i, score: value });
            }
            if self.options.prune {
                alpha = alpha.max(value);
            }
        }
        Ok(())
    }

    fn max_value(
        &mut self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        seed: u64,
    ) -> Result<f32, AbortedEarly> {
        self.nodes += 1;
        if let Some(score) = self.leaf(board, turns_played, depth) {
            return Ok(score);
        }
        self.deadline.check()?;

        let mine = self.candidates(board, self.me);
        let theirs = self.candidates(board, self.me.opponent());
        let mut alpha = f32::NEG_INFINITY;
        let mut best = f32::NEG_INFINITY;

        for (i, turn) in mine.iter().enumerate() {
            let value = self.min_value(board, turns_played, depth, turn, i, &theirs, alpha, seed)?;
            best = best.max(value);
            if self.options.prune {
                alpha = alpha.max(value);
            }
        }
        Ok(best)
    }

    /// The opponent picks the reply minimising the expected value of `mine`.
    /// Stops early once the value falls to `alpha`.
    #[allow(clippy::too_many_arguments)]
    fn min_value(
        &mut self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        mine: &PlayerTurnActions,
        mine_index: usize,
        theirs: &[PlayerTurnActions],
        alpha: f32,
        seed: u64,
    ) -> Result<f32, AbortedEarly> {
        self.nodes += 1;
        let mut worst = f32::INFINITY;
        for (j, reply) in theirs.iter().enumerate() {
            let node_seed = child_seed(seed, mine_index, j);
            let value = self.chance_value(board, turns_played, depth, mine, reply, node_seed)?;
            worst = worst.min(value);
            if self.options.prune && worst <= alpha {
                break;
            }
        }
        Ok(worst)
    }

    /// Mean value over independently seeded resolutions of one joint turn.
    fn chance_value(
        &mut self,
        board: &Board,
        turns_played: u32,
        depth: u32,
        mine: &PlayerTurnActions,
        theirs: &PlayerTurnActions,
        seed: u64,
    ) -> Result<f32, AbortedEarly> {
        let samples = self.options.samples.max(1);
        let mut total = 0.0f64;
        for k in 0..samples {
            let s = sample_seed(seed, k);
            let next = simulate(board, turns_played, mine, theirs, self.config, s);
            total += self.max_value(&next, turns_played + 1, depth - 1, s)? as f64;
        }
        Ok((total / samples as f64) as f32)
    }
}

/// Chooses `player`'s turn by iterative-deepening paranoid minimax.
///
/// `seed` drives every simulated turn; callers draw a fresh one per call.
pub fn minimax_search(
    board: &Board,
    player: Owner,
    turns_played: u32,
    config: &GameConfig,
    options: &MinimaxOptions,
    seed: u64,
) -> SearchResult {
    let start = Instant::now();
    let mut search = Minimax {
        me: player,
        config,
        options,
        deadline: Deadline::after(options.time_budget),
        nodes: 0,
    };

    let mine = search.candidates(board, player);
    let mut completed: Option<(u32, RootBest)> = None;
    let mut partial: Option<RootBest> = None;
    let mut timed_out = false;

    for depth in 1..=options.max_depth.max(1) {
        let mut best = None;
        match search.root(board, turns_played, depth, seed, &mine, &mut best) {
            Ok(()) => {
                if let Some(b) = best {
                    completed = Some((depth, b));
                    debug!(
                        depth,
                        nodes = search.nodes,
                        score = b.score,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "minimax depth complete"
                    );
                }
            }
            Err(AbortedEarly) => {
                timed_out = true;
                partial = best;
                break;
            }
        }
        if is_game_over(board, turns_played + depth, config) {
            break;
        }
    }

    let (depth, chosen) = match (completed, partial) {
        (Some((depth, b)), _) => (depth, Some(b)),
        (None, p) => (0, p),
    };
    let (index, score) = match chosen {
        Some(b) => (b.index, b.score),
        None => {
            warn!(?player, "minimax deadline passed before any candidate was scored");
            (0, evaluate(player, board))
        }
    };

    SearchResult {
        actions: mine
            .get(index)
            .cloned()
            .unwrap_or_else(|| PlayerTurnActions::new(player, Vec::new())),
        score,
        nodes: search.nodes,
        depth,
        timed_out,
    }
}
