//! Position evaluation.
//!
//! Scores a board from a given player's perspective. Search calls this at
//! depth-limit leaves and at finished games.

pub(crate) mod heuristic;

pub use heuristic::{evaluate, evaluate_terminal, WIN_SCORE};
