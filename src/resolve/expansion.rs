//! Claims on neutral ground.
//!
//! Every expanding stone rolls once against `success_rate`. One success is
//! enough for the whole group to land and claim the territory; if every
//! roll fails the whole group is lost and the cell stays neutral. There is
//! no partial claim.

use rand::Rng;
use serde::Serialize;

use crate::board::Owner;

/// Whether an expansion landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpansionOutcome {
    /// At least one roll succeeded; all stones claim the cell.
    Claimed,
    /// Every roll failed; all stones are gone.
    Lost,
}

/// One stone's roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpansionRoll {
    pub value: f64,
    pub success: bool,
}

/// Full trace of a resolved expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionResult {
    pub expander: Owner,
    pub stones_sent: u32,
    pub success_rate: f64,
    pub rolls: Vec<ExpansionRoll>,
    pub surviving: u32,
    pub outcome: ExpansionOutcome,
}

impl ExpansionResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == ExpansionOutcome::Claimed
    }
}

/// Resolves an expansion drawing one roll per stone from `rng`.
pub fn resolve_expansion<R: Rng>(
    expander: Owner,
    stones: u32,
    success_rate: f64,
    rng: &mut R,
) -> ExpansionResult {
    let values: Vec<f64> = (0..stones).map(|_| rng.gen::<f64>()).collect();
    settle(expander, stones, success_rate, &values)
}

/// Resolves an expansion from a fixed roll sequence. Stones without a
/// supplied roll count as failures.
pub fn resolve_expansion_deterministic(
    expander: Owner,
    stones: u32,
    success_rate: f64,
    rolls: &[f64],
) -> ExpansionResult {
    let values: Vec<f64> = (0..stones as usize)
        .map(|i| rolls.get(i).copied().unwrap_or(1.0))
        .collect();
    settle(expander, stones, success_rate, &values)
}

fn settle(expander: Owner, stones: u32, success_rate: f64, values: &[f64]) -> ExpansionResult {
    let rolls: Vec<ExpansionRoll> = values
        .iter()
        .map(|&value| ExpansionRoll {
            value,
            success: value < success_rate,
        })
        .collect();

    let (outcome, surviving) = if rolls.iter().any(|r| r.success) {
        (ExpansionOutcome::Claimed, stones)
    } else {
        (ExpansionOutcome::Lost, 0)
    };

    tracing::trace!(?expander, stones, ?outcome, "expansion resolved");

    ExpansionResult {
        expander,
        stones_sent: stones,
        success_rate,
        rolls,
        surviving,
        outcome,
    }
}
