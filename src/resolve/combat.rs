//! Attacker-vs-defender duels.
//!
//! Sides take turns rolling, defender first. Each roll hits with
//! probability `hit_chance`; a hit removes one stone from the other side.
//! The duel ends when either side runs out of stones. A fixed roll sequence
//! can also run out first, which stalls the duel where it stands. Every roll
//! is kept so a turn can be replayed or audited later.

use rand::Rng;
use serde::Serialize;

use crate::board::Owner;

/// Rolls reserved up front for a duel trace. Longer duels grow the vector.
const ROLL_CAPACITY_HINT: usize = 4_096;

/// Which side of a duel made a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CombatSide {
    Attacker,
    Defender,
}

impl CombatSide {
    const fn other(self) -> CombatSide {
        match self {
            CombatSide::Attacker => CombatSide::Defender,
            CombatSide::Defender => CombatSide::Attacker,
        }
    }
}

/// Final state of a duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CombatOutcome {
    /// Defender wiped out, attacker has stones left.
    AttackerWins,
    /// Defender still standing. Attacker survivors, if any, retreat.
    DefenderHolds,
    /// Both sides wiped out.
    MutualDestruction,
}

/// One roll of the duel, with both garrisons after it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombatRoll {
    pub roller: CombatSide,
    pub value: f64,
    pub hit: bool,
    pub attacker_stones: u32,
    pub defender_stones: u32,
}

/// Full trace of a resolved duel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatResult {
    pub attacker: Owner,
    pub defender: Owner,
    pub attacker_initial: u32,
    pub defender_initial: u32,
    pub hit_chance: f64,
    pub rolls: Vec<CombatRoll>,
    pub attacker_surviving: u32,
    pub defender_surviving: u32,
    pub outcome: CombatOutcome,
}

impl CombatResult {
    /// The owner left standing, or Neutral after mutual destruction.
    pub fn victor(&self) -> Owner {
        match self.outcome {
            CombatOutcome::AttackerWins => self.attacker,
            CombatOutcome::DefenderHolds => self.defender,
            CombatOutcome::MutualDestruction => Owner::Neutral,
        }
    }

    /// Stones left on the victor's side.
    pub fn victor_stones(&self) -> u32 {
        match self.outcome {
            CombatOutcome::AttackerWins => self.attacker_surviving,
            CombatOutcome::DefenderHolds => self.defender_surviving,
            CombatOutcome::MutualDestruction => 0,
        }
    }

    /// Number of rolls made by `side`.
    pub fn rolls_by(&self, side: CombatSide) -> usize {
        self.rolls.iter().filter(|r| r.roller == side).count()
    }
}

/// Resolves a duel drawing rolls from `rng`.
///
/// Runs until one side is out of stones, however long that takes. With
/// `hit_chance <= 0` no roll can ever hit, so the duel stops before the
/// first roll and the defender holds.
pub fn resolve_combat<R: Rng>(
    attacker: Owner,
    attacker_stones: u32,
    defender: Owner,
    defender_stones: u32,
    hit_chance: f64,
    rng: &mut R,
) -> CombatResult {
    duel(
        attacker,
        attacker_stones,
        defender,
        defender_stones,
        hit_chance,
        None,
        || Some(rng.gen::<f64>()),
    )
}

/// Resolves a duel from a fixed roll sequence.
///
/// Once the sequence runs out every further roll would miss, so no side can
/// lose another stone and the duel stops where it is.
pub fn resolve_combat_deterministic(
    attacker: Owner,
    attacker_stones: u32,
    defender: Owner,
    defender_stones: u32,
    hit_chance: f64,
    rolls: &[f64],
) -> CombatResult {
    let mut values = rolls.iter().copied();
    duel(
        attacker,
        attacker_stones,
        defender,
        defender_stones,
        hit_chance,
        Some(rolls.len()),
        || values.next(),
    )
}

fn duel(
    attacker: Owner,
    attacker_stones: u32,
    defender: Owner,
    defender_stones: u32,
    hit_chance: f64,
    max_rolls: Option<usize>,
    mut next_roll: impl FnMut() -> Option<f64>,
) -> CombatResult {
    let mut a = attacker_stones;
    let mut d = defender_stones;
    let expected = (a as usize + d as usize).saturating_mul(2);
    let capacity = max_rolls.unwrap_or(ROLL_CAPACITY_HINT).min(expected);
    let mut rolls = Vec::with_capacity(capacity);
    let mut turn = CombatSide::Defender;
    // NaN compares false here too.
    let can_hit = hit_chance > 0.0;

    while can_hit && a > 0 && d > 0 && !matches!(max_rolls, Some(max) if rolls.len() >= max) {
        let Some(value) = next_roll() else {
            break;
        };
        let hit = value < hit_chance;
        if hit {
            match turn {
                CombatSide::Defender => a -= 1,
                CombatSide::Attacker => d -= 1,
            }
        }
        rolls.push(CombatRoll {
            roller: turn,
            value,
            hit,
            attacker_stones: a,
            defender_stones: d,
        });
        turn = turn.other();
    }

    let outcome = match (a, d) {
        (0, 0) => CombatOutcome::MutualDestruction,
        (_, 0) => CombatOutcome::AttackerWins,
        _ => CombatOutcome::DefenderHolds,
    };

    tracing::trace!(
        ?attacker,
        attacker_stones,
        defender_stones,
        rolls = rolls.len(),
        ?outcome,
        "combat resolved"
    );

    CombatResult {
        attacker,
        defender,
        attacker_initial: attacker_stones,
        defender_initial: defender_stones,
        hit_chance,
        rolls,
        attacker_surviving: a,
        defender_surviving: d,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const A: Owner = Owner::Player1;
    const D: Owner = Owner::Player2;

    #[test]
    fn certain_hits_five_against_two() {
        let mut rng = SmallRng::seed_from_u64(7);
        let r = resolve_combat(A, 5, D, 2, 1.0, &mut rng);
        assert_eq!(r.outcome, CombatOutcome::AttackerWins);
        // Defender rolls twice before its second stone falls.
        assert_eq!(r.rolls_by(CombatSide::Defender), 2);
        assert_eq!(r.attacker_surviving, 5 - 2);
        assert_eq!(r.defender_surviving, 0);
        assert_eq!(r.victor(), A);
        assert_eq!(r.victor_stones(), 3);
    }

    #[test]
    fn defender_rolls_first() {
        let r = resolve_combat_deterministic(A, 1, D, 1, 1.0, &[0.0, 0.0]);
        assert_eq!(r.rolls[0].roller, CombatSide::Defender);
        assert_eq!(r.rolls.len(), 1);
        assert_eq!(r.outcome, CombatOutcome::DefenderHolds);
        assert_eq!(r.attacker_surviving, 0);
        assert_eq!(r.defender_surviving, 1);
    }

    #[test]
    fn rolls_alternate() {
        let r = resolve_combat_deterministic(A, 3, D, 3, 0.5, &[0.9, 0.9, 0.9, 0.1, 0.1, 0.9]);
        let rollers: Vec<_> = r.rolls.iter().map(|x| x.roller).collect();
        assert_eq!(
            rollers,
            vec![
                CombatSide::Defender,
                CombatSide::Attacker,
                CombatSide::Defender,
                CombatSide::Attacker,
                CombatSide::Defender,
                CombatSide::Attacker,
            ]
        );
        // Roll 4 (attacker, 0.1) hits the defender, roll 5 (defender, 0.1)
        // hits the attacker.
        assert_eq!(r.attacker_surviving, 2);
        assert_eq!(r.defender_surviving, 2);
    }

    #[test]
    fn replay_is_deterministic() {
        let seq = [0.3, 0.7, 0.2, 0.1, 0.8, 0.4, 0.05, 0.6, 0.33, 0.01, 0.02, 0.03];
        let first = resolve_combat_deterministic(A, 4, D, 3, 0.35, &seq);
        for _ in 0..5 {
            let again = resolve_combat_deterministic(A, 4, D, 3, 0.35, &seq);
            assert_eq!(again, first);
        }
    }

    #[test]
    fn exhausted_sequence_stalls_as_hold() {
        let r = resolve_combat_deterministic(A, 4, D, 4, 0.5, &[0.9, 0.1]);
        assert_eq!(r.rolls.len(), 2);
        assert_eq!(r.outcome, CombatOutcome::DefenderHolds);
        assert_eq!(r.attacker_surviving, 4);
        assert_eq!(r.defender_surviving, 3);
    }

    #[test]
    fn trace_counts_match_survivors() {
        let mut rng = SmallRng::seed_from_u64(99);
        let r = resolve_combat(A, 8, D, 6, 0.4, &mut rng);
        let last = r.rolls.last().unwrap();
        assert_eq!(last.attacker_stones, r.attacker_surviving);
        assert_eq!(last.defender_stones, r.defender_surviving);
        let hits_on_attacker = r
            .rolls
            .iter()
            .filter(|x| x.roller == CombatSide::Defender && x.hit)
            .count() as u32;
        assert_eq!(r.attacker_surviving, 8 - hits_on_attacker);
    }

    #[test]
    fn large_garrisons_fight_to_the_end() {
        let mut rng = SmallRng::seed_from_u64(11);
        let r = resolve_combat(A, 6000, D, 6000, 1.0, &mut rng);
        // Defender strikes first, so it wins the race of sure hits.
        assert_eq!(r.outcome, CombatOutcome::DefenderHolds);
        assert_eq!(r.attacker_surviving, 0);
        assert_eq!(r.defender_surviving, 1);
        assert_eq!(r.rolls.len(), 2 * 6000 - 1);

        let r = resolve_combat(A, 5000, D, 4000, 0.3, &mut rng);
        assert!(r.attacker_surviving == 0 || r.defender_surviving == 0);
    }

    #[test]
    fn hitless_duel_stops_at_once() {
        let mut rng = SmallRng::seed_from_u64(1);
        let r = resolve_combat(A, 3, D, 2, 0.0, &mut rng);
        assert!(r.rolls.is_empty());
        assert_eq!(r.outcome, CombatOutcome::DefenderHolds);
        assert_eq!(r.attacker_surviving, 3);
        assert_eq!(r.defender_surviving, 2);
    }

    #[test]
    fn same_seed_same_duel() {
        let a = resolve_combat(A, 6, D, 6, 0.5, &mut SmallRng::seed_from_u64(3));
        let b = resolve_combat(A, 6, D, 6, 0.5, &mut SmallRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
