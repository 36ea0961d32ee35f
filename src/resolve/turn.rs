//! Six-phase turn resolution.
//!
//! Both players' actions are applied simultaneously in a fixed order:
//!
//! 1. Departure: every moving stone leaves its source before anything
//!    arrives. A source emptied this way turns neutral.
//! 2. Reinforcement: stones arriving at a territory their player still owns
//!    are added unconditionally.
//! 3. Expansion: stones arriving at neutral ground roll for the claim. If
//!    both players arrive at the same cell the claim is contested.
//! 4. Attack: stones arriving at enemy territory fight the (possibly just
//!    reinforced) garrison. Survivors of a failed attack retreat.
//! 5. Cap: every territory is clamped to the stone limit.
//! 6. Growth: territories that chose GROW and are still held gain stones.
//!
//! Destinations are classified once, against the board as it stands after
//! departures, and each phase walks its destinations in row-major order.
//! The only randomness comes from the `rng` passed in, so the same board,
//! actions and seed always produce the same result.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::Serialize;

use crate::board::{Board, Owner, Position, Territory, TurnActions, PLAYERS};
use crate::config::GameConfig;

use super::combat::{resolve_combat, CombatOutcome, CombatResult};
use super::expansion::{resolve_expansion, ExpansionResult};
use super::retreat::distribute_retreat;
use super::validate::{validate_turn, ActionError};

/// Stones a player moved into one of its own territories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reinforcement {
    pub destination: Position,
    pub player: Owner,
    pub stones: u32,
}

/// A neutral cell only one player moved into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UncontestedExpansion {
    pub destination: Position,
    pub result: ExpansionResult,
}

/// A neutral cell both players moved into.
///
/// Both sides roll their expansion independently. If both land they fight
/// it out; which of them takes the duel's "defender" seat (and so rolls
/// first) is decided by a fair coin, recorded in `first_roller`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContestedExpansion {
    pub destination: Position,
    pub player1: ExpansionResult,
    pub player2: ExpansionResult,
    pub first_roller: Option<Owner>,
    pub combat: Option<CombatResult>,
    pub winner: Owner,
    pub stones: u32,
}

/// An assault on an enemy territory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attack {
    pub destination: Position,
    pub attacker: Owner,
    /// Stones each source committed, in source order.
    pub contributions: Vec<(Position, u32)>,
    pub combat: CombatResult,
    /// Survivors sent back to each source after a failed attack.
    pub retreats: Vec<(Position, u32)>,
    /// Retreating stones whose source was captured this turn.
    pub retreat_lost: u32,
}

/// The board after a turn plus everything that happened along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResolution {
    pub board: Board,
    pub reinforcements: Vec<Reinforcement>,
    pub expansions: Vec<UncontestedExpansion>,
    pub contested: Vec<ContestedExpansion>,
    pub attacks: Vec<Attack>,
}

impl TurnResolution {
    /// True if no combat or expansion took place this turn.
    pub fn is_quiet(&self) -> bool {
        self.expansions.is_empty() && self.contested.is_empty() && self.attacks.is_empty()
    }
}

/// Per-destination inbound stones, split by seat, each seat's list keyed by
/// source.
type Inbound = BTreeMap<Position, [Vec<(Position, u32)>; 2]>;

/// Validates `actions` against `board` and resolves the turn.
///
/// Nothing is resolved if validation fails.
pub fn resolve_turn<R: Rng>(
    board: &Board,
    actions: &TurnActions,
    config: &GameConfig,
    rng: &mut R,
) -> Result<TurnResolution, ActionError> {
    validate_turn(board, actions)?;
    Ok(resolve_validated(board, actions, config, rng))
}

/// Resolves a turn that has already passed [`validate_turn`].
pub(crate) fn resolve_validated<R: Rng>(
    board: &Board,
    actions: &TurnActions,
    config: &GameConfig,
    rng: &mut R,
) -> TurnResolution {
    let size = board.size();
    let mut cells = board.to_cells();

    // Phase 1: departures.
    let mut inbound: Inbound = BTreeMap::new();
    for side in actions.both() {
        let Some(seat) = side.player.seat() else {
            continue;
        };
        for m in side.movements() {
            let src = m.source.index(size);
            cells[src] = cells[src].depleted(m.count);
            let sources = &mut inbound.entry(m.destination).or_default()[seat];
            match sources.iter_mut().find(|(p, _)| *p == m.source) {
                Some((_, n)) => *n += m.count,
                None => sources.push((m.source, m.count)),
            }
        }
    }
    for seats in inbound.values_mut() {
        for sources in seats.iter_mut() {
            sources.sort_unstable_by_key(|&(p, _)| p);
        }
    }

    // Classify against the post-departure board.
    let mut reinforce: Vec<(Position, Owner, u32)> = Vec::new();
    let mut expand: BTreeMap<Position, [u32; 2]> = BTreeMap::new();
    let mut attack: Vec<(Position, Owner, Vec<(Position, u32)>)> = Vec::new();

    for (dest, seats) in inbound {
        let occupant = cells[dest.index(size)];
        for (seat, sources) in seats.into_iter().enumerate() {
            if sources.is_empty() {
                continue;
            }
            let player = PLAYERS[seat];
            let total: u32 = sources.iter().map(|&(_, n)| n).sum();
            if occupant.is_owned_by(player) {
                reinforce.push((dest, player, total));
            } else if occupant.is_neutral() {
                expand.entry(dest).or_default()[seat] = total;
            } else {
                attack.push((dest, player, sources));
            }
        }
    }

    // Phase 2: reinforcements.
    let mut reinforcements = Vec::with_capacity(reinforce.len());
    for (dest, player, stones) in reinforce {
        let i = dest.index(size);
        cells[i] = cells[i].reinforced(stones);
        reinforcements.push(Reinforcement {
            destination: dest,
            player,
            stones,
        });
    }

    // Phase 3: expansions.
    let mut expansions = Vec::new();
    let mut contested = Vec::new();
    let mut resolved: BTreeSet<Position> = BTreeSet::new();
    let rate = config.expansion_success_rate;

    for (dest, [first, second]) in expand {
        let i = dest.index(size);
        match (first, second) {
            (0, 0) => {}
            (stones, 0) | (0, stones) => {
                let player = if first > 0 {
                    Owner::Player1
                } else {
                    Owner::Player2
                };
                let result = resolve_expansion(player, stones, rate, rng);
                if result.succeeded() {
                    cells[i] = Territory::new(player, result.surviving);
                }
                expansions.push(UncontestedExpansion {
                    destination: dest,
                    result,
                });
            }
            (a, b) => {
                let event = contest(dest, a, b, config, rng);
                cells[i] = Territory::new(event.winner, event.stones);
                contested.push(event);
            }
        }
        resolved.insert(dest);
    }

    // Phase 4: attacks.
    let mut attacks = Vec::with_capacity(attack.len());
    for (dest, attacker, contributions) in attack {
        if resolved.contains(&dest) {
            continue;
        }
        let i = dest.index(size);
        let garrison = cells[i];
        let total: u32 = contributions.iter().map(|&(_, n)| n).sum();
        let defender = attacker.opponent();
        debug_assert!(garrison.is_owned_by(defender), "attack on {dest} without a defender");

        let combat = resolve_combat(
            attacker,
            total,
            defender,
            garrison.stones(),
            config.combat_hit_chance,
            rng,
        );

        let mut retreats = Vec::new();
        let mut retreat_lost = 0;
        match combat.outcome {
            CombatOutcome::AttackerWins => {
                cells[i] = Territory::new(attacker, combat.attacker_surviving);
            }
            CombatOutcome::MutualDestruction => {
                cells[i] = Territory::NEUTRAL;
            }
            CombatOutcome::DefenderHolds => {
                cells[i] = Territory::new(defender, combat.defender_surviving);
                retreats = distribute_retreat(&contributions, combat.attacker_surviving);
                for &(source, stones) in &retreats {
                    if stones == 0 {
                        continue;
                    }
                    let j = source.index(size);
                    let home = cells[j];
                    if home.is_owned_by(attacker) {
                        cells[j] = home.reinforced(stones);
                    } else if home.is_neutral() {
                        cells[j] = Territory::new(attacker, stones);
                    } else {
                        retreat_lost += stones;
                    }
                }
            }
        }
        resolved.insert(dest);
        attacks.push(Attack {
            destination: dest,
            attacker,
            contributions,
            combat,
            retreats,
            retreat_lost,
        });
    }

    // Phase 5: cap.
    for cell in cells.iter_mut() {
        *cell = cell.capped(config.max_stones);
    }

    // Phase 6: growth.
    for side in actions.both() {
        for pos in side.growing() {
            let i = pos.index(size);
            if cells[i].is_owned_by(side.player) {
                cells[i] = cells[i]
                    .reinforced(config.growth_per_turn)
                    .capped(config.max_stones);
            }
        }
    }

    TurnResolution {
        board: Board::from_cells(size, cells),
        reinforcements,
        expansions,
        contested,
        attacks,
    }
}

/// Resolves a neutral cell both players moved into.
fn contest<R: Rng>(
    dest: Position,
    player1_stones: u32,
    player2_stones: u32,
    config: &GameConfig,
    rng: &mut R,
) -> ContestedExpansion {
    let rate = config.expansion_success_rate;
    let player1 = resolve_expansion(Owner::Player1, player1_stones, rate, rng);
    let player2 = resolve_expansion(Owner::Player2, player2_stones, rate, rng);

    let (first_roller, combat, winner, stones) = match (player1.succeeded(), player2.succeeded()) {
        (true, true) => {
            let first = if rng.gen_bool(0.5) {
                Owner::Player1
            } else {
                Owner::Player2
            };
            let (defender_stones, attacker_stones) = if first == Owner::Player1 {
                (player1_stones, player2_stones)
            } else {
                (player2_stones, player1_stones)
            };
            let combat = resolve_combat(
                first.opponent(),
                attacker_stones,
                first,
                defender_stones,
                config.combat_hit_chance,
                rng,
            );
            let winner = combat.victor();
            let stones = combat.victor_stones();
            (Some(first), Some(combat), winner, stones)
        }
        (true, false) => (None, None, Owner::Player1, player1_stones),
        (false, true) => (None, None, Owner::Player2, player2_stones),
        (false, false) => (None, None, Owner::Neutral, 0),
    };

    ContestedExpansion {
        destination: dest,
        player1,
        player2,
        first_roller,
        combat,
        winner,
        stones,
    }
}
