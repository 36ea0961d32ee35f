//! Filtered, ordered candidate generation for search.
//!
//! Each territory gets a short list of sensible actions, best first:
//! expansion into neutral ground, then attacks with a stone advantage, then
//! reinforcements that lift a threatened neighbour, then staying put.
//! Dominated options are dropped before search ever sees them. Player-level
//! turns are assembled from these lists: the greedy turn first, then turns
//! that deviate from it at a single territory.

use std::collections::HashSet;

use crate::board::{Board, Owner, PlayerTurnActions, Position, TerritoryAction};

/// Why a candidate was generated. Ordered by search priority, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CandidateKind {
    Stay,
    Reinforce,
    Attack,
    Expand,
}

/// A per-territory action with its ordering key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAction {
    pub action: TerritoryAction,
    pub kind: CandidateKind,
    pub score: f32,
}

impl ScoredAction {
    fn priority_cmp(&self, other: &ScoredAction) -> std::cmp::Ordering {
        other.kind.cmp(&self.kind).then_with(|| {
            other
                .score
                .partial_cmp(&self.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Largest enemy pile adjacent to `pos` from `player`'s point of view.
pub fn threat(board: &Board, pos: Position, player: Owner) -> u32 {
    board
        .neighbors(pos)
        .map(|n| board.territory(n))
        .filter(|t| t.is_owned_by(player.opponent()))
        .map(|t| t.stones())
        .max()
        .unwrap_or(0)
}

/// Neutral cells around `pos`, not counting `except`.
fn open_neighbors(board: &Board, pos: Position, except: Position) -> usize {
    board
        .neighbors(pos)
        .filter(|&n| n != except && board.territory(n).is_neutral())
        .count()
}

/// Scored candidates for the territory at `pos`, best first. Staying put is
/// always present, so the list is never empty for an owned territory.
pub fn territory_candidates(board: &Board, pos: Position) -> Vec<ScoredAction> {
    let territory = board.territory(pos);
    let player = territory.owner();
    if !player.is_player() {
        return Vec::new();
    }

    let mut out = vec![ScoredAction {
        action: TerritoryAction::grow(pos),
        kind: CandidateKind::Stay,
        score: 0.0,
    }];
    let stones = territory.stones();
    if stones < 2 {
        return out;
    }
    let spare = stones - 1;

    for n in board.neighbors(pos) {
        let target = board.territory(n);
        if target.is_neutral() {
            out.push(ScoredAction {
                action: TerritoryAction::move_to(pos, n, spare),
                kind: CandidateKind::Expand,
                score: open_neighbors(board, n, pos) as f32 + spare as f32 * 0.1,
            });
        } else if target.is_owned_by(player) {
            let danger = threat(board, n, player);
            if danger >= target.stones() && target.stones() + spare > danger {
                out.push(ScoredAction {
                    action: TerritoryAction::move_to(pos, n, spare),
                    kind: CandidateKind::Reinforce,
                    score: danger as f32,
                });
            }
        } else {
            let defenders = target.stones();
            let send = if spare > defenders { spare } else { stones };
            if send > defenders {
                out.push(ScoredAction {
                    action: TerritoryAction::move_to(pos, n, send),
                    kind: CandidateKind::Attack,
                    score: (send - defenders) as f32 + 1.0 / defenders as f32,
                });
            }
        }
    }

    out.sort_by(|a, b| a.priority_cmp(b));
    out
}

/// One action per territory: each territory's top candidate.
pub fn greedy_turn(board: &Board, player: Owner) -> PlayerTurnActions {
    let actions = board
        .owned_by(player)
        .filter_map(|(pos, _)| territory_candidates(board, pos).into_iter().next())
        .map(|c| c.action)
        .collect();
    PlayerTurnActions::new(player, actions)
}

/// Up to `limit` distinct turns for `player`, most promising first.
///
/// The greedy turn comes first, then every single-territory deviation from
/// it ordered by the deviating candidate's priority, and finally the
/// all-GROW turn if it is not already present. A player with no territories
/// gets one empty turn.
pub fn candidate_turns(board: &Board, player: Owner, limit: usize) -> Vec<PlayerTurnActions> {
    let limit = limit.max(1);
    let per_territory: Vec<Vec<ScoredAction>> = board
        .owned_by(player)
        .map(|(pos, _)| territory_candidates(board, pos))
        .collect();

    let greedy: Vec<TerritoryAction> = per_territory.iter().map(|c| c[0].action.clone()).collect();

    let mut deviations: Vec<(usize, &ScoredAction)> = per_territory
        .iter()
        .enumerate()
        .flat_map(|(i, cands)| cands.iter().skip(1).map(move |c| (i, c)))
        .collect();
    deviations.sort_by(|a, b| a.1.priority_cmp(b.1));

    let mut turns: Vec<Vec<TerritoryAction>> = vec![greedy.clone()];
    let mut seen: HashSet<Vec<TerritoryAction>> = HashSet::new();
    seen.insert(greedy.clone());

    for (i, cand) in deviations {
        if turns.len() >= limit {
            break;
        }
        let mut turn = greedy.clone();
        turn[i] = cand.action.clone();
        if seen.insert(turn.clone()) {
            turns.push(turn);
        }
    }

    if turns.len() < limit {
        let hold: Vec<TerritoryAction> = board
            .owned_by(player)
            .map(|(pos, _)| TerritoryAction::grow(pos))
            .collect();
        if seen.insert(hold.clone()) {
            turns.push(hold);
        }
    }

    turns
        .into_iter()
        .map(|actions| PlayerTurnActions::new(player, actions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Territory, TurnActions};
    use crate::resolve::validate_player;

    fn p(r: u16, c: u16) -> Position {
        Position::new(r, c)
    }

    #[test]
    fn single_stone_territory_only_stays() {
        let board = Board::empty(3).with_territories([
            (p(1, 1), Territory::new(Owner::Player1, 1)),
            (p(1, 2), Territory::new(Owner::Player2, 1)),
        ]);
        let cands = territory_candidates(&board, p(1, 1));
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].kind, CandidateKind::Stay);
        for turn in candidate_turns(&board, Owner::Player1, 10) {
            assert!(turn.actions.iter().all(TerritoryAction::is_grow));
        }
    }

    #[test]
    fn expansion_ranks_above_stay_and_prefers_open_space() {
        // (0, 1) leads to two more neutral cells; (1, 0) leads to one
        // neutral cell and an enemy.
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 3)),
            (p(2, 0), Territory::new(Owner::Player2, 1)),
        ]);
        let cands = territory_candidates(&board, p(0, 0));
        assert_eq!(cands[0].kind, CandidateKind::Expand);
        assert_eq!(cands[0].action, TerritoryAction::move_to(p(0, 0), p(0, 1), 2));
        assert_eq!(cands.last().map(|c| c.kind), Some(CandidateKind::Stay));
    }

    #[test]
    fn attacks_need_an_advantage() {
        let board = Board::empty(3).with_territories([
            (p(1, 1), Territory::new(Owner::Player1, 3)),
            (p(0, 1), Territory::new(Owner::Player2, 3)),
            (p(1, 0), Territory::new(Owner::Player2, 2)),
            (p(1, 2), Territory::new(Owner::Player2, 5)),
            (p(2, 1), Territory::new(Owner::Player2, 1)),
        ]);
        let attacks: Vec<_> = territory_candidates(&board, p(1, 1))
            .into_iter()
            .filter(|c| c.kind == CandidateKind::Attack)
            .map(|c| c.action)
            .collect();
        assert_eq!(
            attacks,
            vec![
                TerritoryAction::move_to(p(1, 1), p(2, 1), 2),
                TerritoryAction::move_to(p(1, 1), p(1, 0), 3),
            ]
        );
    }

    #[test]
    fn reinforcement_only_when_it_resolves_a_threat() {
        // (0, 1) holds 2 next to an enemy 3: reinforcing with 2 fixes it.
        // (1, 0) holds 4 and is not threatened.
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 3)),
            (p(0, 1), Territory::new(Owner::Player1, 2)),
            (p(1, 0), Territory::new(Owner::Player1, 4)),
            (p(0, 2), Territory::new(Owner::Player2, 3)),
        ]);
        let reinforcements: Vec<_> = territory_candidates(&board, p(0, 0))
            .into_iter()
            .filter(|c| c.kind == CandidateKind::Reinforce)
            .map(|c| c.action)
            .collect();
        assert_eq!(
            reinforcements,
            vec![TerritoryAction::move_to(p(0, 0), p(0, 1), 2)]
        );
    }

    #[test]
    fn candidate_turns_are_valid_distinct_and_bounded() {
        let board = Board::empty(4).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 4)),
            (p(0, 1), Territory::new(Owner::Player1, 2)),
            (p(1, 0), Territory::new(Owner::Player1, 1)),
            (p(3, 3), Territory::new(Owner::Player2, 3)),
        ]);
        let turns = candidate_turns(&board, Owner::Player1, 6);
        assert!(!turns.is_empty() && turns.len() <= 6);
        assert_eq!(turns[0], greedy_turn(&board, Owner::Player1));
        let distinct: HashSet<_> = turns.iter().map(|t| t.actions.clone()).collect();
        assert_eq!(distinct.len(), turns.len());
        for turn in &turns {
            validate_player(&board, turn, Owner::Player1).unwrap();
        }
    }

    #[test]
    fn limit_of_one_is_greedy() {
        let board = Board::empty(3).with_territory(p(0, 0), Territory::new(Owner::Player1, 3));
        let turns = candidate_turns(&board, Owner::Player1, 1);
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0], greedy_turn(&board, Owner::Player1));
    }

    #[test]
    fn eliminated_player_gets_an_empty_turn() {
        let board = Board::empty(3).with_territory(p(0, 0), Territory::new(Owner::Player1, 3));
        let turns = candidate_turns(&board, Owner::Player2, 4);
        assert_eq!(turns.len(), 1);
        assert!(turns[0].actions.is_empty());
        let both = TurnActions::new(0, greedy_turn(&board, Owner::Player1), turns[0].clone());
        crate::resolve::validate_turn(&board, &both).unwrap();
    }
}
