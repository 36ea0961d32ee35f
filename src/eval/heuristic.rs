//! Heuristic position evaluation.
//!
//! Scores a board from one player's perspective using handcrafted
//! features: territory count, stone count, exposed territories and room to
//! expand. Scores are zero-sum: `evaluate(p1, b) == -evaluate(p2, b)`.

use std::collections::HashSet;

use crate::board::{Board, Owner, Position};
use crate::game::territory_leader;
use crate::movegen::threat;

/// Score of a decided game, before the territory margin is added.
pub const WIN_SCORE: f32 = 1000.0;

const TERRITORY_WEIGHT: f32 = 10.0;
const STONE_WEIGHT: f32 = 1.0;
const EXPOSURE_WEIGHT: f32 = 2.0;
const FRONTIER_WEIGHT: f32 = 0.5;

/// One player's half of the evaluation.
fn side_score(player: Owner, board: &Board) -> f32 {
    let mut score = 0.0;
    let mut frontier: HashSet<Position> = HashSet::new();

    for (pos, territory) in board.owned_by(player) {
        score += TERRITORY_WEIGHT + STONE_WEIGHT * territory.stones() as f32;

        // Under-garrisoned next to a bigger enemy pile.
        let danger = threat(board, pos, player);
        if danger > territory.stones() {
            score -= EXPOSURE_WEIGHT * (danger - territory.stones()) as f32;
        }

        frontier.extend(board.neighbors(pos).filter(|&n| board.territory(n).is_neutral()));
    }

    score + FRONTIER_WEIGHT * frontier.len() as f32
}

/// Evaluates a non-terminal board for `player`.
pub fn evaluate(player: Owner, board: &Board) -> f32 {
    side_score(player, board) - side_score(player.opponent(), board)
}

/// Evaluates a finished game for `player`: a win or loss dominates any
/// positional score, and the territory margin breaks ties between wins.
pub fn evaluate_terminal(player: Owner, board: &Board) -> f32 {
    let margin =
        board.territory_count(player) as f32 - board.territory_count(player.opponent()) as f32;
    match territory_leader(board) {
        Some(winner) if winner == player => WIN_SCORE + margin,
        Some(_) => -WIN_SCORE + margin,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Territory;

    fn p(r: u16, c: u16) -> Position {
        Position::new(r, c)
    }

    #[test]
    fn symmetric_board_scores_zero() {
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 2)),
            (p(2, 2), Territory::new(Owner::Player2, 2)),
        ]);
        assert_eq!(evaluate(Owner::Player1, &board), 0.0);
    }

    #[test]
    fn zero_sum() {
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 5)),
            (p(0, 1), Territory::new(Owner::Player1, 1)),
            (p(2, 2), Territory::new(Owner::Player2, 2)),
        ]);
        let a = evaluate(Owner::Player1, &board);
        let b = evaluate(Owner::Player2, &board);
        assert!(a > 0.0);
        assert_eq!(a, -b);
    }

    #[test]
    fn more_territory_beats_more_stones() {
        let spread = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 1)),
            (p(0, 2), Territory::new(Owner::Player1, 1)),
            (p(2, 2), Territory::new(Owner::Player2, 3)),
        ]);
        assert!(evaluate(Owner::Player1, &spread) > 0.0);
    }

    #[test]
    fn exposure_is_penalised() {
        let safe = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 2)),
            (p(2, 2), Territory::new(Owner::Player2, 6)),
        ]);
        let exposed = Board::empty(3).with_territories([
            (p(1, 2), Territory::new(Owner::Player1, 2)),
            (p(2, 2), Territory::new(Owner::Player2, 6)),
        ]);
        assert!(evaluate(Owner::Player1, &exposed) < evaluate(Owner::Player1, &safe));
    }

    #[test]
    fn terminal_scores() {
        let board = Board::empty(3).with_territories([
            (p(0, 0), Territory::new(Owner::Player1, 1)),
            (p(0, 1), Territory::new(Owner::Player1, 1)),
            (p(2, 2), Territory::new(Owner::Player2, 9)),
        ]);
        assert_eq!(evaluate_terminal(Owner::Player1, &board), WIN_SCORE + 1.0);
        assert_eq!(evaluate_terminal(Owner::Player2, &board), -WIN_SCORE - 1.0);
        assert_eq!(evaluate_terminal(Owner::Player1, &Board::empty(3)), 0.0);
    }
}
