//! Per-territory action enumeration.
//!
//! Not every legal action is generated. Moves carry either the whole pile
//! or all but one stone, plus one even split across neutral neighbours;
//! arbitrary counts add branching without adding ideas. A territory with a
//! single stone is only ever offered GROW.

use crate::board::{Board, Position, TerritoryAction};

/// Returns the actions generated for the territory at `pos`.
///
/// Empty for neutral or off-board positions; otherwise GROW comes first.
pub fn legal_actions(board: &Board, pos: Position) -> Vec<TerritoryAction> {
    let Some(territory) = board.get(pos) else {
        return Vec::new();
    };
    if territory.is_neutral() {
        return Vec::new();
    }

    let stones = territory.stones();
    let mut actions = vec![TerritoryAction::grow(pos)];
    if stones < 2 {
        return actions;
    }

    for n in board.neighbors(pos) {
        actions.push(TerritoryAction::move_to(pos, n, stones));
        actions.push(TerritoryAction::move_to(pos, n, stones - 1));
    }

    let open: Vec<Position> = board
        .neighbors(pos)
        .filter(|&n| board.territory(n).is_neutral())
        .collect();
    if open.len() >= 2 && stones as usize >= open.len() {
        actions.push(even_split(pos, &open, stones));
    }

    actions
}

/// Spreads `stones` over `targets` as evenly as possible; earlier targets
/// take the remainder.
pub(crate) fn even_split(source: Position, targets: &[Position], stones: u32) -> TerritoryAction {
    let k = targets.len() as u32;
    let base = stones / k;
    let extra = stones % k;
    let parts: Vec<(Position, u32)> = targets
        .iter()
        .enumerate()
        .map(|(i, &t)| (t, base + u32::from((i as u32) < extra)))
        .collect();
    TerritoryAction::split(source, &parts)
}
