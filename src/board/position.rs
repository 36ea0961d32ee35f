//! Grid coordinates, orthogonal adjacency, and setup zones.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::owner::Owner;

/// A cell on the N x N grid.
///
/// Ordering is row-major, which is also the order in which the resolver
/// walks destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u16,
    pub col: u16,
}

impl Position {
    pub const fn new(row: u16, col: u16) -> Self {
        Position { row, col }
    }

    /// Returns true if the position lies on a `size` x `size` grid.
    pub const fn in_bounds(self, size: usize) -> bool {
        (self.row as usize) < size && (self.col as usize) < size
    }

    /// Row-major index into a `size` x `size` grid.
    pub const fn index(self, size: usize) -> usize {
        self.row as usize * size + self.col as usize
    }

    /// Inverse of [`Position::index`].
    pub const fn from_index(index: usize, size: usize) -> Self {
        Position {
            row: (index / size) as u16,
            col: (index % size) as u16,
        }
    }

    /// Orthogonal adjacency. Diagonals are not neighbors.
    pub const fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Orthogonal neighbors that lie on a `size` x `size` grid, in
    /// up, left, right, down order.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { row, col } = self;
        let up = row.checked_sub(1).map(|r| Position::new(r, col));
        let left = col.checked_sub(1).map(|c| Position::new(row, c));
        let right = Some(Position::new(row, col + 1));
        let down = Some(Position::new(row + 1, col));
        [up, left, right, down]
            .into_iter()
            .flatten()
            .filter(move |p| p.in_bounds(size))
    }

    /// Returns the player whose starting half contains this cell.
    ///
    /// With `T = size * size` cells and row-major index `i`, Player1 owns
    /// `2i + 1 < T` and Player2 owns `2i + 1 > T`. On odd boards the
    /// exact center satisfies neither and belongs to nobody.
    pub fn setup_zone(self, size: usize) -> Option<Owner> {
        if !self.in_bounds(size) {
            return None;
        }
        let total = size * size;
        let doubled = 2 * self.index(size) + 1;
        match doubled.cmp(&total) {
            std::cmp::Ordering::Less => Some(Owner::Player1),
            std::cmp::Ordering::Greater => Some(Owner::Player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns true if `player` may place its initial stones here.
    pub fn in_setup_zone(self, player: Owner, size: usize) -> bool {
        player.is_player() && self.setup_zone(size) == Some(player)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
