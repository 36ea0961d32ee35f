//! Immutable board snapshot.
//!
//! A `Board` is a total mapping from every grid position to a territory.
//! Cells live behind an `Arc`, so cloning a board is a pointer copy and the
//! search can keep one board per explored branch alive at once. Every update
//! builds a new board; the original stays valid.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::owner::Owner;
use super::position::Position;
use super::territory::Territory;

/// Complete territory layout at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    size: usize,
    cells: Arc<[Territory]>,
}

impl Board {
    /// Creates an all-neutral `size` x `size` board.
    pub fn empty(size: usize) -> Self {
        Board {
            size,
            cells: vec![Territory::NEUTRAL; size * size].into(),
        }
    }

    /// Builds a board from row-major cells.
    ///
    /// Panics if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<Territory>) -> Self {
        assert_eq!(
            cells.len(),
            size * size,
            "board of size {size} needs {} cells",
            size * size
        );
        Board {
            size,
            cells: cells.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
    }

    /// Returns the territory at `pos`, or None if off the board.
    pub fn get(&self, pos: Position) -> Option<Territory> {
        if self.contains(pos) {
            Some(self.cells[pos.index(self.size)])
        } else {
            None
        }
    }

    /// Returns the territory at `pos`. Off-board positions read as neutral.
    pub fn territory(&self, pos: Position) -> Territory {
        self.get(pos).unwrap_or(Territory::NEUTRAL)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| Position::from_index(i, self.size))
    }

    /// Every (position, territory) pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Territory)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (Position::from_index(i, self.size), *t))
    }

    /// Territories held by `player`, in row-major order.
    pub fn owned_by(&self, player: Owner) -> impl Iterator<Item = (Position, Territory)> + '_ {
        self.iter().filter(move |(_, t)| t.is_owned_by(player))
    }

    pub fn territory_count(&self, player: Owner) -> usize {
        self.owned_by(player).count()
    }

    pub fn stone_count(&self, player: Owner) -> u32 {
        self.owned_by(player).map(|(_, t)| t.stones()).sum()
    }

    pub fn total_stones(&self) -> u32 {
        self.cells.iter().map(|t| t.stones()).sum()
    }

    /// On-board orthogonal neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> {
        pos.neighbors(self.size)
    }

    /// Returns a new board with `pos` replaced.
    ///
    /// Panics if `pos` is off the board.
    pub fn with_territory(&self, pos: Position, territory: Territory) -> Board {
        self.with_territories([(pos, territory)])
    }

    /// Returns a new board with several cells replaced in one copy.
    pub fn with_territories<I>(&self, updates: I) -> Board
    where
        I: IntoIterator<Item = (Position, Territory)>,
    {
        let mut cells = self.to_cells();
        for (pos, territory) in updates {
            assert!(self.contains(pos), "{pos} is off a {0}x{0} board", self.size);
            cells[pos.index(self.size)] = territory;
        }
        Board::from_cells(self.size, cells)
    }

    /// Copies the cells out for batch editing.
    pub fn to_cells(&self) -> Vec<Territory> {
        self.cells.to_vec()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: Vec<String> = row
                .iter()
                .map(|t| {
                    if t.is_neutral() {
                        ".".to_string()
                    } else {
                        format!("{}{}", t.owner().glyph(), t.stones())
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
