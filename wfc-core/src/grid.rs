use crate::BoundaryMode;
use bitvec::prelude::*;
use wfc_rules::{Direction, TileId};

/// Dense 2D array stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a new grid with every element set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Iterates `((x, y), &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, value)| ((idx % width, idx / width), value))
    }

    /// Coordinates of the neighbor on the `direction` side, if any.
    ///
    /// `Clamped` returns `None` past the edge; `Periodic` wraps around.
    pub fn neighbor(
        &self,
        x: usize,
        y: usize,
        direction: Direction,
        boundary_mode: BoundaryMode,
    ) -> Option<(usize, usize)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (dx, dy) = direction.offset();
        let nx_raw = x as isize + dx;
        let ny_raw = y as isize + dy;

        match boundary_mode {
            BoundaryMode::Clamped => {
                if nx_raw >= 0
                    && nx_raw < self.width as isize
                    && ny_raw >= 0
                    && ny_raw < self.height as isize
                {
                    Some((nx_raw as usize, ny_raw as usize))
                } else {
                    None
                }
            }
            BoundaryMode::Periodic => Some((
                nx_raw.rem_euclid(self.width as isize) as usize,
                ny_raw.rem_euclid(self.height as isize) as usize,
            )),
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

/// State of one grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Candidate tiles still possible here, as a bitset over catalog indices.
    /// Never empty; an emptied domain becomes `Contradiction`.
    Uncollapsed(BitVec),
    /// Committed to exactly one tile. Terminal.
    Collapsed(TileId),
    /// Every candidate was eliminated. Terminal; the grid cannot complete.
    Contradiction,
}

impl Cell {
    /// A cell that may still become any of `num_tiles` tiles.
    pub fn full(num_tiles: usize) -> Self {
        Self::Uncollapsed(bitvec![1; num_tiles])
    }

    /// Domain size; 0 for collapsed or contradictory cells.
    pub fn entropy(&self) -> usize {
        match self {
            Self::Uncollapsed(domain) => domain.count_ones(),
            Self::Collapsed(_) | Self::Contradiction => 0,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Collapsed(_))
    }

    pub fn collapsed_tile(&self) -> Option<TileId> {
        match self {
            Self::Collapsed(tile) => Some(*tile),
            _ => None,
        }
    }

    /// Candidate ids in catalog order; empty unless uncollapsed.
    pub fn candidates(&self) -> Vec<TileId> {
        match self {
            Self::Uncollapsed(domain) => domain.iter_ones().map(TileId).collect(),
            Self::Collapsed(_) | Self::Contradiction => Vec::new(),
        }
    }
}
