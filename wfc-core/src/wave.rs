use crate::grid::{Cell, Grid};
use crate::WfcError;
use log::trace;
#[cfg(feature = "serde")]
use serde::Serialize;
use std::sync::Arc;
use wfc_rules::{AdjacencyRules, Direction, Tile, TileCatalog, TileDefinition, TileId};

/// Largest cell count a grid may hold; `Vec<Cell>` cannot exceed `isize::MAX` bytes.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<Cell>();

/// Solver state: a fixed-size grid of cells over a shared tile catalog.
///
/// Cells only ever tighten: a domain shrinks, and a collapsed cell stays
/// collapsed. A grid that hit a contradiction cannot be repaired; build a new one.
#[derive(Debug, Clone)]
pub struct WaveGrid {
    cells: Grid<Cell>,
    catalog: Arc<TileCatalog>,
    rules: AdjacencyRules,
    /// Cells not yet `Collapsed`.
    undetermined: usize,
}

/// Outcome of filtering one neighbor against a committed tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Restriction {
    /// Domain size did not change (or the collapsed neighbor is compatible).
    Unchanged,
    /// Domain shrank but still has more than one candidate.
    Narrowed { before: usize, after: usize },
    /// Domain shrank to one candidate. The neighbor is not committed yet.
    Forced(TileId),
    /// Domain became empty; the neighbor is now a contradiction.
    Emptied,
    /// The neighbor was already collapsed to an incompatible tile.
    Conflict,
}

impl WaveGrid {
    /// Creates a grid where every cell may still hold any catalog tile.
    ///
    /// # Errors
    ///
    /// Returns `WfcError::Configuration` for a zero dimension, a cell count
    /// that cannot be allocated, or an empty catalog.
    pub fn new(width: usize, height: usize, catalog: Arc<TileCatalog>) -> Result<Self, WfcError> {
        if width == 0 || height == 0 {
            return Err(WfcError::Configuration(format!(
                "Grid dimensions must be positive, got {width}x{height}"
            )));
        }
        let total = width
            .checked_mul(height)
            .filter(|&total| total <= MAX_CELLS)
            .ok_or_else(|| {
                WfcError::Configuration(format!("Grid dimensions {width}x{height} are too large"))
            })?;
        if catalog.is_empty() {
            return Err(WfcError::Configuration(
                "Tile catalog must not be empty".to_string(),
            ));
        }
        let rules = AdjacencyRules::from_catalog(&catalog);
        let cells = Grid::filled(width, height, Cell::full(catalog.len()));
        Ok(Self {
            cells,
            catalog,
            rules,
            undetermined: total,
        })
    }

    /// Builds the catalog from raw definitions, then the grid.
    ///
    /// # Errors
    ///
    /// `Configuration` for an empty list or bad dimensions, `TileSetError`
    /// for an invalid weight.
    pub fn from_definitions(
        width: usize,
        height: usize,
        definitions: Vec<TileDefinition>,
    ) -> Result<Self, WfcError> {
        if definitions.is_empty() {
            return Err(WfcError::Configuration(
                "Tile catalog must not be empty".to_string(),
            ));
        }
        let catalog = TileCatalog::new(definitions)?;
        Self::new(width, height, Arc::new(catalog))
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn total_cells(&self) -> usize {
        self.cells.width * self.cells.height
    }

    pub fn catalog(&self) -> &Arc<TileCatalog> {
        &self.catalog
    }

    pub fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(x, y)
    }

    /// Number of cells not yet committed (including contradictory ones).
    pub fn undetermined_cells(&self) -> usize {
        self.undetermined
    }

    pub fn collapsed_cells(&self) -> usize {
        self.total_cells() - self.undetermined
    }

    /// True once every cell holds exactly one tile.
    pub fn is_complete(&self) -> bool {
        self.undetermined == 0
    }

    /// True if any cell ran out of candidates.
    pub fn has_contradiction(&self) -> bool {
        self.cells
            .iter()
            .any(|(_, cell)| matches!(cell, Cell::Contradiction))
    }

    /// The tile committed at `(x, y)`.
    ///
    /// # Errors
    ///
    /// `NotCollapsed` if the cell is still undetermined; renderers usually skip such cells.
    pub fn committed_tile(&self, x: usize, y: usize) -> Result<&Tile, WfcError> {
        match self.cell(x, y) {
            None => Err(WfcError::OutOfBounds(x, y)),
            Some(Cell::Collapsed(id)) => self.tile(*id),
            Some(_) => Err(WfcError::NotCollapsed(x, y)),
        }
    }

    /// Candidate tiles at `(x, y)`, in catalog order. Empty for a contradictory cell.
    ///
    /// # Errors
    ///
    /// `AlreadyCollapsed` once the cell is committed.
    pub fn domain(&self, x: usize, y: usize) -> Result<Vec<&Tile>, WfcError> {
        match self.cell(x, y) {
            None => Err(WfcError::OutOfBounds(x, y)),
            Some(Cell::Collapsed(_)) => Err(WfcError::AlreadyCollapsed(x, y)),
            Some(cell) => cell.candidates().into_iter().map(|id| self.tile(id)).collect(),
        }
    }

    /// Serializable view of every cell, rows top to bottom.
    pub fn snapshot(&self) -> GridSnapshot {
        let name = |id: TileId| {
            self.catalog
                .get(id)
                .map_or_else(|| format!("#{id}"), |tile| tile.name().to_string())
        };
        let rows = (0..self.height())
            .map(|y| {
                (0..self.width())
                    .map(|x| match self.cell(x, y) {
                        Some(Cell::Collapsed(id)) => CellSnapshot::Collapsed {
                            id: id.0,
                            tile: name(*id),
                        },
                        Some(Cell::Uncollapsed(domain)) => CellSnapshot::Undetermined {
                            candidates: domain.iter_ones().map(|i| name(TileId(i))).collect(),
                        },
                        Some(Cell::Contradiction) | None => CellSnapshot::Contradiction,
                    })
                    .collect()
            })
            .collect();
        GridSnapshot {
            width: self.width(),
            height: self.height(),
            complete: self.is_complete(),
            rows,
        }
    }

    fn tile(&self, id: TileId) -> Result<&Tile, WfcError> {
        self.catalog
            .get(id)
            .ok_or_else(|| WfcError::Configuration(format!("Tile id {id} is not in the catalog")))
    }

    /// Commits an uncollapsed cell to `tile` without propagating.
    pub(crate) fn commit(&mut self, x: usize, y: usize, tile: TileId) -> Result<(), WfcError> {
        let cell = self.cells.get_mut(x, y).ok_or(WfcError::OutOfBounds(x, y))?;
        match cell {
            Cell::Collapsed(_) => return Err(WfcError::AlreadyCollapsed(x, y)),
            Cell::Contradiction => return Err(WfcError::Contradiction(x, y)),
            Cell::Uncollapsed(domain) => {
                if !domain.get(tile.0).is_some_and(|bit| *bit) {
                    return Err(WfcError::TileNotInDomain { x, y, tile });
                }
            }
        }
        *cell = Cell::Collapsed(tile);
        self.undetermined -= 1;
        Ok(())
    }

    /// Filters the neighbor at `(nx, ny)` so that every remaining candidate fits
    /// on the `direction` side of `source`.
    pub(crate) fn restrict_neighbor(
        &mut self,
        source: TileId,
        direction: Direction,
        nx: usize,
        ny: usize,
    ) -> Restriction {
        let Self { cells, rules, .. } = self;
        let Some(cell) = cells.get_mut(nx, ny) else {
            return Restriction::Unchanged;
        };

        let (before, after) = match cell {
            Cell::Collapsed(existing) => {
                return if rules.check(source, *existing, direction) {
                    Restriction::Unchanged
                } else {
                    Restriction::Conflict
                };
            }
            Cell::Contradiction => return Restriction::Emptied,
            Cell::Uncollapsed(domain) => {
                let before = domain.count_ones();
                let rejected: Vec<usize> = domain
                    .iter_ones()
                    .filter(|&index| !rules.check(source, TileId(index), direction))
                    .collect();
                for index in rejected {
                    domain.set(index, false);
                }
                (before, domain.count_ones())
            }
        };

        if after == before {
            return Restriction::Unchanged;
        }
        trace!("Cell ({nx}, {ny}) domain {before} -> {after} from {direction:?} of tile {source}");
        match after {
            0 => {
                *cell = Cell::Contradiction;
                Restriction::Emptied
            }
            1 => cell
                .candidates()
                .first()
                .map_or(Restriction::Emptied, |&only| Restriction::Forced(only)),
            _ => Restriction::Narrowed { before, after },
        }
    }
}

/// Snapshot of a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum CellSnapshot {
    Collapsed { id: usize, tile: String },
    Undetermined { candidates: Vec<String> },
    Contradiction,
}

/// Snapshot of a whole grid, for debugging output and visualization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub complete: bool,
    /// `rows[y][x]`
    pub rows: Vec<Vec<CellSnapshot>>,
}
