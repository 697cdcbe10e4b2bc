//! Core library for the edge-matching Wave Function Collapse solver.
//!
//! A [`WaveGrid`] starts with every cell able to hold any tile of a
//! [`wfc_rules::TileCatalog`]. Each step picks the most constrained cell
//! ([`CellSelector`]), commits it to a weighted random tile ([`collapse`]) and
//! narrows its neighbors ([`ConstraintPropagator`]) until the grid is complete
//! or a cell runs out of candidates.

use std::time::Duration;
use thiserror::Error;
use wfc_rules::{TileId, TileSetError};

/// Weighted tile choice and forced commits.
pub mod collapse;
/// Cell selection strategies.
pub mod entropy;
/// Generic 2D grid and per-cell state.
pub mod grid;
/// Constraint propagation logic and traits.
pub mod propagator;
/// Step and run drivers.
pub mod runner;
/// The solver's grid state and read-only queries.
pub mod wave;

pub use crate::collapse::{choose_weighted, collapse, force_collapse};
pub use crate::entropy::{CellSelector, MinimumRemainingValues, ScanOrder};
pub use crate::grid::{Cell, Grid};
pub use crate::propagator::{ConstraintPropagator, PropagationError, SingletonPropagator};
pub use crate::runner::{run_to_completion, step_once, RunReport, StepResult, WfcConfig};
pub use crate::wave::{CellSnapshot, GridSnapshot, WaveGrid};

/// Errors that can occur while building or solving a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WfcError {
    /// Invalid grid or catalog parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A cell lost all of its candidates. Includes the (x, y) of the cell.
    #[error("Contradiction: cell ({0}, {1}) has no possible tiles left")]
    Contradiction(usize, usize),
    /// A committed tile was requested from a cell that is still undetermined.
    #[error("Cell ({0}, {1}) is not collapsed yet")]
    NotCollapsed(usize, usize),
    /// A domain was requested, or a collapse attempted, on a committed cell.
    #[error("Cell ({0}, {1}) is already collapsed")]
    AlreadyCollapsed(usize, usize),
    #[error("Coordinates ({0}, {1}) are outside the grid")]
    OutOfBounds(usize, usize),
    /// A forced collapse named a tile the cell can no longer hold.
    #[error("Tile {tile} is not a candidate for cell ({x}, {y})")]
    TileNotInDomain { x: usize, y: usize, tile: TileId },
    /// The run hit its step limit before completing.
    #[error("Maximum iterations ({0}) reached")]
    MaxIterationsReached(u64),
    /// The progress callback asked the run to stop.
    #[error("Progress callback error: {0}")]
    ProgressCallback(String),
    /// An error occurred validating the tile catalog.
    #[error("TileSet configuration error: {0}")]
    TileSetError(#[from] TileSetError),
    /// Propagation failed for a reason other than a contradiction.
    #[error("Propagation error: {0}")]
    Propagation(PropagationError),
}

impl From<PropagationError> for WfcError {
    fn from(error: PropagationError) -> Self {
        match error {
            PropagationError::Contradiction(x, y) => Self::Contradiction(x, y),
            other => Self::Propagation(other),
        }
    }
}

/// Information about the current state of a run, passed to the progress callback.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Cells committed so far, including ones forced by propagation.
    pub collapsed_cells: usize,
    pub total_cells: usize,
    /// Time elapsed since the run started.
    pub elapsed_time: Duration,
    /// Steps completed so far.
    pub iterations: u64,
}

/// How the grid edges behave during propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BoundaryMode {
    /// Border cells have no neighbor past the edge.
    #[default]
    Clamped,
    /// Edges wrap around (toroidal topology).
    Periodic,
}
