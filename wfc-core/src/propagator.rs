use crate::wave::WaveGrid;
use std::fmt::Debug;
use thiserror::Error;

mod singleton;

pub use singleton::SingletonPropagator;

/// Errors that can occur during the constraint propagation phase of WFC.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// A cell's domain became empty, or two committed neighbors disagree.
    /// Contains the (x, y) coordinates of the contradictory cell.
    #[error("Contradiction detected during propagation at ({0}, {1})")]
    Contradiction(usize, usize),
    /// Propagation must start from a committed cell.
    #[error("Propagation started from uncollapsed cell ({0}, {1})")]
    NotCollapsed(usize, usize),
    #[error("Propagation started outside the grid at ({0}, {1})")]
    OutOfBounds(usize, usize),
}

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors narrow the neighbors of a freshly committed cell so that
/// every remaining candidate is compatible with it, cascading as they see fit.
pub trait ConstraintPropagator: Send + Sync + Debug {
    /// Propagates constraints outward from the committed cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// * `PropagationError::Contradiction` if a neighbor runs out of candidates,
    ///   or is already committed to an incompatible tile.
    ///   The grid is left as it was at that point; it cannot be rolled back.
    /// * `PropagationError::NotCollapsed` if `(x, y)` is not committed.
    fn propagate(&self, grid: &mut WaveGrid, x: usize, y: usize) -> Result<(), PropagationError>;
}
