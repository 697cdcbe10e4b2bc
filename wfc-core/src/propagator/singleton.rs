use crate::{
    grid::Cell,
    propagator::{ConstraintPropagator, PropagationError},
    wave::{Restriction, WaveGrid},
    BoundaryMode,
};
use log::{trace, warn};
use std::collections::VecDeque;
use wfc_rules::Direction;

/// Propagator that only cascades through cells it forces to a single tile.
///
/// Neighbors of a committed cell are filtered against its facing edge label.
/// A neighbor left with one candidate is queued, then committed and filtered
/// from in turn; one left with several keeps its narrowed domain and is not
/// revisited. Committed neighbors are checked for compatibility instead.
///
/// A cell is committed only when it is dequeued, right before it filters its
/// own neighbors, so every commit sees the constraints of all earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingletonPropagator {
    boundary_mode: BoundaryMode,
}

impl SingletonPropagator {
    pub fn new(boundary_mode: BoundaryMode) -> Self {
        Self { boundary_mode }
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }
}

impl ConstraintPropagator for SingletonPropagator {
    fn propagate(&self, grid: &mut WaveGrid, x: usize, y: usize) -> Result<(), PropagationError> {
        match grid.cell(x, y) {
            None => return Err(PropagationError::OutOfBounds(x, y)),
            Some(Cell::Collapsed(_)) => {}
            Some(_) => return Err(PropagationError::NotCollapsed(x, y)),
        }

        // A cell is queued only when its domain first shrinks to one candidate.
        let mut queue = VecDeque::from([(x, y)]);
        let mut forced = 0usize;

        while let Some((cx, cy)) = queue.pop_front() {
            let tile = match grid.cell(cx, cy) {
                Some(Cell::Collapsed(tile)) => *tile,
                Some(cell @ Cell::Uncollapsed(_)) => {
                    let Some(&only) = cell.candidates().first() else {
                        return Err(PropagationError::Contradiction(cx, cy));
                    };
                    grid.commit(cx, cy, only)
                        .map_err(|_| PropagationError::Contradiction(cx, cy))?;
                    trace!("Propagation forced ({cx}, {cy}) to tile {only}");
                    forced += 1;
                    only
                }
                Some(Cell::Contradiction) | None => {
                    return Err(PropagationError::Contradiction(cx, cy));
                }
            };
            for direction in Direction::ALL {
                let Some((nx, ny)) = grid.cells().neighbor(cx, cy, direction, self.boundary_mode)
                else {
                    continue;
                };
                match grid.restrict_neighbor(tile, direction, nx, ny) {
                    Restriction::Forced(_) => queue.push_back((nx, ny)),
                    Restriction::Emptied | Restriction::Conflict => {
                        warn!("Contradiction at ({nx}, {ny}) while propagating from ({x}, {y})");
                        return Err(PropagationError::Contradiction(nx, ny));
                    }
                    Restriction::Unchanged | Restriction::Narrowed { .. } => {}
                }
            }
        }

        trace!("Propagation from ({x}, {y}) forced {forced} cells");
        Ok(())
    }
}
