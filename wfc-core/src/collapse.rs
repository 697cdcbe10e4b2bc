use crate::grid::Cell;
use crate::propagator::ConstraintPropagator;
use crate::wave::WaveGrid;
use crate::WfcError;
use log::debug;
use rand::Rng;
use wfc_rules::{TileCatalog, TileId};

/// Picks one of `candidates` with probability proportional to its weight.
///
/// Draws `r` in `[0, W)` where `W` is the total weight, then walks the
/// candidates in order and returns the first whose running total reaches `r`.
/// Zero-weight candidates are never chosen unless every weight is zero, in
/// which case the first candidate is returned. A single candidate is returned
/// without touching `rng`. Returns `None` only for an empty slice.
pub fn choose_weighted<R: Rng + ?Sized>(
    candidates: &[TileId],
    catalog: &TileCatalog,
    rng: &mut R,
) -> Option<TileId> {
    let first = *candidates.first()?;
    if candidates.len() == 1 {
        return Some(first);
    }

    let weights: Vec<f32> = candidates
        .iter()
        .map(|id| catalog.get_weight(*id).unwrap_or(0.0))
        .collect();
    let total: f32 = weights.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Some(first);
    }

    let target = rng.gen_range(0.0..total);
    let mut running = 0.0;
    for (id, weight) in candidates.iter().zip(weights) {
        if weight <= 0.0 {
            continue;
        }
        running += weight;
        if running >= target {
            return Some(*id);
        }
    }
    Some(first)
}

/// Commits the cell at `(x, y)` to a weighted random candidate and propagates.
///
/// Returns the committed tile. A contradiction raised by propagation is
/// returned as `WfcError::Contradiction`; the grid is then unusable.
///
/// # Errors
///
/// `AlreadyCollapsed`, `Contradiction` or `OutOfBounds` if `(x, y)` cannot be collapsed.
pub fn collapse<P, R>(
    grid: &mut WaveGrid,
    x: usize,
    y: usize,
    propagator: &P,
    rng: &mut R,
) -> Result<TileId, WfcError>
where
    P: ConstraintPropagator + ?Sized,
    R: Rng + ?Sized,
{
    let candidates = match grid.cell(x, y) {
        None => return Err(WfcError::OutOfBounds(x, y)),
        Some(Cell::Collapsed(_)) => return Err(WfcError::AlreadyCollapsed(x, y)),
        Some(cell) => cell.candidates(),
    };
    let tile =
        choose_weighted(&candidates, grid.catalog(), rng).ok_or(WfcError::Contradiction(x, y))?;
    debug!(
        "Collapsing ({x}, {y}) to tile {tile} out of {} candidates",
        candidates.len()
    );
    commit_and_propagate(grid, x, y, tile, propagator)?;
    Ok(tile)
}

/// Commits `(x, y)` to a caller-chosen `tile` and propagates.
///
/// # Errors
///
/// `TileNotInDomain` if `tile` is no longer a candidate there, plus the
/// errors of [`collapse`].
pub fn force_collapse<P>(
    grid: &mut WaveGrid,
    x: usize,
    y: usize,
    tile: TileId,
    propagator: &P,
) -> Result<(), WfcError>
where
    P: ConstraintPropagator + ?Sized,
{
    debug!("Forcing ({x}, {y}) to tile {tile}");
    commit_and_propagate(grid, x, y, tile, propagator)
}

fn commit_and_propagate<P>(
    grid: &mut WaveGrid,
    x: usize,
    y: usize,
    tile: TileId,
    propagator: &P,
) -> Result<(), WfcError>
where
    P: ConstraintPropagator + ?Sized,
{
    grid.commit(x, y, tile)?;
    propagator.propagate(grid, x, y)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SingletonPropagator;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wfc_rules::{TileDefinition, TileEdges};

    fn catalog(weights: &[f32]) -> TileCatalog {
        TileCatalog::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| TileDefinition::new(format!("t{i}"), w, TileEdges::uniform("a")))
                .collect(),
        )
        .unwrap()
    }

    fn ids(n: usize) -> Vec<TileId> {
        (0..n).map(TileId).collect()
    }

    #[test]
    fn test_single_candidate_does_not_draw() {
        let catalog = catalog(&[1.0, 1.0]);
        let mut rng = StepRng::new(0, 1);
        assert_eq!(
            choose_weighted(&[TileId(1)], &catalog, &mut rng),
            Some(TileId(1))
        );
        // The rng is still at its first value.
        assert_eq!(rng.gen::<u64>(), 0);
        assert_eq!(choose_weighted(&[], &catalog, &mut rng), None);
    }

    #[test]
    fn test_low_draw_skips_zero_weight() {
        let catalog = catalog(&[0.0, 2.0, 1.0]);
        let mut rng = StepRng::new(0, 0);
        assert_eq!(choose_weighted(&ids(3), &catalog, &mut rng), Some(TileId(1)));
    }

    #[test]
    fn test_high_draw_takes_last() {
        let catalog = catalog(&[1.0, 1.0, 1.0]);
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(choose_weighted(&ids(3), &catalog, &mut rng), Some(TileId(2)));
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_first() {
        let catalog = catalog(&[0.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(choose_weighted(&ids(2), &catalog, &mut rng), Some(TileId(0)));
    }

    #[test]
    fn test_frequencies_follow_weights() {
        let catalog = catalog(&[1.0, 0.001]);
        let mut rng = StdRng::seed_from_u64(42);
        let heavy = (0..2000)
            .filter(|_| choose_weighted(&ids(2), &catalog, &mut rng) == Some(TileId(0)))
            .count();
        assert!(heavy > 1950, "heavy tile chosen {heavy} times");
    }

    #[test]
    fn test_collapse_rejects_committed_cell() {
        let mut grid = WaveGrid::new(2, 1, std::sync::Arc::new(catalog(&[1.0, 1.0]))).unwrap();
        let propagator = SingletonPropagator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let tile = collapse(&mut grid, 0, 0, &propagator, &mut rng).unwrap();
        assert_eq!(grid.committed_tile(0, 0).unwrap().id(), tile);
        assert_eq!(
            collapse(&mut grid, 0, 0, &propagator, &mut rng),
            Err(WfcError::AlreadyCollapsed(0, 0))
        );
        assert_eq!(
            collapse(&mut grid, 5, 0, &propagator, &mut rng),
            Err(WfcError::OutOfBounds(5, 0))
        );
    }
}
