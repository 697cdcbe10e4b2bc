use crate::{
    collapse::collapse, entropy::CellSelector, grid::Cell, propagator::ConstraintPropagator,
    wave::WaveGrid, ProgressInfo, WfcError,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Alias for the progress callback function type.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) -> Result<(), WfcError> + Send + Sync>;

/// Configuration options for [`run_to_completion`].
#[derive(Default)]
pub struct WfcConfig {
    /// Step limit. `None` means one step per cell, which always suffices
    /// since every step commits at least one cell.
    pub max_steps: Option<u64>,
    /// Seed for [`WfcConfig::rng`]. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Called after every step. An `Err` aborts the run with that error.
    pub progress_callback: Option<ProgressCallback>,
}

impl WfcConfig {
    /// Creates a new builder for `WfcConfig`.
    pub fn builder() -> WfcConfigBuilder {
        WfcConfigBuilder::default()
    }

    /// A fresh rng: seeded if `seed` is set, otherwise from entropy.
    pub fn rng(&self) -> StdRng {
        self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }

    /// The effective step limit for `grid`.
    pub fn step_limit(&self, grid: &WaveGrid) -> u64 {
        self.max_steps.unwrap_or(grid.total_cells() as u64)
    }
}

impl std::fmt::Debug for WfcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WfcConfig")
            .field("max_steps", &self.max_steps)
            .field("seed", &self.seed)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

/// Builder for `WfcConfig`.
#[derive(Default)]
pub struct WfcConfigBuilder {
    max_steps: Option<u64>,
    seed: Option<u64>,
    progress_callback: Option<ProgressCallback>,
}

impl WfcConfigBuilder {
    /// Sets the maximum number of steps allowed.
    pub fn max_steps(mut self, max: u64) -> Self {
        self.max_steps = Some(max);
        self
    }

    /// Sets the seed for the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the progress callback function.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn build(self) -> WfcConfig {
        WfcConfig {
            max_steps: self.max_steps,
            seed: self.seed,
            progress_callback: self.progress_callback,
        }
    }
}

/// Outcome of a single [`step_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The cell at `(x, y)` was collapsed and propagation succeeded.
    Progressed(usize, usize),
    /// Every cell is committed; nothing left to do.
    Complete,
    /// The cell at `(x, y)` ran out of candidates, or is a committed cell
    /// whose tile conflicts with a neighbor's. The grid must be discarded.
    Contradiction(usize, usize),
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Steps taken, i.e. cells collapsed by selection.
    pub iterations: u64,
    /// Cells committed in total, including ones forced by propagation.
    pub collapsed_cells: usize,
    pub elapsed_time: Duration,
}

/// Selects one cell, collapses it and propagates.
///
/// # Errors
///
/// Only for misuse that is not a contradiction, e.g. a selector returning
/// a committed cell. Contradictions are reported as [`StepResult::Contradiction`].
pub fn step_once<P, S, R>(
    grid: &mut WaveGrid,
    propagator: &P,
    selector: &S,
    rng: &mut R,
) -> Result<StepResult, WfcError>
where
    P: ConstraintPropagator + ?Sized,
    S: CellSelector + ?Sized,
    R: Rng + ?Sized,
{
    let Some((x, y)) = selector.select_next_cell(grid) else {
        return Ok(match first_contradiction(grid) {
            Some((cx, cy)) => StepResult::Contradiction(cx, cy),
            None => StepResult::Complete,
        });
    };

    match collapse(grid, x, y, propagator, rng) {
        Ok(tile) => {
            debug!(
                "Step collapsed ({x}, {y}) to tile {tile}, {} cells left",
                grid.undetermined_cells()
            );
            Ok(StepResult::Progressed(x, y))
        }
        Err(WfcError::Contradiction(cx, cy)) => Ok(StepResult::Contradiction(cx, cy)),
        Err(e) => Err(e),
    }
}

/// Steps until the grid is complete, a contradiction occurs or the step
/// limit runs out.
///
/// # Errors
///
/// * `WfcError::Contradiction` with the coordinates of the failing cell.
/// * `WfcError::MaxIterationsReached` if `config.max_steps` is exhausted first.
/// * Whatever the progress callback returns.
pub fn run_to_completion<P, S, R>(
    grid: &mut WaveGrid,
    propagator: &P,
    selector: &S,
    config: &WfcConfig,
    rng: &mut R,
) -> Result<RunReport, WfcError>
where
    P: ConstraintPropagator + ?Sized,
    S: CellSelector + ?Sized,
    R: Rng + ?Sized,
{
    info!(
        "Starting WFC run on {}x{} grid with {} tiles...",
        grid.width(),
        grid.height(),
        grid.catalog().len()
    );
    let start_time = Instant::now();
    let max_steps = config.step_limit(grid);
    let mut iterations = 0u64;

    while !grid.is_complete() {
        if iterations >= max_steps {
            warn!(
                "Stopping after {iterations} steps with {} cells undetermined",
                grid.undetermined_cells()
            );
            return Err(WfcError::MaxIterationsReached(max_steps));
        }
        match step_once(grid, propagator, selector, rng)? {
            StepResult::Progressed(..) => iterations += 1,
            StepResult::Complete => break,
            StepResult::Contradiction(x, y) => {
                warn!("Contradiction at ({x}, {y}) after {iterations} steps");
                return Err(WfcError::Contradiction(x, y));
            }
        }

        if let Some(callback) = &config.progress_callback {
            callback(ProgressInfo {
                collapsed_cells: grid.collapsed_cells(),
                total_cells: grid.total_cells(),
                elapsed_time: start_time.elapsed(),
                iterations,
            })?;
        }
    }

    let report = RunReport {
        iterations,
        collapsed_cells: grid.collapsed_cells(),
        elapsed_time: start_time.elapsed(),
    };
    info!(
        "WFC run completed in {} steps ({:?})",
        report.iterations, report.elapsed_time
    );
    Ok(report)
}

fn first_contradiction(grid: &WaveGrid) -> Option<(usize, usize)> {
    grid.cells()
        .iter()
        .find(|(_, cell)| matches!(cell, Cell::Contradiction))
        .map(|(coords, _)| coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MinimumRemainingValues, SingletonPropagator};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use wfc_rules::{TileDefinition, TileEdges};

    /// Two interchangeable tiles: nothing is ever forced.
    fn loose_grid(width: usize, height: usize) -> WaveGrid {
        WaveGrid::from_definitions(
            width,
            height,
            vec![
                TileDefinition::new("a", 1.0, TileEdges::uniform("x")),
                TileDefinition::new("b", 1.0, TileEdges::uniform("x")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = WfcConfig::builder().max_steps(10).seed(3).build();
        assert_eq!(config.max_steps, Some(10));
        assert_eq!(config.seed, Some(3));
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn test_default_step_limit_is_cell_count() {
        let grid = loose_grid(4, 3);
        assert_eq!(WfcConfig::default().step_limit(&grid), 12);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = WfcConfig::builder().seed(99).build();
        assert_eq!(config.rng().gen::<u64>(), config.rng().gen::<u64>());
    }

    #[test]
    fn test_run_takes_one_step_per_cell_without_forcing() {
        let mut grid = loose_grid(3, 2);
        let config = WfcConfig::builder().seed(5).build();
        let report = run_to_completion(
            &mut grid,
            &SingletonPropagator::default(),
            &MinimumRemainingValues::default(),
            &config,
            &mut config.rng(),
        )
        .unwrap();
        assert_eq!(report.iterations, 6);
        assert_eq!(report.collapsed_cells, 6);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_step_limit_is_enforced() {
        let mut grid = loose_grid(2, 2);
        let config = WfcConfig::builder().max_steps(2).seed(5).build();
        let result = run_to_completion(
            &mut grid,
            &SingletonPropagator::default(),
            &MinimumRemainingValues::default(),
            &config,
            &mut config.rng(),
        );
        assert_eq!(result, Err(WfcError::MaxIterationsReached(2)));
        assert_eq!(grid.undetermined_cells(), 2);
    }

    #[test]
    fn test_progress_callback_sees_every_step_and_can_abort() {
        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&calls);
        let config = WfcConfig::builder()
            .seed(1)
            .progress_callback(Box::new(move |info| {
                seen.fetch_add(1, Ordering::SeqCst);
                if info.iterations == 2 {
                    return Err(WfcError::ProgressCallback("stop".to_string()));
                }
                assert_eq!(info.total_cells, 4);
                Ok(())
            }))
            .build();
        let mut grid = loose_grid(2, 2);
        let result = run_to_completion(
            &mut grid,
            &SingletonPropagator::default(),
            &MinimumRemainingValues::default(),
            &config,
            &mut config.rng(),
        );
        assert_eq!(result, Err(WfcError::ProgressCallback("stop".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_step_on_complete_grid() {
        let mut grid = WaveGrid::from_definitions(
            1,
            1,
            vec![TileDefinition::new("only", 1.0, TileEdges::uniform("x"))],
        )
        .unwrap();
        let propagator = SingletonPropagator::default();
        let selector = MinimumRemainingValues::default();
        let mut rng = WfcConfig::default().rng();
        assert_eq!(
            step_once(&mut grid, &propagator, &selector, &mut rng),
            Ok(StepResult::Progressed(0, 0))
        );
        assert_eq!(
            step_once(&mut grid, &propagator, &selector, &mut rng),
            Ok(StepResult::Complete)
        );
    }
}
