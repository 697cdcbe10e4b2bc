//! Runs generation attempts until one completes.

use crate::config::GenerationSettings;
use crate::error::AppError;
use crate::progress::{ConsoleProgressReporter, ProgressReporter};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wfc_core::runner::ProgressCallback;
use wfc_core::{
    run_to_completion, MinimumRemainingValues, RunReport, SingletonPropagator, WaveGrid,
    WfcConfig, WfcError,
};
use wfc_rules::TileCatalog;

/// A completed grid and how it was obtained.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub grid: WaveGrid,
    /// 1-based number of the attempt that succeeded.
    pub attempts: u32,
    pub report: RunReport,
}

type SharedReporter = Arc<Mutex<dyn ProgressReporter>>;

/// Generates a grid, starting over with a fresh one after each contradiction.
///
/// Attempt `n` (0-based) is seeded with `seed + n` when a seed is set, so a
/// seeded run is reproducible including its retries.
///
/// # Errors
///
/// `AttemptsExhausted` when every attempt hits a contradiction. Any other
/// solver error aborts immediately.
pub fn run_generation(
    catalog: &Arc<TileCatalog>,
    settings: &GenerationSettings,
    progress_interval: Option<Duration>,
) -> Result<GenerationOutcome, AppError> {
    settings.validate()?;
    let propagator = SingletonPropagator::new(settings.boundary_mode);
    let selector = MinimumRemainingValues::new(settings.scan_order);
    let reporter: Option<SharedReporter> = progress_interval.map(|interval| {
        Arc::new(Mutex::new(ConsoleProgressReporter::new(interval))) as SharedReporter
    });

    for attempt in 0..settings.max_attempts {
        let mut grid = WaveGrid::new(settings.width, settings.height, Arc::clone(catalog))?;
        let config = attempt_config(settings, attempt, reporter.as_ref());
        info!(
            "Attempt {}/{} (seed: {:?})",
            attempt + 1,
            settings.max_attempts,
            config.seed
        );

        match run_to_completion(&mut grid, &propagator, &selector, &config, &mut config.rng()) {
            Ok(report) => {
                notify(reporter.as_ref(), |r| r.finish());
                return Ok(GenerationOutcome {
                    grid,
                    attempts: attempt + 1,
                    report,
                });
            }
            Err(error @ WfcError::Contradiction(..)) => {
                warn!("Attempt {} ended in a contradiction: {error}", attempt + 1);
                notify(reporter.as_ref(), |r| r.fail(&error));
            }
            Err(error) => {
                notify(reporter.as_ref(), |r| r.fail(&error));
                return Err(error.into());
            }
        }
    }

    Err(AppError::AttemptsExhausted(settings.max_attempts))
}

fn attempt_config(
    settings: &GenerationSettings,
    attempt: u32,
    reporter: Option<&SharedReporter>,
) -> WfcConfig {
    let mut builder = WfcConfig::builder();
    if let Some(seed) = settings.seed {
        builder = builder.seed(seed.wrapping_add(u64::from(attempt)));
    }
    if let Some(max_steps) = settings.max_steps {
        builder = builder.max_steps(max_steps);
    }
    if let Some(reporter) = reporter {
        builder = builder.progress_callback(progress_callback(Arc::clone(reporter)));
    }
    builder.build()
}

fn progress_callback(reporter: SharedReporter) -> ProgressCallback {
    Box::new(move |info| {
        let mut reporter = reporter
            .lock()
            .map_err(|_| WfcError::ProgressCallback("progress reporter lock poisoned".into()))?;
        reporter
            .report(&info)
            .map_err(|e| WfcError::ProgressCallback(e.to_string()))
    })
}

/// Reporter failures are logged, never fatal.
fn notify<F>(reporter: Option<&SharedReporter>, f: F)
where
    F: FnOnce(&mut dyn ProgressReporter) -> anyhow::Result<()>,
{
    let Some(reporter) = reporter else {
        return;
    };
    match reporter.lock() {
        Ok(mut guard) => {
            if let Err(e) = f(&mut *guard) {
                warn!("Progress reporter failed: {e}");
            }
        }
        Err(_) => warn!("Progress reporter lock poisoned"),
    }
}
