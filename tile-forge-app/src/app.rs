use crate::config::{AppConfig, VisualizationMode};
use crate::execution::run_generation;
use crate::logging::init_logger;
use crate::output::save_grid_to_file;
use crate::visualization::{TerminalVisualizer, Visualizer};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use wfc_rules::loader::load_from_file;

/// Parses the command line, sets up logging and runs the application.
pub fn run() -> Result<()> {
    let config = AppConfig::parse();
    init_logger(&config);
    run_with_config(&config)
}

/// Loads the catalog, generates a grid and writes it out.
pub fn run_with_config(config: &AppConfig) -> Result<()> {
    log::info!("Tile Forge App Starting");
    log::debug!("Loaded Config: {config:?}");
    let start_time = Instant::now();

    let settings = config
        .resolve_settings()
        .context("Failed to resolve generation settings")?;
    log::debug!("Resolved settings: {settings:?}");

    log::info!("Loading rules from: {:?}", config.rule_file);
    let catalog = load_from_file(&config.rule_file)
        .with_context(|| format!("Failed to load rule file {:?}", config.rule_file))?;
    log::info!("Rules loaded: {} tiles", catalog.len());
    let catalog = Arc::new(catalog);

    log::info!(
        "Generating {}x{} grid ({:?}, {:?})",
        settings.width,
        settings.height,
        settings.scan_order,
        settings.boundary_mode
    );
    let outcome = run_generation(&catalog, &settings, config.report_progress_interval)?;
    log::info!(
        "Grid completed on attempt {} after {} steps",
        outcome.attempts,
        outcome.report.iterations
    );

    if config.visualization_mode == VisualizationMode::Terminal {
        TerminalVisualizer::new().display_state(&outcome.grid)?;
    }

    save_grid_to_file(&outcome.grid, &settings.output_path, settings.output_format)?;
    log::info!("Tile Forge App Finished in {:?}", start_time.elapsed());
    Ok(())
}
