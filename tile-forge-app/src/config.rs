use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use wfc_core::{BoundaryMode, ScanOrder};

/// Prefix of environment variables that override generation settings,
/// e.g. `TILE_FORGE_WIDTH=32`.
pub const ENV_PREFIX: &str = "TILE_FORGE_";

/// Represents the different visualization modes available.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualizationMode {
    #[default]
    None,
    /// Colored glyph map printed after generation.
    Terminal,
}

/// File format of the generated grid.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One row per line, space-separated tile ids.
    #[default]
    Text,
    /// Full grid snapshot with tile names.
    Json,
}

/// Log level for everything except progress reports.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level for the progress reporter.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

/// Settings that drive a generation run once every source has been merged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationSettings {
    pub width: usize,
    pub height: usize,
    /// Base seed; attempt `n` uses `seed + n`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Step limit per attempt; defaults to the cell count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u64>,
    /// Fresh grids to try before giving up on contradictions.
    pub max_attempts: u32,
    pub scan_order: ScanOrder,
    pub boundary_mode: BoundaryMode,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            seed: None,
            max_steps: None,
            max_attempts: 10,
            scan_order: ScanOrder::RowMajor,
            boundary_mode: BoundaryMode::Clamped,
            output_path: PathBuf::from("output.txt"),
            output_format: OutputFormat::Text,
        }
    }
}

impl GenerationSettings {
    /// Rejects settings the solver cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::Config(format!(
                "Grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_attempts == 0 {
            return Err(AppError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generation flags given explicitly on the command line.
#[derive(Serialize, Debug, Default)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_steps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scan_order: Option<ScanOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boundary_mode: Option<BoundaryMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<OutputFormat>,
}

/// Configuration for the Tile Forge application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the tile catalog (RON or JSON).
    #[arg(short, long, value_name = "FILE", env = "TILE_FORGE_RULE_FILE")]
    pub rule_file: PathBuf,

    /// Optional TOML file with generation settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Width of the output grid [default: 10].
    #[arg(long)]
    pub width: Option<usize>,

    /// Height of the output grid [default: 10].
    #[arg(long)]
    pub height: Option<usize>,

    /// Optional seed for the random number generator.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum steps per attempt [default: width * height].
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Fresh grids to try when a contradiction occurs [default: 10].
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Tie-break order when several cells are equally constrained [default: row-major].
    #[arg(long, value_enum)]
    pub scan_order: Option<ScanOrder>,

    /// How the grid edges behave [default: clamped].
    #[arg(long, value_enum)]
    pub boundary_mode: Option<BoundaryMode>,

    /// Path to save the generated output grid [default: output.txt].
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Format of the output file [default: text].
    #[arg(long, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Report progress updates every specified interval (e.g., "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    /// Choose the visualization mode.
    #[arg(long, value_enum, default_value_t = VisualizationMode::None)]
    pub visualization_mode: VisualizationMode,

    /// Log level for everything but progress reports. `RUST_LOG` still applies.
    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub global_log_level: GlobalLogLevel,

    /// Log level for progress reports.
    #[arg(long, value_enum, default_value_t = ProgressLogLevel::Info)]
    pub progress_log_level: ProgressLogLevel,
}

impl AppConfig {
    /// Merges defaults, the optional TOML file, `TILE_FORGE_*` environment
    /// variables and explicit flags, later sources winning.
    pub fn resolve_settings(&self) -> Result<GenerationSettings, AppError> {
        let mut figment = Figment::from(Serialized::defaults(GenerationSettings::default()));
        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let settings: GenerationSettings = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(self.overrides()))
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            width: self.width,
            height: self.height,
            seed: self.seed,
            max_steps: self.max_steps,
            max_attempts: self.max_attempts,
            scan_order: self.scan_order,
            boundary_mode: self.boundary_mode,
            output_path: self.output_path.clone(),
            output_format: self.output_format,
        }
    }
}
