//! Tile Forge Application Library
//!
//! Command-line harness around `wfc-core`: configuration, logging, retrying
//! generation attempts, progress reporting and output.

pub mod app;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod output;
pub mod progress;
pub mod visualization;

pub use app::{run, run_with_config};
pub use config::{AppConfig, GenerationSettings};
pub use error::AppError;
