use thiserror::Error;
use wfc_core::WfcError;
use wfc_rules::LoadError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Settings Error: {0}")]
    Settings(#[from] Box<figment::Error>),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rule Loading Error: {0}")]
    Load(#[from] LoadError),

    #[error("WFC Core Error: {0}")]
    WfcCore(#[from] WfcError),

    /// Every attempt ended in a contradiction.
    #[error("Generation failed: all {0} attempts ended in a contradiction")]
    AttemptsExhausted(u32),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
