//! Tile catalog model and loaders for the tile-forge solver.
//!
//! Tiles carry four edge labels; adjacency rules are derived from label equality.

use thiserror::Error;

pub mod formats;
pub mod generator;
pub mod loader;
pub mod types;

pub use types::{
    AdjacencyRules, Direction, Tile, TileCatalog, TileDefinition, TileEdges, TileId, TileSetError,
};

/// Errors that can occur while loading a tile catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog format (RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

impl From<TileSetError> for LoadError {
    fn from(error: TileSetError) -> Self {
        Self::InvalidData(format!("TileSet Error: {error}"))
    }
}
