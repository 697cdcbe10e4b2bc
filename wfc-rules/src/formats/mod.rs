//! Module defining parsers for different catalog file formats.

pub mod parser;
pub use parser::FormatParser;

pub mod json_format;
pub mod ron_format;

use crate::{LoadError, TileCatalog, TileDefinition};
use serde::Deserialize;

/// Top-level structure shared by every catalog file format.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogFile {
    /// Tiles in catalog order. Duplicates are kept as separate entries.
    pub(crate) tiles: Vec<TileDefinition>,
}

impl CatalogFile {
    pub(crate) fn into_catalog(self) -> Result<TileCatalog, LoadError> {
        if self.tiles.is_empty() {
            return Err(LoadError::InvalidData("No tiles defined.".to_owned()));
        }
        Ok(TileCatalog::new(self.tiles)?)
    }
}
