use crate::formats::json_format::JsonFormatParser;
use crate::formats::ron_format::RonFormatParser;
use crate::formats::FormatParser;
use crate::{LoadError, TileCatalog};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Picks a parser from the file extension (`.ron` or `.json`, case-insensitive).
pub fn parser_for_path(path: &Path) -> Result<Box<dyn FormatParser>, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("ron") => Ok(Box::new(RonFormatParser::new())),
        Some("json") => Ok(Box::new(JsonFormatParser::new())),
        other => Err(LoadError::UnsupportedFormat(format!(
            "{} (extension {:?})",
            path.display(),
            other.unwrap_or("")
        ))),
    }
}

/// Loads a tile catalog from a RON or JSON file.
///
/// # Errors
///
/// Returns `LoadError::UnsupportedFormat` for unknown extensions, `LoadError::Io`
/// if the file cannot be read, and `ParseError`/`InvalidData` for bad content.
pub fn load_from_file(path: &Path) -> Result<TileCatalog, LoadError> {
    let parser = parser_for_path(path)?;
    debug!("Reading {} catalog from {:?}", parser.format_name(), path);
    let content = fs::read_to_string(path)?;
    let catalog = parser.parse(&content)?;
    info!("Loaded {} tiles from {:?}", catalog.len(), path);
    Ok(catalog)
}
