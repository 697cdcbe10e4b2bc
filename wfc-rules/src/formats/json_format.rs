use crate::formats::{CatalogFile, FormatParser};
use crate::{LoadError, TileCatalog};

/// A parser implementation for JSON catalogs.
///
/// Uses the same schema as the RON format: `{"tiles": [{"name", "weight", "edges"}]}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatParser;

impl JsonFormatParser {
    pub fn new() -> Self {
        Self
    }
}

impl FormatParser for JsonFormatParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, json_content: &str) -> Result<TileCatalog, LoadError> {
        let file: CatalogFile = serde_json::from_str(json_content)
            .map_err(|e| LoadError::ParseError(format!("JSON deserialization failed: {e}")))?;
        file.into_catalog()
    }
}
