use crate::{LoadError, TileCatalog};

/// Trait defining the interface for format-specific catalog parsers.
pub trait FormatParser {
    /// Parses catalog content into a validated `TileCatalog`.
    fn parse(&self, content: &str) -> Result<TileCatalog, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// Used in log lines and error messages.
    fn format_name(&self) -> &'static str;
}
