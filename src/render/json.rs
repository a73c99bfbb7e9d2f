//! JSON rendering for reconstructed sections.

use crate::error::{Error, Result};
use crate::model::Section;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a section to JSON. Image and attachment payloads are omitted.
pub fn to_json(section: &Section, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(section),
        JsonFormat::Compact => serde_json::to_string(section),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
