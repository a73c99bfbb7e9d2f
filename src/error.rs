//! Error types for unone library.

use std::io;
use thiserror::Error;

/// Result type alias for unone operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading and exporting OneNote sections.
///
/// Only the decoder boundary, I/O and rendering produce errors. Page
/// reconstruction itself is total: malformed structure degrades to missing
/// elements, never to an `Err`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file signature is not recognized.
    #[error("Unknown file format: not a OneNote section or object dump")]
    UnknownFormat,

    /// The container was recognized but cannot be read by the active decoder.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The container or object dump is malformed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid JSON in an object dump.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Error while writing exported files.
    #[error("Export error: {0}")]
    Export(String),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Decode(format!("invalid base64 payload: {}", err))
    }
}
