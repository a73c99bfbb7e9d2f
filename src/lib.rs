//! # unone
//!
//! OneNote section reconstruction library for Rust.
//!
//! A OneNote section stores its pages as a stream of typed objects, with
//! every edit appended as a new revision. This library rebuilds readable
//! pages from that stream (titles, outlines in reading order, lists, tables,
//! hyperlinks, images and attachments) and renders them to Markdown, plain
//! text, and JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unone::{parse_file, render};
//!
//! fn main() -> unone::Result<()> {
//!     // Parse a section (object dump produced by a OneStore decoder)
//!     let section = parse_file("Meetings.one.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&section, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Revision collapsing**: one page per page identity, duplicate objects removed
//! - **Reading order**: edited content relocated under its outline element
//! - **Structure**: headings, numbered and bulleted lists, tables, hyperlinks
//! - **Resources**: images and attachments with format detection
//! - **Export**: notebook directories to Markdown trees
//! - **Parallel processing**: Uses Rayon across pages and sections

pub mod detect;
pub mod discover;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_section, SourceFormat};
pub use error::{Error, Result};
pub use export::{ExportOptions, Exporter};
pub use model::{
    ContentElement, EmbeddedFile, Image, ImageFormat, ListType, Notebook, Page, RichText,
    Section, Table, TableCell, TableRow, TextRun, TextStyle,
};
pub use parser::{
    DecodedSection, ErrorMode, JsonDumpDecoder, ParseOptions, SectionDecoder, SectionParser,
};
pub use render::{JsonFormat, PageSelection, RenderOptions};

use std::path::Path;
use std::sync::Arc;

/// Parse a section file and return its reconstructed pages.
///
/// # Example
///
/// ```no_run
/// use unone::parse_file;
///
/// let section = parse_file("Meetings.one.json").unwrap();
/// println!("Pages: {}", section.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Section> {
    Ok(SectionParser::open(path)?.parse())
}

/// Parse a section file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Section> {
    Ok(SectionParser::open_with_options(path, options)?.parse())
}

/// Parse a section from bytes with the default decoder.
pub fn parse_bytes(data: &[u8]) -> Result<Section> {
    Ok(SectionParser::from_bytes(data)?.parse())
}

/// Parse a section from bytes with a specific decoder.
pub fn parse_bytes_with_decoder(
    data: &[u8],
    options: ParseOptions,
    decoder: &dyn SectionDecoder,
) -> Result<Section> {
    Ok(SectionParser::from_bytes_with_decoder(data, options, decoder)?.parse())
}

/// Reconstruct a section from an already decoded object stream.
pub fn extract_section(decoded: &DecodedSection, options: &ParseOptions) -> Section {
    parser::extract_section(decoded, None, options)
}

/// Parse a section file asynchronously.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Section> {
    let path = path.as_ref();
    let data = tokio::fs::read(path).await?;
    Ok(SectionParser::from_bytes(&data)?.with_path(path).parse())
}

/// Convert a section file to Markdown.
///
/// # Example
///
/// ```no_run
/// use unone::to_markdown;
///
/// let markdown = to_markdown("Meetings.one.json").unwrap();
/// std::fs::write("Meetings.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let section = parse_file(path)?;
    render::to_markdown(&section, &RenderOptions::default())
}

/// Convert a section file to plain text.
pub fn to_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let section = parse_file(path)?;
    render::to_text(&section, &RenderOptions::default())
}

/// Convert a section file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let section = parse_file(path)?;
    render::to_json(&section, format)
}

/// Builder for parsing and converting OneNote sections.
///
/// # Example
///
/// ```no_run
/// use unone::Unone;
///
/// let markdown = Unone::new()
///     .with_frontmatter()
///     .lenient()
///     .parse("Meetings.one.json")?
///     .to_markdown()?;
/// # Ok::<(), unone::Error>(())
/// ```
pub struct Unone {
    parse_options: ParseOptions,
    render_options: RenderOptions,
    decoder: Arc<dyn SectionDecoder>,
}

impl Unone {
    /// Create a new builder with the default decoder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::default(),
            decoder: Arc::new(JsonDumpDecoder::new()),
        }
    }

    /// Enable lenient mode for batch parsing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parse_options = self.parse_options.sequential();
        self
    }

    /// Keep or drop image and attachment payloads.
    pub fn with_resources(mut self, extract: bool) -> Self {
        self.parse_options = self.parse_options.with_resources(extract);
        self
    }

    /// Use a specific section decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn SectionDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Parse a section file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<UnoneResult> {
        let parser =
            SectionParser::open_with_decoder(path, self.parse_options, self.decoder.as_ref())?;
        Ok(UnoneResult {
            section: parser.parse(),
            render_options: self.render_options,
        })
    }

    /// Parse a section from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<UnoneResult> {
        let parser =
            SectionParser::from_bytes_with_decoder(data, self.parse_options, self.decoder.as_ref())?;
        Ok(UnoneResult {
            section: parser.parse(),
            render_options: self.render_options,
        })
    }
}

impl Default for Unone {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a section.
pub struct UnoneResult {
    /// The reconstructed section
    pub section: Section,
    /// Render options to use
    render_options: RenderOptions,
}

impl UnoneResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.section, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.section, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.section, format)
    }

    /// Get the section.
    pub fn section(&self) -> &Section {
        &self.section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &[u8] = br#"{"objects": [
        {"type": "jcidPageMetaData", "identity": "<ExtendedGUID> (p, 1)",
         "properties": {"CachedTitleString": {"Text": "Inbox"}}},
        {"type": "jcidPageNode", "identity": "<ExtendedGUID> (p, 2)",
         "properties": {"Author": {"Text": "Sam"}}},
        {"type": "jcidOutlineElementNode", "identity": "<ExtendedGUID> (p, 3)"},
        {"type": "jcidRichTextOENode", "identity": "<ExtendedGUID> (p, 4)",
         "properties": {"RichEditTextUnicode": {"Text": "Reply to Kim"}}}
    ]}"#;

    struct EmptyDecoder;

    impl SectionDecoder for EmptyDecoder {
        fn decode(&self, _data: &[u8]) -> Result<DecodedSection> {
            Ok(DecodedSection::default())
        }

        fn name(&self) -> &str {
            "empty"
        }
    }

    #[test]
    fn test_unone_builder() {
        let unone = Unone::new().lenient().with_frontmatter().sequential();

        assert!(matches!(
            unone.parse_options.error_mode,
            parser::ErrorMode::Lenient
        ));
        assert!(!unone.parse_options.parallel);
        assert!(unone.render_options.include_frontmatter);
        assert_eq!(unone.decoder.name(), "json-dump");
    }

    #[test]
    fn test_parse_bytes_and_render() {
        let result = Unone::new().parse_bytes(DUMP).unwrap();
        assert_eq!(result.section().page_count(), 1);

        let md = result.to_markdown().unwrap();
        assert!(md.starts_with("# Inbox\n\nReply to Kim"));
        assert!(md.contains("*Author: Sam*"));

        assert_eq!(result.to_text().unwrap(), "Inbox\n\nReply to Kim");
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"author\":\"Sam\""));
    }

    #[test]
    fn test_custom_decoder() {
        let section = parse_bytes_with_decoder(b"anything", ParseOptions::default(), &EmptyDecoder)
            .unwrap();
        assert!(section.is_empty());

        let result = Unone::new().with_decoder(Arc::new(EmptyDecoder)).parse_bytes(b"x").unwrap();
        assert_eq!(result.section().page_count(), 0);
    }

    #[test]
    fn test_parse_bytes_empty_data() {
        assert!(parse_bytes(&[]).is_err());
    }

    #[test]
    fn test_parse_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        assert!(matches!(parse_bytes(&data), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_extract_section_from_decoded() {
        let decoded = JsonDumpDecoder::new().decode(DUMP).unwrap();
        let section = extract_section(&decoded, &ParseOptions::default());
        assert_eq!(section.pages[0].author.as_deref(), Some("Sam"));
    }
}
