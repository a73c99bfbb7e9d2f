//! OneNote section reconstruction.
//!
//! A decoder turns file bytes into a typed object stream; everything else
//! in this module rebuilds pages from that stream.

mod assembler;
mod decode;
mod dedup;
mod extractor;
mod hierarchy;
mod list;
mod media;
pub mod object;
mod options;
mod rich_text;
mod section_parser;
mod source;
mod table;

pub use assembler::{assemble_pages, PageBucket};
pub use decode::{clean_text, decode_text, filetime_to_datetime, time32_to_datetime, TextField};
pub use dedup::{deduplicate_elements, deduplicate_objects, fingerprint};
pub use extractor::{extract_page, extract_section, scan_objects, ExtractContext};
pub use hierarchy::reorder_by_outline;
pub use list::{DepthTable, ListInfo, ListResolver, ListState};
pub use media::{extract_embedded_file, extract_image};
pub use object::{Identity, JcidKind, PropertyValue, TypedObject};
pub use options::{ErrorMode, ParseOptions};
pub use rich_text::{extract_rich_text, parse_hyperlink_field_codes, FieldSegment};
pub use section_parser::{parse_sections, BatchOutcome, SectionParser};
pub use source::{DecodedSection, JsonDumpDecoder, SectionDecoder};
pub use table::{TableOutcome, TableScanner};
