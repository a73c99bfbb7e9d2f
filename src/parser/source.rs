//! Decoder boundary: turning file bytes into a typed object stream.
//!
//! Reconstruction never reads container bytes itself. A [`SectionDecoder`]
//! produces a [`DecodedSection`] (objects in stream order, the blob store
//! and the paragraph style table) and everything downstream works from that.

use super::decode::clean_text;
use super::object::{props, JcidKind, TypedObject};
use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use base64::{engine::general_purpose, Engine};
use serde::Deserialize;
use std::collections::HashMap;

/// Everything a decoder extracts from one section file.
#[derive(Debug, Clone, Default)]
pub struct DecodedSection {
    /// Objects in stream order
    pub objects: Vec<TypedObject>,

    /// Embedded blobs keyed by identity string
    pub file_data: HashMap<String, Vec<u8>>,

    /// Paragraph style reference identity to style token (`h1`, `p`, ...)
    pub paragraph_styles: HashMap<String, String>,
}

impl DecodedSection {
    /// Create a decoded section from objects alone. Paragraph styles
    /// declared in the stream itself are collected.
    pub fn new(objects: Vec<TypedObject>) -> Self {
        let mut section = Self {
            objects,
            ..Self::default()
        };
        section.collect_inline_styles();
        section
    }

    /// Add a blob and return self.
    pub fn with_file(mut self, identity: impl Into<String>, data: Vec<u8>) -> Self {
        self.file_data.insert(identity.into(), data);
        self
    }

    /// Add a paragraph style mapping and return self.
    pub fn with_paragraph_style(
        mut self,
        reference: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.paragraph_styles
            .insert(reference.into(), clean_text(&token.into()));
        self
    }

    /// Section display name from the first section metadata object that has one.
    pub fn display_name(&self) -> Option<String> {
        self.objects
            .iter()
            .filter(|o| o.kind == JcidKind::SectionMetaData)
            .map(|o| o.text(props::SECTION_DISPLAY_NAME))
            .find(|name| !name.is_empty())
    }

    /// Paragraph style objects present in the stream fill gaps in the table.
    fn collect_inline_styles(&mut self) {
        for obj in &self.objects {
            if obj.kind != JcidKind::ParagraphStyle {
                continue;
            }
            let token = obj.text(props::PARAGRAPH_STYLE_ID);
            if token.is_empty() {
                continue;
            }
            self.paragraph_styles
                .entry(obj.identity.as_str().to_string())
                .or_insert(token);
        }
    }
}

/// Turns raw section bytes into a typed object stream.
pub trait SectionDecoder: Send + Sync {
    /// Decode one section file.
    fn decode(&self, data: &[u8]) -> Result<DecodedSection>;

    /// Human-readable decoder name for logs and errors.
    fn name(&self) -> &str;
}

/// Decoder for JSON object dumps.
///
/// ```json
/// {
///   "objects": [
///     {"type": "jcidRichTextOENode", "identity": "<ExtendedGUID> (g, 1)",
///      "properties": {"RichEditTextUnicode": {"Text": "Hello"}}}
///   ],
///   "files": {"<ExtendedGUID> (blob, 1)": "iVBORw0KGgo="},
///   "paragraph_styles": {"<ExtendedGUID> (style, 1)": "h1"}
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDumpDecoder;

#[derive(Deserialize)]
struct ObjectDump {
    #[serde(default)]
    objects: Vec<TypedObject>,
    #[serde(default)]
    files: HashMap<String, String>,
    #[serde(default)]
    paragraph_styles: HashMap<String, String>,
}

impl JsonDumpDecoder {
    /// Create a new dump decoder.
    pub fn new() -> Self {
        Self
    }
}

impl SectionDecoder for JsonDumpDecoder {
    fn decode(&self, data: &[u8]) -> Result<DecodedSection> {
        match detect_format_from_bytes(data)? {
            SourceFormat::ObjectDump => {}
            other => {
                return Err(Error::UnsupportedFormat(format!(
                    "{} cannot be read by the {} decoder",
                    other,
                    self.name()
                )))
            }
        }

        let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
        let dump: ObjectDump = serde_json::from_slice(data)?;

        let mut section = DecodedSection::new(dump.objects);
        for (identity, encoded) in dump.files {
            let bytes = general_purpose::STANDARD.decode(encoded.trim())?;
            section.file_data.insert(identity, bytes);
        }
        for (reference, token) in dump.paragraph_styles {
            section
                .paragraph_styles
                .insert(reference, clean_text(&token));
        }

        log::debug!(
            "Decoded object dump: {} objects, {} blobs, {} paragraph styles",
            section.objects.len(),
            section.file_data.len(),
            section.paragraph_styles.len()
        );
        Ok(section)
    }

    fn name(&self) -> &str {
        "json-dump"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::object::{Identity, PropertyValue};

    #[test]
    fn test_decode_dump() {
        let json = br#"{
            "objects": [
                {"type": "jcidSectionMetaData", "identity": "<ExtendedGUID> (s, 1)",
                 "properties": {"SectionDisplayName": {"Text": "Work\u0000"}}},
                {"type": "jcidRichTextOENode", "identity": "<ExtendedGUID> (p, 2)",
                 "properties": {"RichEditTextUnicode": {"Text": "Hello"}}}
            ],
            "files": {"<ExtendedGUID> (blob, 1)": "AQID"},
            "paragraph_styles": {"<ExtendedGUID> (style, 1)": "h2\u0000"}
        }"#;

        let section = JsonDumpDecoder::new().decode(json).unwrap();
        assert_eq!(section.objects.len(), 2);
        assert_eq!(section.objects[1].kind, JcidKind::RichTextNode);
        assert_eq!(
            section.file_data.get("<ExtendedGUID> (blob, 1)"),
            Some(&vec![1, 2, 3])
        );
        assert_eq!(
            section.paragraph_styles.get("<ExtendedGUID> (style, 1)").map(String::as_str),
            Some("h2")
        );
        assert_eq!(section.display_name().as_deref(), Some("Work"));
    }

    #[test]
    fn test_decode_empty_dump() {
        let section = JsonDumpDecoder::new().decode(b"{}").unwrap();
        assert!(section.objects.is_empty());
        assert!(section.display_name().is_none());
    }

    #[test]
    fn test_decode_rejects_binary_section() {
        let mut data = vec![0u8; 64];
        data[..16].copy_from_slice(&[
            0xE4, 0x52, 0x5C, 0x7B, 0x8C, 0xD8, 0xA7, 0x4D, 0xAE, 0xB1, 0x53, 0x78, 0xD0, 0x29,
            0x96, 0xD3,
        ]);
        data[48..64].copy_from_slice(&[
            0x3F, 0xDD, 0x9A, 0x10, 0x1B, 0x91, 0xF5, 0x49, 0xA5, 0xD0, 0x17, 0x91, 0xED, 0xC8,
            0xAE, 0xD8,
        ]);
        let result = JsonDumpDecoder::new().decode(&data);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(
            JsonDumpDecoder::new().decode(b"{\"objects\": [1]}"),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            JsonDumpDecoder::new().decode(b"{\"files\": {\"a\": \"!!\"}}"),
            Err(Error::Decode(_))
        ));
        assert!(matches!(
            JsonDumpDecoder::new().decode(b"garbage bytes here"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_inline_paragraph_styles() {
        let style = TypedObject::new(JcidKind::ParagraphStyle, Identity::from_parts("st", 1))
            .with(props::PARAGRAPH_STYLE_ID, PropertyValue::Text("h1\u{0}".into()));
        let section = DecodedSection::new(vec![style]);
        assert_eq!(
            section
                .paragraph_styles
                .get("<ExtendedGUID> (st, 1)")
                .map(String::as_str),
            Some("h1")
        );
    }
}
