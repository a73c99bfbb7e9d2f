//! Rich-text assembly: decoded text, formatting, hyperlinks and headings.

use super::decode::clean_text;
use super::dedup::primary_or_secondary_text;
use super::list::ListInfo;
use super::object::{props, TypedObject};
use crate::model::{RichText, TextRun, TextStyle};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Field-code markers that open an inline HYPERLINK instruction.
const FIELD_MARKERS: [char; 2] = ['\u{FDDF}', '\u{FDF3}'];

fn hyperlink_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[\x{FDDF}\x{FDF3}]HYPERLINK\s+"([^"]+)"([^\x{FDDF}\x{FDF3}]+)"#)
            .expect("valid hyperlink field pattern")
    })
}

/// A piece of text split out of a field-coded paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSegment {
    /// Visible text
    pub text: String,
    /// Link target, if the segment came from a HYPERLINK field
    pub url: Option<String>,
}

impl FieldSegment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
        }
    }
}

/// Character formatting from a style container's properties.
pub fn style_from_container(container: &TypedObject) -> TextStyle {
    let font = container.text(props::FONT);
    let font_size = container
        .get(props::FONT_SIZE)
        .map(|v| v.as_font_size())
        .unwrap_or(0);

    TextStyle {
        bold: container.flag(props::BOLD),
        italic: container.flag(props::ITALIC),
        underline: container.flag(props::UNDERLINE),
        strikethrough: container.flag(props::STRIKETHROUGH),
        superscript: container.flag(props::SUPERSCRIPT),
        subscript: container.flag(props::SUBSCRIPT),
        font_name: (!font.is_empty()).then_some(font),
        font_size: u32::try_from(font_size).ok().filter(|&s| s > 0),
    }
}

/// Split text containing HYPERLINK field codes into ordered segments.
///
/// Text before a field becomes an unlinked segment. A field with empty
/// display text uses its URL as the text. Text without any field yields a
/// single unlinked segment.
pub fn parse_hyperlink_field_codes(text: &str) -> Vec<FieldSegment> {
    if text.is_empty() {
        return vec![FieldSegment::plain("")];
    }

    let mut segments = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let Some(caps) = hyperlink_regex().captures(remaining) else {
            let rest = clean_text(remaining);
            if !rest.is_empty() {
                segments.push(FieldSegment::plain(rest));
            }
            break;
        };

        // Group 0 always exists on a match.
        let whole = match caps.get(0) {
            Some(m) => m,
            None => break,
        };

        let prefix = clean_text(&remaining[..whole.start()]);
        if !prefix.is_empty() {
            segments.push(FieldSegment::plain(prefix));
        }

        let url = clean_text(caps.get(1).map(|m| m.as_str()).unwrap_or(""));
        let display = clean_text(caps.get(2).map(|m| m.as_str()).unwrap_or(""));
        if !display.is_empty() {
            segments.push(FieldSegment {
                text: display,
                url: (!url.is_empty()).then_some(url),
            });
        } else if !url.is_empty() {
            segments.push(FieldSegment {
                text: url.clone(),
                url: Some(url),
            });
        }

        remaining = &remaining[whole.end()..];
    }

    if segments.is_empty() {
        vec![FieldSegment::plain(text)]
    } else {
        segments
    }
}

/// Heading level from the first `ParagraphStyle` reference via the
/// paragraph style table: `h1`..`h6` map to 1-6, anything else is body text.
pub fn resolve_heading_level(
    obj: &TypedObject,
    paragraph_styles: &HashMap<String, String>,
) -> Option<u8> {
    if paragraph_styles.is_empty() {
        return None;
    }
    let value = obj.get(props::PARAGRAPH_STYLE)?;
    if !value.is_ref_list() {
        return None;
    }
    let reference = *value.refs().first()?;
    let token = paragraph_styles.get(reference)?;

    match token.as_str() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Build a rich text element from a rich-text node. Returns `None` when the
/// node has no visible text.
pub fn extract_rich_text(
    obj: &TypedObject,
    style: &TextStyle,
    list: Option<ListInfo>,
    paragraph_styles: &HashMap<String, String>,
) -> Option<RichText> {
    let text = primary_or_secondary_text(obj);
    if text.trim().is_empty() {
        return None;
    }

    let link = obj.text(props::HYPERLINK_URL);
    let link = (!link.is_empty()).then_some(link);

    let runs = if text.contains(FIELD_MARKERS) {
        parse_hyperlink_field_codes(&text)
            .into_iter()
            .enumerate()
            .map(|(i, seg)| {
                let url = match seg.url {
                    Some(url) => Some(url),
                    None if i == 0 => link.clone(),
                    None => None,
                };
                TextRun {
                    text: seg.text,
                    style: style.clone(),
                    hyperlink_url: url,
                }
            })
            .collect()
    } else {
        vec![TextRun {
            text,
            style: style.clone(),
            hyperlink_url: link,
        }]
    };

    Some(RichText {
        runs,
        indent_level: list.map(|l| l.indent_level).unwrap_or(0),
        heading_level: resolve_heading_level(obj, paragraph_styles),
        list_type: list.map(|l| l.list_type),
        is_title: obj.flag(props::IS_TITLE_TEXT),
    })
}
