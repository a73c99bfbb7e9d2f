//! Typed object stream: the decoder's output and reconstruction's input.
//!
//! A decoded section is a flat, ordered list of [`TypedObject`]s. Each
//! object has a JCID type tag, an identity string of the form
//! `<ExtendedGUID> ({guid}, {n})`, and a bag of loosely typed properties.
//! Revisions of the same page share the GUID part of the identity.
//!
//! Property values are a closed enum with total conversions: every accessor
//! returns a default for input it does not recognize instead of failing.

use super::decode::clean_text;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Property names read during reconstruction.
pub mod props {
    pub const RICH_EDIT_TEXT_UNICODE: &str = "RichEditTextUnicode";
    pub const TEXT_EXTENDED_ASCII: &str = "TextExtendedAscii";
    pub const BOLD: &str = "Bold";
    pub const ITALIC: &str = "Italic";
    pub const UNDERLINE: &str = "Underline";
    pub const STRIKETHROUGH: &str = "Strikethrough";
    pub const SUPERSCRIPT: &str = "Superscript";
    pub const SUBSCRIPT: &str = "Subscript";
    pub const FONT: &str = "Font";
    pub const FONT_SIZE: &str = "FontSize";
    pub const HYPERLINK_URL: &str = "WzHyperlinkUrl";
    pub const IS_TITLE_TEXT: &str = "IsTitleText";
    pub const PARAGRAPH_STYLE: &str = "ParagraphStyle";
    pub const PARAGRAPH_STYLE_ID: &str = "ParagraphStyleId";

    pub const CHILD_NODES: &str = "ElementChildNodesOfVersionHistory";
    pub const OFFSET_FROM_PARENT_VERT: &str = "OffsetFromParentVert";
    pub const LIST_NODES: &str = "ListNodes";
    pub const NUMBER_LIST_FORMAT: &str = "NumberListFormat";
    pub const LIST_MSAA_INDEX: &str = "ListMSAAIndex";

    pub const ROW_COUNT: &str = "RowCount";
    pub const COLUMN_COUNT: &str = "ColumnCount";
    pub const TABLE_BORDERS_VISIBLE: &str = "TableBordersVisible";

    pub const IMAGE_FILENAME: &str = "ImageFilename";
    pub const IMAGE_ALT_TEXT: &str = "ImageAltText";
    pub const PICTURE_WIDTH: &str = "PictureWidth";
    pub const PICTURE_HEIGHT: &str = "PictureHeight";
    pub const PICTURE_CONTAINER: &str = "PictureContainer";

    pub const EMBEDDED_FILE_NAME: &str = "EmbeddedFileName";
    pub const SOURCE_FILEPATH: &str = "SourceFilepath";
    pub const EMBEDDED_FILE_CONTAINER: &str = "EmbeddedFileContainer";

    pub const CACHED_TITLE_STRING: &str = "CachedTitleString";
    pub const PAGE_LEVEL: &str = "PageLevel";
    pub const TOPOLOGY_CREATION_TIME_STAMP: &str = "TopologyCreationTimeStamp";
    pub const AUTHOR: &str = "Author";
    pub const LAST_MODIFIED_TIME: &str = "LastModifiedTime";
    pub const SECTION_DISPLAY_NAME: &str = "SectionDisplayName";
}

/// JCID object type tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JcidKind {
    SectionNode,
    SectionMetaData,
    PageSeriesNode,
    PageManifestNode,
    PageMetaData,
    PageNode,
    TitleNode,
    OutlineNode,
    OutlineElementNode,
    RichTextNode,
    ImageNode,
    TableNode,
    TableRowNode,
    TableCellNode,
    EmbeddedFileNode,
    NumberListNode,
    /// Character style container that sets formatting for following text
    StyleContainer,
    RevisionMetaData,
    ParagraphStyle,
    /// Any type tag reconstruction does not interpret
    Other(String),
}

const KIND_NAMES: &[(JcidKind, &str)] = &[
    (JcidKind::SectionNode, "jcidSectionNode"),
    (JcidKind::SectionMetaData, "jcidSectionMetaData"),
    (JcidKind::PageSeriesNode, "jcidPageSeriesNode"),
    (JcidKind::PageManifestNode, "jcidPageManifestNode"),
    (JcidKind::PageMetaData, "jcidPageMetaData"),
    (JcidKind::PageNode, "jcidPageNode"),
    (JcidKind::TitleNode, "jcidTitleNode"),
    (JcidKind::OutlineNode, "jcidOutlineNode"),
    (JcidKind::OutlineElementNode, "jcidOutlineElementNode"),
    (JcidKind::RichTextNode, "jcidRichTextOENode"),
    (JcidKind::ImageNode, "jcidImageNode"),
    (JcidKind::TableNode, "jcidTableNode"),
    (JcidKind::TableRowNode, "jcidTableRowNode"),
    (JcidKind::TableCellNode, "jcidTableCellNode"),
    (JcidKind::EmbeddedFileNode, "jcidEmbeddedFileNode"),
    (JcidKind::NumberListNode, "jcidNumberListNode"),
    (
        JcidKind::StyleContainer,
        "jcidPersistablePropertyContainerForTOCSection",
    ),
    (JcidKind::RevisionMetaData, "jcidRevisionMetaData"),
    (JcidKind::ParagraphStyle, "jcidParagraphStyleObjectForText"),
];

impl JcidKind {
    /// Parse a JCID type name. Unknown names are kept as [`JcidKind::Other`].
    pub fn from_name(name: &str) -> Self {
        KIND_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| JcidKind::Other(name.to_string()))
    }

    /// The JCID type name.
    pub fn name(&self) -> &str {
        if let JcidKind::Other(name) = self {
            return name;
        }
        KIND_NAMES
            .iter()
            .find(|(k, _)| k == self)
            .map(|(_, n)| *n)
            .unwrap_or_default()
    }

    /// Types that belong to a page's content object list.
    pub fn is_page_content(&self) -> bool {
        matches!(
            self,
            JcidKind::RichTextNode
                | JcidKind::ImageNode
                | JcidKind::TableNode
                | JcidKind::TableRowNode
                | JcidKind::TableCellNode
                | JcidKind::EmbeddedFileNode
                | JcidKind::OutlineElementNode
                | JcidKind::OutlineNode
                | JcidKind::NumberListNode
        )
    }

    /// Types that carry visible leaf content.
    pub fn is_leaf_content(&self) -> bool {
        matches!(
            self,
            JcidKind::RichTextNode | JcidKind::ImageNode | JcidKind::EmbeddedFileNode
        )
    }

    /// Structural objects that delimit outline groups.
    pub fn is_outline_boundary(&self) -> bool {
        matches!(self, JcidKind::OutlineElementNode | JcidKind::OutlineNode)
    }

    /// Table structure objects.
    pub fn is_table_structure(&self) -> bool {
        matches!(
            self,
            JcidKind::TableNode | JcidKind::TableRowNode | JcidKind::TableCellNode
        )
    }
}

impl From<String> for JcidKind {
    fn from(name: String) -> Self {
        JcidKind::from_name(&name)
    }
}

impl From<JcidKind> for String {
    fn from(kind: JcidKind) -> Self {
        kind.name().to_string()
    }
}

impl std::fmt::Display for JcidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An object identity string: `<ExtendedGUID> ({guid}, {n})`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

fn guid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^,]+),").expect("valid GUID pattern"))
}

impl Identity {
    /// Wrap an identity string as produced by the decoder.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build an identity from a GUID and a revision sequence number.
    pub fn from_parts(guid: &str, sequence: u32) -> Self {
        Self(format!("<ExtendedGUID> ({}, {})", guid, sequence))
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare GUID part, or an empty string when the identity has no
    /// `(guid, n)` group.
    pub fn guid(&self) -> &str {
        guid_regex()
            .captures(&self.0)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or("")
    }

    /// Check if the identity string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Identity::new(s)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Identity(s)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A loosely typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Bytes(#[serde(with = "base64_serde")] Vec<u8>),
    /// Ordered identity references
    RefList(Vec<Identity>),
}

impl PropertyValue {
    /// Build a reference list from identity strings.
    pub fn ref_list<I, S>(refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Identity>,
    {
        PropertyValue::RefList(refs.into_iter().map(Into::into).collect())
    }

    /// Whether the value is present in the "non-empty" sense.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Int(n) => *n != 0,
            PropertyValue::Text(s) => !s.is_empty(),
            PropertyValue::Bytes(b) => !b.is_empty(),
            PropertyValue::RefList(r) => !r.is_empty(),
        }
    }

    /// Interpret as a boolean. Text accepts `true`, `1` and `yes`.
    pub fn as_bool(&self) -> bool {
        match self {
            PropertyValue::Text(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
            other => other.is_truthy(),
        }
    }

    /// Interpret as an integer: ints as-is, raw bytes (two or more) as a
    /// little-endian u32 over the first four, text by its first digit run.
    pub fn as_int(&self) -> i64 {
        match self {
            PropertyValue::Int(n) => *n,
            PropertyValue::Bool(b) => i64::from(*b),
            PropertyValue::Bytes(b) if b.len() >= 2 => i64::from(le_u32(b)),
            PropertyValue::Text(s) => first_number(s),
            _ => 0,
        }
    }

    /// Interpret a 2-byte property: ints as-is, raw bytes as little-endian
    /// u16, or the escaped-byte text form (`b'$\x00'`).
    pub fn as_short(&self) -> i64 {
        match self {
            PropertyValue::Int(n) => *n,
            PropertyValue::Bytes(b) if b.len() >= 2 => i64::from(u16::from_le_bytes([b[0], b[1]])),
            PropertyValue::Text(s) => match parse_escaped_bytes(s) {
                Some(b) if b.len() >= 2 => i64::from(u16::from_le_bytes([b[0], b[1]])),
                _ => 0,
            },
            _ => 0,
        }
    }

    /// Interpret as a font size: ints as-is, bytes as a zero-padded 2-byte
    /// little-endian value, text by its first digit run.
    pub fn as_font_size(&self) -> i64 {
        match self {
            PropertyValue::Int(n) => *n,
            PropertyValue::Bytes(b) => {
                let lo = b.first().copied().unwrap_or(0);
                let hi = b.get(1).copied().unwrap_or(0);
                i64::from(u16::from_le_bytes([lo, hi]))
            }
            PropertyValue::Text(s) => first_number(s),
            _ => 0,
        }
    }

    /// Interpret as an unsigned 64-bit value (timestamps): bytes as
    /// little-endian over the first eight.
    pub fn as_u64(&self) -> u64 {
        match self {
            PropertyValue::Int(n) => u64::try_from(*n).unwrap_or(0),
            PropertyValue::Bytes(b) => {
                let mut buf = [0u8; 8];
                let n = b.len().min(8);
                buf[..n].copy_from_slice(&b[..n]);
                u64::from_le_bytes(buf)
            }
            PropertyValue::Text(s) => u64::try_from(first_number(s)).unwrap_or(0),
            _ => 0,
        }
    }

    /// The first byte of the value, as used for list format markers.
    pub fn first_byte(&self) -> u32 {
        match self {
            PropertyValue::Text(s) => match parse_escaped_bytes(s) {
                Some(b) => b.first().map(|&b| u32::from(b)).unwrap_or(0),
                None => s.chars().next().map(u32::from).unwrap_or(0),
            },
            PropertyValue::Bytes(b) => b.first().map(|&b| u32::from(b)).unwrap_or(0),
            PropertyValue::Int(n) => (*n & 0xFF) as u32,
            _ => 0,
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the bytes, if this is a bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Check if this is a reference list.
    pub fn is_ref_list(&self) -> bool {
        matches!(self, PropertyValue::RefList(_))
    }

    /// Reference targets. A single text value counts as one reference.
    pub fn refs(&self) -> Vec<&str> {
        match self {
            PropertyValue::RefList(r) => r.iter().map(Identity::as_str).collect(),
            PropertyValue::Text(s) if !s.is_empty() => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Lossy text form. Bytes are read as UTF-16LE.
    pub fn to_text_lossy(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Int(n) => n.to_string(),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Bytes(b) => encoding_rs::UTF_16LE
                .decode_without_bom_handling(b)
                .0
                .into_owned(),
            PropertyValue::RefList(r) => r
                .iter()
                .map(Identity::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Int(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Int(i64::from(n))
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<Vec<u8>> for PropertyValue {
    fn from(b: Vec<u8>) -> Self {
        PropertyValue::Bytes(b)
    }
}

impl From<&[u8]> for PropertyValue {
    fn from(b: &[u8]) -> Self {
        PropertyValue::Bytes(b.to_vec())
    }
}

fn le_u32(b: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    let n = b.len().min(4);
    buf[..n].copy_from_slice(&b[..n]);
    u32::from_le_bytes(buf)
}

fn first_number(s: &str) -> i64 {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parse the textual escaped-byte form `b'...'` / `b"..."` back into bytes.
fn parse_escaped_bytes(s: &str) -> Option<Vec<u8>> {
    let quote = match s.as_bytes() {
        [b'b', q @ (b'\'' | b'"'), ..] => *q as char,
        _ => return None,
    };
    let body = s.get(2..)?.strip_suffix(quote)?;

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if !c.is_ascii() {
                return None;
            }
            out.push(c as u8);
            continue;
        }
        let byte = match chars.next()? {
            'x' => {
                let hi = chars.next()?.to_digit(16)?;
                let lo = chars.next()?.to_digit(16)?;
                (hi * 16 + lo) as u8
            }
            'n' => b'\n',
            'r' => b'\r',
            't' => b'\t',
            '0' => 0,
            '\\' => b'\\',
            '\'' => b'\'',
            '"' => b'"',
            _ => return None,
        };
        out.push(byte);
    }
    Some(out)
}

mod base64_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use base64::{engine::general_purpose, Engine};
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use base64::{engine::general_purpose, Engine};
        let s = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(&s)
            .map_err(serde::de::Error::custom)
    }
}

/// One decoded object: type tag, identity and property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedObject {
    /// JCID type tag
    #[serde(rename = "type")]
    pub kind: JcidKind,

    /// Identity string
    pub identity: Identity,

    /// Named properties
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

impl TypedObject {
    /// Create an object with no properties.
    pub fn new(kind: JcidKind, identity: impl Into<Identity>) -> Self {
        Self {
            kind,
            identity: identity.into(),
            properties: HashMap::new(),
        }
    }

    /// Set a property and return self.
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    /// Get a property.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Check if a property is present.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Boolean property, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.flag_or(name, false)
    }

    /// Boolean property with an explicit default for absence.
    pub fn flag_or(&self, name: &str, default: bool) -> bool {
        self.get(name).map(PropertyValue::as_bool).unwrap_or(default)
    }

    /// Integer property, 0 when absent.
    pub fn int(&self, name: &str) -> i64 {
        self.get(name).map(PropertyValue::as_int).unwrap_or(0)
    }

    /// Cleaned text property, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name)
            .map(|v| clean_text(&v.to_text_lossy()))
            .unwrap_or_default()
    }

    /// Reference targets of a property, empty when absent.
    pub fn refs(&self, name: &str) -> Vec<&str> {
        self.get(name).map(PropertyValue::refs).unwrap_or_default()
    }

    /// Bare GUID of the identity.
    pub fn guid(&self) -> &str {
        self.identity.guid()
    }

    /// Check the type tag.
    pub fn is(&self, kind: &JcidKind) -> bool {
        &self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_guid() {
        let id = Identity::new("<ExtendedGUID> ({ABC-123}, 138)");
        assert_eq!(id.guid(), "{ABC-123}");

        let id = Identity::from_parts("page-1", 4);
        assert_eq!(id.as_str(), "<ExtendedGUID> (page-1, 4)");
        assert_eq!(id.guid(), "page-1");

        assert_eq!(Identity::new("no guid here").guid(), "");
        assert_eq!(Identity::default().guid(), "");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(JcidKind::from_name("jcidRichTextOENode"), JcidKind::RichTextNode);
        assert_eq!(JcidKind::RichTextNode.name(), "jcidRichTextOENode");
        assert_eq!(
            JcidKind::from_name("jcidPersistablePropertyContainerForTOCSection"),
            JcidKind::StyleContainer
        );

        let other = JcidKind::from_name("jcidSomethingElse");
        assert_eq!(other, JcidKind::Other("jcidSomethingElse".to_string()));
        assert_eq!(other.name(), "jcidSomethingElse");
    }

    #[test]
    fn test_kind_classes() {
        assert!(JcidKind::NumberListNode.is_page_content());
        assert!(!JcidKind::PageNode.is_page_content());
        assert!(JcidKind::EmbeddedFileNode.is_leaf_content());
        assert!(!JcidKind::TableNode.is_leaf_content());
        assert!(JcidKind::OutlineNode.is_outline_boundary());
    }

    #[test]
    fn test_as_int() {
        assert_eq!(PropertyValue::Int(7).as_int(), 7);
        assert_eq!(PropertyValue::Bytes(vec![0x04, 0x00]).as_int(), 4);
        assert_eq!(PropertyValue::Bytes(vec![0x01, 0x01, 0x00, 0x00, 0xFF]).as_int(), 257);
        assert_eq!(PropertyValue::Bytes(vec![0x04]).as_int(), 0);
        assert_eq!(PropertyValue::Text("rows: 12".into()).as_int(), 12);
        assert_eq!(PropertyValue::Text("none".into()).as_int(), 0);
        assert_eq!(PropertyValue::ref_list(["a"]).as_int(), 0);
    }

    #[test]
    fn test_as_short() {
        assert_eq!(PropertyValue::Int(36).as_short(), 36);
        assert_eq!(PropertyValue::Bytes(vec![0x24, 0x00]).as_short(), 36);
        assert_eq!(PropertyValue::Text("b'$\\x00'".into()).as_short(), 36);
        assert_eq!(PropertyValue::Text("b'\\x04\\x00'".into()).as_short(), 4);
        assert_eq!(PropertyValue::Text("b'invalid".into()).as_short(), 0);
        assert_eq!(PropertyValue::Text("plain".into()).as_short(), 0);
        assert_eq!(PropertyValue::Bytes(vec![0x01]).as_short(), 0);
    }

    #[test]
    fn test_as_font_size() {
        assert_eq!(PropertyValue::Int(22).as_font_size(), 22);
        assert_eq!(PropertyValue::Bytes(vec![0x16]).as_font_size(), 22);
        assert_eq!(PropertyValue::Bytes(vec![0x16, 0x00, 0x99]).as_font_size(), 22);
        assert_eq!(PropertyValue::Text("11pt".into()).as_font_size(), 11);
    }

    #[test]
    fn test_as_bool() {
        assert!(PropertyValue::Bool(true).as_bool());
        assert!(PropertyValue::Text("Yes".into()).as_bool());
        assert!(PropertyValue::Text("1".into()).as_bool());
        assert!(!PropertyValue::Text("no".into()).as_bool());
        assert!(PropertyValue::Int(1).as_bool());
        assert!(!PropertyValue::Int(0).as_bool());
    }

    #[test]
    fn test_first_byte() {
        assert_eq!(PropertyValue::Text("\u{3}rest".into()).first_byte(), 3);
        assert_eq!(PropertyValue::Bytes(vec![0x03, 0x00]).first_byte(), 3);
        assert_eq!(PropertyValue::Text("b'\\x03\\x00'".into()).first_byte(), 3);
        assert_eq!(PropertyValue::Text(String::new()).first_byte(), 0);
    }

    #[test]
    fn test_as_u64() {
        let ft: u64 = 0x01D9_0000_0000_0000;
        assert_eq!(PropertyValue::Bytes(ft.to_le_bytes().to_vec()).as_u64(), ft);
        assert_eq!(PropertyValue::Int(-1).as_u64(), 0);
    }

    #[test]
    fn test_refs() {
        let refs = PropertyValue::ref_list(["a", "b"]);
        assert_eq!(refs.refs(), vec!["a", "b"]);
        assert_eq!(PropertyValue::Text("single".into()).refs(), vec!["single"]);
        assert!(PropertyValue::Int(3).refs().is_empty());
    }

    #[test]
    fn test_to_text_lossy() {
        let utf16: Vec<u8> = "Hi".encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        assert_eq!(PropertyValue::Bytes(utf16).to_text_lossy(), "Hi");
        assert_eq!(PropertyValue::Int(5).to_text_lossy(), "5");
    }

    #[test]
    fn test_object_accessors() {
        let obj = TypedObject::new(JcidKind::TableNode, Identity::from_parts("t", 1))
            .with(props::ROW_COUNT, 3)
            .with(props::TABLE_BORDERS_VISIBLE, false)
            .with(props::AUTHOR, "Alice\u{0}");

        assert_eq!(obj.int(props::ROW_COUNT), 3);
        assert_eq!(obj.int(props::COLUMN_COUNT), 0);
        assert!(!obj.flag_or(props::TABLE_BORDERS_VISIBLE, true));
        assert!(obj.flag_or(props::BOLD, true));
        assert_eq!(obj.text(props::AUTHOR), "Alice");
        assert_eq!(obj.guid(), "t");
    }

    #[test]
    fn test_serde_shape() {
        let json = r#"{
            "type": "jcidImageNode",
            "identity": "<ExtendedGUID> (g, 1)",
            "properties": {
                "PictureContainer": {"Bytes": "iVBORw0KGgo="},
                "ImageAltText": {"Text": "logo"},
                "ElementChildNodesOfVersionHistory": {"RefList": ["x", "y"]}
            }
        }"#;
        let obj: TypedObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.kind, JcidKind::ImageNode);
        assert_eq!(
            obj.get(props::PICTURE_CONTAINER).and_then(|v| v.as_bytes()),
            Some(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A][..])
        );
        assert_eq!(obj.refs(props::CHILD_NODES), vec!["x", "y"]);

        let back = serde_json::to_string(&obj).unwrap();
        assert!(back.contains("\"type\":\"jcidImageNode\""));
        assert!(back.contains("iVBORw0KGgo="));
    }
}
