//! Object dump decoding and the file-level entry points.

use std::fs;

use unone::render::to_json;
use unone::{
    detect_format_from_path, parse_file, Error, JsonFormat, SectionDecoder, SectionParser,
    SourceFormat, Unone,
};

const MEETINGS: &str = r#"{
    "objects": [
        {"type": "jcidSectionMetaData", "identity": "<ExtendedGUID> (sec, 1)",
         "properties": {"SectionDisplayName": {"Text": "Team Meetings"}}},
        {"type": "jcidPageMetaData", "identity": "<ExtendedGUID> (m, 1)",
         "properties": {"CachedTitleString": {"Text": "Standup"},
                        "PageLevel": {"Int": 1}}},
        {"type": "jcidPageNode", "identity": "<ExtendedGUID> (m, 2)"},
        {"type": "jcidOutlineElementNode", "identity": "<ExtendedGUID> (m, 3)"},
        {"type": "jcidRichTextOENode", "identity": "<ExtendedGUID> (m, 4)",
         "properties": {"RichEditTextUnicode": {"Text": "Blocked on review\u0000"},
                        "ParagraphStyle": {"RefList": ["<ExtendedGUID> (style, 7)"]}}},
        {"type": "jcidOutlineElementNode", "identity": "<ExtendedGUID> (m, 5)"},
        {"type": "jcidSomeFutureNode", "identity": "<ExtendedGUID> (m, 6)"},
        {"type": "jcidRichTextOENode", "identity": "<ExtendedGUID> (m, 7)",
         "properties": {"TextExtendedAscii": {"Text": "Legacy text"}}}
    ],
    "paragraph_styles": {"<ExtendedGUID> (style, 7)": "h3"}
}"#;

#[test]
fn test_decode_dump() {
    let decoded = unone::JsonDumpDecoder::new()
        .decode(MEETINGS.as_bytes())
        .unwrap();
    assert_eq!(decoded.objects.len(), 8);
    assert_eq!(decoded.display_name().as_deref(), Some("Team Meetings"));
    assert_eq!(
        decoded.paragraph_styles.get("<ExtendedGUID> (style, 7)").map(String::as_str),
        Some("h3")
    );
}

#[test]
fn test_parse_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Meetings (On 4-2-25).one.json");
    fs::write(&path, MEETINGS).unwrap();

    assert_eq!(detect_format_from_path(&path).unwrap(), SourceFormat::ObjectDump);

    let section = parse_file(&path).unwrap();
    assert_eq!(section.name, "Team Meetings");
    assert_eq!(section.file_path.as_deref(), Some(path.as_path()));

    let page = &section.pages[0];
    assert_eq!(page.title, "Standup");
    assert_eq!(page.level, 1);
    assert_eq!(page.elements.len(), 2);

    let heading = page.elements[0].as_rich_text().unwrap();
    assert_eq!(heading.heading_level, Some(3));
    assert_eq!(heading.plain_text(), "Blocked on review");
    assert_eq!(page.elements[1].plain_text(), "Legacy text");
}

#[test]
fn test_builder_renders_dump() {
    let markdown = Unone::new()
        .sequential()
        .parse_bytes(MEETINGS.as_bytes())
        .unwrap()
        .to_markdown()
        .unwrap();
    assert!(markdown.starts_with("# Standup\n\n### Blocked on review\n\nLegacy text"));
}

#[test]
fn test_json_output() {
    let section = SectionParser::from_bytes(MEETINGS.as_bytes()).unwrap().parse();
    let json = to_json(&section, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "Team Meetings");
    assert_eq!(value["pages"][0]["title"], "Standup");
}

#[test]
fn test_rejects_binary_and_garbage() {
    let mut header = vec![
        0xE4, 0x52, 0x5C, 0x7B, 0x8C, 0xD8, 0xA7, 0x4D, 0xAE, 0xB1, 0x53, 0x78, 0xD0, 0x29,
        0x96, 0xD3,
    ];
    header.resize(64, 0);
    header[48..64].copy_from_slice(&[
        0x3F, 0xDD, 0x9A, 0x10, 0x1B, 0x91, 0xF5, 0x49, 0xA5, 0xD0, 0x17, 0x91, 0xED, 0xC8,
        0xAE, 0xD8,
    ]);
    assert!(matches!(
        SectionParser::from_bytes(&header),
        Err(Error::UnsupportedFormat(_))
    ));

    assert!(matches!(
        SectionParser::from_bytes(b"plain text, not a section"),
        Err(Error::UnknownFormat)
    ));
    assert!(matches!(
        SectionParser::from_bytes(b"{\"objects\": 5}"),
        Err(Error::Json(_))
    ));
}
