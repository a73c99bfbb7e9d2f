//! Revision de-duplication.
//!
//! Pages often carry several stored copies of the same content, one per
//! revision. The object pass drops whole repeated objects before the scan;
//! the element pass drops repeated paragraphs that survived it.

use super::decode::{decode_text, TextField};
use super::object::{props, JcidKind, TypedObject};
use crate::model::{ContentElement, ListType};
use std::collections::HashSet;

/// Content fingerprint of an object, empty when it has none.
pub fn fingerprint(obj: &TypedObject) -> String {
    match obj.kind {
        JcidKind::RichTextNode => {
            let text = primary_or_secondary_text(obj);
            if text.trim().is_empty() {
                String::new()
            } else {
                format!("text:{}", text)
            }
        }
        JcidKind::ImageNode => {
            let filename = obj.text(props::IMAGE_FILENAME);
            let alt = obj.text(props::IMAGE_ALT_TEXT);
            if filename.is_empty() && alt.is_empty() {
                String::new()
            } else {
                format!("img:{}:{}", filename, alt)
            }
        }
        JcidKind::EmbeddedFileNode => {
            let name = obj.text(props::EMBEDDED_FILE_NAME);
            if name.is_empty() {
                String::new()
            } else {
                format!("file:{}", name)
            }
        }
        _ => String::new(),
    }
}

/// Decoded text of a rich-text object: the primary field when it is
/// present, otherwise the secondary one.
pub fn primary_or_secondary_text(obj: &TypedObject) -> String {
    match obj.get(props::RICH_EDIT_TEXT_UNICODE) {
        Some(value) if value.is_truthy() => decode_text(value, TextField::Primary),
        _ => match obj.get(props::TEXT_EXTENDED_ASCII) {
            Some(value) if value.is_truthy() => decode_text(value, TextField::Secondary),
            _ => String::new(),
        },
    }
}

/// Drop whole-object repeats caused by revision history.
///
/// Runs only when there are at least four objects, at least two content
/// fingerprints, and the first fingerprint occurs again. Objects without a
/// fingerprint are always kept; fingerprinted objects keep their first
/// occurrence.
pub fn deduplicate_objects<'a>(objects: &[&'a TypedObject]) -> Vec<&'a TypedObject> {
    if objects.len() < 4 {
        return objects.to_vec();
    }

    let prints: Vec<String> = objects.iter().map(|o| fingerprint(o)).collect();
    let content: Vec<&str> = prints
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect();

    if content.len() < 2 {
        return objects.to_vec();
    }
    let first = content[0];
    if !content[1..].contains(&first) {
        return objects.to_vec();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept: Vec<&'a TypedObject> = Vec::with_capacity(objects.len());
    for (obj, print) in objects.iter().zip(&prints) {
        if print.is_empty() || seen.insert(print.as_str()) {
            kept.push(*obj);
        }
    }

    log::debug!(
        "Dropped {} duplicated revision objects",
        objects.len() - kept.len()
    );
    kept
}

/// Drop later rich-text elements whose text and list kind repeat an
/// earlier one. Other element kinds pass through.
pub fn deduplicate_elements(elements: Vec<ContentElement>) -> Vec<ContentElement> {
    let mut seen: HashSet<(String, Option<ListType>)> = HashSet::new();
    elements
        .into_iter()
        .filter(|element| match element {
            ContentElement::RichText(rt) => seen.insert((rt.plain_text(), rt.list_type)),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RichText;
    use crate::parser::object::Identity;

    fn text(seq: u32, s: &str) -> TypedObject {
        TypedObject::new(JcidKind::RichTextNode, Identity::from_parts("g", seq))
            .with(props::RICH_EDIT_TEXT_UNICODE, s)
    }

    fn outline(seq: u32) -> TypedObject {
        TypedObject::new(JcidKind::OutlineElementNode, Identity::from_parts("g", seq))
    }

    fn texts(objects: &[&TypedObject]) -> Vec<String> {
        objects.iter().map(|o| primary_or_secondary_text(o)).collect()
    }

    #[test]
    fn test_fingerprints() {
        assert_eq!(fingerprint(&text(1, "Hi")), "text:Hi");
        assert_eq!(fingerprint(&text(1, "  ")), "");
        assert_eq!(fingerprint(&outline(1)), "");

        let img = TypedObject::new(JcidKind::ImageNode, Identity::from_parts("g", 1))
            .with(props::IMAGE_FILENAME, "a.png");
        assert_eq!(fingerprint(&img), "img:a.png:");

        let file = TypedObject::new(JcidKind::EmbeddedFileNode, Identity::from_parts("g", 1))
            .with(props::EMBEDDED_FILE_NAME, "doc.pdf");
        assert_eq!(fingerprint(&file), "file:doc.pdf");
    }

    #[test]
    fn test_secondary_text_fallback() {
        let obj = TypedObject::new(JcidKind::RichTextNode, Identity::from_parts("g", 1))
            .with(props::TEXT_EXTENDED_ASCII, "48656c6c6f");
        assert_eq!(primary_or_secondary_text(&obj), "Hello");
    }

    #[test]
    fn test_small_input_unchanged() {
        let a = text(1, "A");
        let b = text(2, "A");
        let c = outline(3);
        let input = vec![&a, &b, &c];
        assert_eq!(deduplicate_objects(&input).len(), 3);
    }

    #[test]
    fn test_first_fingerprint_not_repeated_is_unchanged() {
        let objs = [text(1, "A"), text(2, "B"), text(3, "B"), outline(4)];
        let input: Vec<&TypedObject> = objs.iter().collect();
        assert_eq!(deduplicate_objects(&input).len(), 4);
    }

    #[test]
    fn test_repeated_revision_collapsed() {
        let objs = [
            outline(1),
            text(2, "A"),
            text(3, "B"),
            outline(4),
            text(5, "A"),
            text(6, "B"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = deduplicate_objects(&input);

        assert_eq!(out.len(), 4);
        assert_eq!(texts(&out), vec!["", "A", "B", ""]);
    }

    #[test]
    fn test_idempotent() {
        let objs = [
            text(1, "A"),
            outline(2),
            text(3, "A"),
            text(4, "C"),
            outline(5),
            text(6, "C"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let once = deduplicate_objects(&input);
        let twice = deduplicate_objects(&once);

        let ids = |v: &[&TypedObject]| v.iter().map(|o| o.identity.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_element_dedup_respects_list_type() {
        let plain = RichText::with_text("Item");
        let bullet = RichText::list_item("Item", ListType::Unordered, 0);
        let bullet_nested = RichText::list_item("Item", ListType::Unordered, 2);

        let out = deduplicate_elements(vec![
            plain.clone().into(),
            bullet.into(),
            bullet_nested.into(),
            plain.into(),
        ]);
        assert_eq!(out.len(), 2);
        assert!(out[0].as_rich_text().unwrap().list_type.is_none());
        assert_eq!(
            out[1].as_rich_text().unwrap().list_type,
            Some(ListType::Unordered)
        );
    }
}
