//! Image and embedded-file extraction.

use super::object::{props, PropertyValue, TypedObject};
use crate::model::{EmbeddedFile, Image, ImageFormat};
use std::collections::HashMap;

/// Resolve a container property to its payload: raw bytes inline, or the
/// first reference found in the blob store.
fn resolve_payload(value: Option<&PropertyValue>, file_data: &HashMap<String, Vec<u8>>) -> Vec<u8> {
    match value {
        Some(PropertyValue::Bytes(data)) => data.clone(),
        Some(value @ PropertyValue::RefList(_)) => value
            .refs()
            .into_iter()
            .find_map(|r| file_data.get(r))
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn positive(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|&v| v > 0)
}

/// Build an image element. Returns `None` when there is neither a payload
/// nor a filename.
pub fn extract_image(
    obj: &TypedObject,
    file_data: &HashMap<String, Vec<u8>>,
    keep_payload: bool,
) -> Option<Image> {
    let filename = obj.text(props::IMAGE_FILENAME);
    let alt_text = obj.text(props::IMAGE_ALT_TEXT);
    let data = resolve_payload(obj.get(props::PICTURE_CONTAINER), file_data);

    if data.is_empty() && filename.is_empty() {
        return None;
    }

    let format = ImageFormat::detect(&data);
    let filename = if filename.is_empty() {
        format!("image.{}", format.map(|f| f.extension()).unwrap_or("bin"))
    } else {
        filename
    };

    Some(Image {
        data: if keep_payload { data } else { Vec::new() },
        filename,
        alt_text: (!alt_text.is_empty()).then_some(alt_text),
        width: positive(obj.int(props::PICTURE_WIDTH)),
        height: positive(obj.int(props::PICTURE_HEIGHT)),
        format,
    })
}

/// Build an embedded file element. Returns `None` when there is neither a
/// filename nor a payload.
pub fn extract_embedded_file(
    obj: &TypedObject,
    file_data: &HashMap<String, Vec<u8>>,
    keep_payload: bool,
) -> Option<EmbeddedFile> {
    let filename = obj.text(props::EMBEDDED_FILE_NAME);
    let source_path = obj.text(props::SOURCE_FILEPATH);
    let data = resolve_payload(obj.get(props::EMBEDDED_FILE_CONTAINER), file_data);

    if filename.is_empty() && data.is_empty() {
        return None;
    }

    Some(EmbeddedFile {
        format: ImageFormat::detect(&data),
        data: if keep_payload { data } else { Vec::new() },
        filename,
        source_path: (!source_path.is_empty()).then_some(source_path),
    })
}
