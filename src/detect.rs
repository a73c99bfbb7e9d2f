//! Section format detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Recognized input container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Binary MS-ONESTORE section file (`.one`)
    Section,
    /// Binary MS-ONESTORE table of contents (`.onetoc2`)
    TableOfContents,
    /// JSON dump of an already-decoded object stream
    ObjectDump,
}

impl SourceFormat {
    /// Whether this format carries page content.
    pub fn has_pages(&self) -> bool {
        !matches!(self, SourceFormat::TableOfContents)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Section => write!(f, "OneNote section"),
            SourceFormat::TableOfContents => write!(f, "OneNote table of contents"),
            SourceFormat::ObjectDump => write!(f, "object dump"),
        }
    }
}

/// guidFileType of a `.one` section: {7B5C52E4-D88C-4DA7-AEB1-5378D02996D3}
const SECTION_FILE_TYPE: [u8; 16] = [
    0xE4, 0x52, 0x5C, 0x7B, 0x8C, 0xD8, 0xA7, 0x4D, 0xAE, 0xB1, 0x53, 0x78, 0xD0, 0x29, 0x96, 0xD3,
];

/// guidFileType of a `.onetoc2` file: {43FF2FA1-EFD9-4C76-9EE2-10EA5722765F}
const TOC_FILE_TYPE: [u8; 16] = [
    0xA1, 0x2F, 0xFF, 0x43, 0xD9, 0xEF, 0x76, 0x4C, 0x9E, 0xE2, 0x10, 0xEA, 0x57, 0x22, 0x76, 0x5F,
];

/// guidFileFormat shared by both: {109ADD3F-911B-49F5-A5D0-1791EDC8AED8}
const FILE_FORMAT: [u8; 16] = [
    0x3F, 0xDD, 0x9A, 0x10, 0x1B, 0x91, 0xF5, 0x49, 0xA5, 0xD0, 0x17, 0x91, 0xED, 0xC8, 0xAE, 0xD8,
];

const FILE_FORMAT_OFFSET: usize = 48;
const HEADER_PROBE_LEN: u64 = 64;

/// Detect the source format from a file path.
///
/// # Example
/// ```no_run
/// use unone::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("Notes.one").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_PROBE_LEN as usize);
    BufReader::new(file)
        .take(HEADER_PROBE_LEN)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the leading bytes of a file.
///
/// # Returns
/// * `Ok(SourceFormat)` if the header matches a known container
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if looks_like_json(data) {
        return Ok(SourceFormat::ObjectDump);
    }

    if data.len() < SECTION_FILE_TYPE.len() {
        return Err(Error::UnknownFormat);
    }

    let format = if data.starts_with(&SECTION_FILE_TYPE) {
        SourceFormat::Section
    } else if data.starts_with(&TOC_FILE_TYPE) {
        SourceFormat::TableOfContents
    } else {
        return Err(Error::UnknownFormat);
    };

    // The format GUID is only checked when enough of the header is present.
    if data.len() >= FILE_FORMAT_OFFSET + FILE_FORMAT.len()
        && data[FILE_FORMAT_OFFSET..FILE_FORMAT_OFFSET + FILE_FORMAT.len()] != FILE_FORMAT
    {
        return Err(Error::Decode("unexpected guidFileFormat in header".to_string()));
    }

    Ok(format)
}

fn looks_like_json(data: &[u8]) -> bool {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|&b| b == b'{')
        .unwrap_or(false)
}

/// Check if a file is a readable OneNote section (binary or dump).
pub fn is_section<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path)
        .map(|f| f.has_pages())
        .unwrap_or(false)
}

/// Check if bytes start like a readable OneNote section (binary or dump).
pub fn is_section_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data)
        .map(|f| f.has_pages())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(file_type: [u8; 16]) -> Vec<u8> {
        let mut data = vec![0u8; 64];
        data[..16].copy_from_slice(&file_type);
        data[FILE_FORMAT_OFFSET..FILE_FORMAT_OFFSET + 16].copy_from_slice(&FILE_FORMAT);
        data
    }

    #[test]
    fn test_detect_section() {
        let data = header(SECTION_FILE_TYPE);
        assert_eq!(detect_format_from_bytes(&data).unwrap(), SourceFormat::Section);
    }

    #[test]
    fn test_detect_toc() {
        let data = header(TOC_FILE_TYPE);
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format, SourceFormat::TableOfContents);
        assert!(!format.has_pages());
    }

    #[test]
    fn test_detect_json_dump() {
        assert_eq!(
            detect_format_from_bytes(b"  \n{\"objects\": []}").unwrap(),
            SourceFormat::ObjectDump
        );
        assert_eq!(
            detect_format_from_bytes(b"\xEF\xBB\xBF{}").unwrap(),
            SourceFormat::ObjectDump
        );
    }

    #[test]
    fn test_detect_bad_file_format_guid() {
        let mut data = header(SECTION_FILE_TYPE);
        data[FILE_FORMAT_OFFSET] = 0;
        assert!(matches!(detect_format_from_bytes(&data), Err(Error::Decode(_))));
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3 padding");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(&SECTION_FILE_TYPE[..8]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_is_section_bytes() {
        assert!(is_section_bytes(&header(SECTION_FILE_TYPE)));
        assert!(!is_section_bytes(&header(TOC_FILE_TYPE)));
        assert!(!is_section_bytes(b""));
    }
}
