//! Text and timestamp normalization for decoded property values.
//!
//! Text properties arrive in several shapes depending on how the decoder
//! produced them: native text, a hex-digit string, or raw bytes. The
//! primary field (`RichEditTextUnicode`) is UTF-16LE; the secondary field
//! (`TextExtendedAscii`) is single-byte ASCII and is sometimes handed over
//! already misread as UTF-16, which [`looks_garbled`] detects.

use super::object::PropertyValue;
use chrono::{DateTime, Utc};

/// Which text property a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// `RichEditTextUnicode` (UTF-16LE)
    Primary,
    /// `TextExtendedAscii` (ASCII)
    Secondary,
}

/// Remove NUL, vertical tab and U+FFFD, map U+202F to a space, and trim.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| c != '\0' && c != '\u{0B}' && c != char::REPLACEMENT_CHARACTER)
        .map(|c| if c == '\u{202F}' { ' ' } else { c })
        .collect();
    cleaned.trim().to_string()
}

/// Decode a text property value into clean text.
pub fn decode_text(value: &PropertyValue, field: TextField) -> String {
    match value {
        PropertyValue::Text(s) => decode_text_str(s, field),
        PropertyValue::Bytes(raw) => match field {
            TextField::Secondary => clean_text(&decode_ascii(raw)),
            TextField::Primary => match encoding_rs::UTF_16LE
                .decode_without_bom_handling_and_without_replacement(raw)
            {
                Some(text) => clean_text(&text),
                None => clean_text(&decode_latin1(raw)),
            },
        },
        PropertyValue::Int(0) => String::new(),
        PropertyValue::Int(n) => n.to_string(),
        PropertyValue::Bool(_) | PropertyValue::RefList(_) => String::new(),
    }
}

fn decode_text_str(s: &str, field: TextField) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(raw) = decode_hex(trimmed) {
        return match field {
            TextField::Secondary => clean_text(&decode_ascii(&raw)),
            TextField::Primary => {
                clean_text(&encoding_rs::UTF_16LE.decode_without_bom_handling(&raw).0)
            }
        };
    }

    if field == TextField::Secondary && looks_garbled(trimmed) {
        let raw: Vec<u8> = trimmed
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect();
        return clean_text(&decode_ascii(&raw));
    }

    clean_text(trimmed)
}

/// Check whether text looks like ASCII bytes that were misread as UTF-16:
/// longer than two characters with more than 30% above U+00FF.
pub fn looks_garbled(text: &str) -> bool {
    let total = text.chars().count();
    if total <= 2 {
        return false;
    }
    let wide = text.chars().filter(|&c| u32::from(c) > 0xFF).count();
    wide as f64 / total as f64 > 0.3
}

/// Decode an all-hex string of even length. Anything else is not hex text.
fn decode_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}

/// ASCII decode; bytes above 0x7F become U+FFFD.
fn decode_ascii(raw: &[u8]) -> String {
    raw.iter()
        .map(|&b| {
            if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// Single-byte Latin-1 decode (every byte maps to U+0000..U+00FF).
fn decode_latin1(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}

/// Seconds between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// Seconds between 1970-01-01 and 1980-01-01.
const TIME32_UNIX_OFFSET_SECS: i64 = 315_532_800;

/// Convert a Windows FILETIME (100 ns ticks since 1601) to UTC.
pub fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    if ticks == 0 {
        return None;
    }
    let secs = i64::try_from(ticks / 10_000_000)
        .ok()?
        .checked_sub(FILETIME_UNIX_OFFSET_SECS)?;
    let nanos = ((ticks % 10_000_000) * 100) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Convert a Time32 value (seconds since 1980-01-01) to UTC.
pub fn time32_to_datetime(secs: u64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    let secs = i64::try_from(secs)
        .ok()?
        .checked_add(TIME32_UNIX_OFFSET_SECS)?;
    DateTime::from_timestamp(secs, 0)
}

/// Read a timestamp property. Text in RFC 3339 form is parsed directly;
/// numeric values are interpreted with `from_ticks`.
pub fn timestamp(
    value: Option<&PropertyValue>,
    from_ticks: fn(u64) -> Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let value = value?;
    if let Some(text) = value.as_text() {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text.trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    from_ticks(value.as_u64())
}
