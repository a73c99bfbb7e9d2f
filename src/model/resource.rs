//! Binary payloads carried by pages: images and embedded files.

use serde::{Deserialize, Serialize};

/// An image placed on a page or inside a table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Raw binary data (empty if the payload could not be resolved)
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Filename (generated from the format when the section has none)
    pub filename: String,

    /// Alternative text
    pub alt_text: Option<String>,

    /// Declared width
    pub width: Option<u32>,

    /// Declared height
    pub height: Option<u32>,

    /// Format guessed from the payload signature
    pub format: Option<ImageFormat>,
}

impl Image {
    /// Create an image from its payload; the format is detected from the data.
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        let format = ImageFormat::detect(&data);
        Self {
            data,
            filename: filename.into(),
            format,
            ..Self::default()
        }
    }

    /// Set the alt text and return self.
    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    /// Set declared dimensions and return self.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Whether the binary payload is present.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Get the data size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension for the payload, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        self.format.map(|f| f.extension()).unwrap_or("bin")
    }
}

/// A file attached to a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedFile {
    /// Raw binary data (may be empty)
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Display filename
    pub filename: String,

    /// Path the file was inserted from, when recorded
    pub source_path: Option<String>,

    /// Format guessed from the payload signature
    pub format: Option<ImageFormat>,
}

impl EmbeddedFile {
    /// Create an embedded file.
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        let format = ImageFormat::detect(&data);
        Self {
            data,
            filename: filename.into(),
            source_path: None,
            format,
        }
    }

    /// Whether the binary payload is present.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    /// Get the data size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Image formats recognized from payload signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG
    Png,
    /// JPEG
    Jpeg,
    /// GIF (87a or 89a)
    Gif,
    /// Windows bitmap
    Bmp,
    /// WebP
    Webp,
}

impl ImageFormat {
    /// Detect the format from magic bytes. Payloads shorter than four
    /// bytes are never recognized.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::Webp);
        }

        None
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Webp => "webp",
        }
    }

    /// MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(ImageFormat::detect(&png), Some(ImageFormat::Png));

        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(ImageFormat::detect(&jpeg), Some(ImageFormat::Jpeg));

        assert_eq!(ImageFormat::detect(b"GIF89a.."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"BM\x00\x00"), Some(ImageFormat::Bmp));
        assert_eq!(
            ImageFormat::detect(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
    }

    #[test]
    fn test_detect_short_or_unknown() {
        assert_eq!(ImageFormat::detect(b"BM"), None);
        assert_eq!(ImageFormat::detect(&[0xFF, 0xD8, 0xFF]), None);
        assert_eq!(ImageFormat::detect(b"not an image"), None);
        assert_eq!(ImageFormat::detect(b"RIFF\x00\x00"), None);
    }

    #[test]
    fn test_image_new() {
        let img = Image::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "photo.jpg").with_alt_text("A photo");
        assert!(img.has_data());
        assert_eq!(img.format, Some(ImageFormat::Jpeg));
        assert_eq!(img.extension(), "jpeg");
        assert_eq!(img.alt_text.as_deref(), Some("A photo"));
        assert_eq!(Image::default().extension(), "bin");
    }

    #[test]
    fn test_embedded_file() {
        let file = EmbeddedFile::new(b"%PDF-1.7".to_vec(), "report.pdf");
        assert!(file.has_data());
        assert_eq!(file.size(), 8);
        assert_eq!(file.format, None);
    }
}
