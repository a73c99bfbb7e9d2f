//! Section parser: decoder plus reconstruction for one file, and batch
//! parsing across many.

use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::Section;

use super::extractor::extract_section;
use super::options::{ErrorMode, ParseOptions};
use super::source::{DecodedSection, JsonDumpDecoder, SectionDecoder};

/// OneNote section parser.
pub struct SectionParser {
    decoded: DecodedSection,
    path: Option<PathBuf>,
    options: ParseOptions,
}

impl SectionParser {
    /// Open a section file with the default decoder.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a section file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        Self::open_with_decoder(path, options, &JsonDumpDecoder::new())
    }

    /// Open a section file with a specific decoder.
    pub fn open_with_decoder<P: AsRef<Path>>(
        path: P,
        options: ParseOptions,
        decoder: &dyn SectionDecoder,
    ) -> Result<Self> {
        let path = path.as_ref();

        // Reject unrecognized files before reading them whole
        detect_format_from_path(path)?;

        let data = std::fs::read(path)?;
        let decoded = decoder.decode(&data)?;
        Ok(Self {
            decoded,
            path: Some(path.to_path_buf()),
            options,
        })
    }

    /// Parse a section from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a section from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::from_bytes_with_decoder(data, options, &JsonDumpDecoder::new())
    }

    /// Parse a section from bytes with a specific decoder.
    pub fn from_bytes_with_decoder(
        data: &[u8],
        options: ParseOptions,
        decoder: &dyn SectionDecoder,
    ) -> Result<Self> {
        let decoded = decoder.decode(data)?;
        Ok(Self {
            decoded,
            path: None,
            options,
        })
    }

    /// Parse a section from a reader.
    pub fn from_reader<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Wrap an already decoded object stream.
    pub fn from_decoded(decoded: DecodedSection, options: ParseOptions) -> Self {
        Self {
            decoded,
            path: None,
            options,
        }
    }

    /// Set the path used for naming the section when it has no display name.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The decoded object stream.
    pub fn decoded(&self) -> &DecodedSection {
        &self.decoded
    }

    /// Reconstruct the section's pages.
    pub fn parse(&self) -> Section {
        extract_section(&self.decoded, self.path.as_deref(), &self.options)
    }
}

/// Result of parsing many section files.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Sections that parsed, in input order
    pub sections: Vec<Section>,

    /// Files that failed, with their error (lenient mode only)
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchOutcome {
    /// True when there was at least one input and none of them parsed.
    pub fn all_failed(&self) -> bool {
        self.sections.is_empty() && !self.failures.is_empty()
    }
}

/// Parse many section files.
///
/// Files are independent and parsed in parallel when the options allow.
/// In strict mode the first failure (in input order) is returned as the
/// error; in lenient mode failures are logged and collected.
pub fn parse_sections<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ParseOptions,
    decoder: &dyn SectionDecoder,
) -> Result<BatchOutcome> {
    let parse_one = |path: &P| -> Result<Section> {
        let parser = SectionParser::open_with_decoder(path, options.clone(), decoder)?;
        Ok(parser.parse())
    };

    let results: Vec<Result<Section>> = if options.parallel {
        paths.par_iter().map(parse_one).collect()
    } else {
        paths.iter().map(parse_one).collect()
    };

    let mut outcome = BatchOutcome::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(section) => outcome.sections.push(section),
            Err(e) => {
                if options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Skipping {}: {}", path.as_ref().display(), e);
                outcome.failures.push((path.as_ref().to_path_buf(), e));
            }
        }
    }
    Ok(outcome)
}
