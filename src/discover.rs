//! Section file discovery and notebook grouping.
//!
//! OneNote backups name sections like `Work (On 2-25-26).one` or
//! `Work.one (On 10-3-22).one`, and a notebook directory often holds several
//! dated copies of the same section. Discovery finds section files, groups
//! them by directory, and keeps the newest copy of each section.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::Result;
use crate::model::UNTITLED;

fn date_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*\(On\s+\d+-\d+-\d+(?:\s*-\s*\d+)?\)").expect("valid date suffix pattern")
    })
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(On\s+(\d+)-(\d+)-(\d+)(?:\s*-\s*\d+)?\)").expect("valid date pattern")
    })
}

/// Section files of one notebook directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookSources {
    /// Notebook name (the directory name)
    pub name: String,

    /// Notebook directory
    pub dir: PathBuf,

    /// Newest copy of each section, sorted by path
    pub files: Vec<PathBuf>,
}

/// Whether a path names a section file: `.one` or a `.one.json` object dump.
/// Table-of-contents files (`.onetoc2`) are not sections.
pub fn is_section_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    !name.ends_with(".onetoc2") && (name.ends_with(".one") || name.ends_with(".one.json"))
}

/// Recursively find section files under `dir`, sorted by path.
///
/// Directory symlinks are not followed. Entries that cannot be read are
/// skipped; only an unreadable `dir` itself is an error.
pub fn discover_section_files(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::read_dir(dir)?;

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_section_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Section name from a file name.
///
/// `ADI (On 2-25-26).one` and `ADI.one (On 10-3-22).one` both name the
/// section `ADI`. An empty result is `Untitled`.
pub fn section_name_from_filename(filename: &str) -> String {
    let name = filename
        .strip_suffix(".json")
        .or_else(|| filename.strip_suffix(".JSON"))
        .unwrap_or(filename);
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);

    let stripped = date_suffix_regex().replace_all(stem, "");
    let name: &str = &stripped;
    let name = match name.len().checked_sub(4).and_then(|i| name.get(i..).map(|tail| (i, tail))) {
        Some((i, tail)) if tail.eq_ignore_ascii_case(".one") => &name[..i],
        _ => name,
    };

    let name = name.trim();
    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name.to_string()
    }
}

/// Section name from a path's file name.
pub fn section_name_from_path(path: &Path) -> String {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    section_name_from_filename(&filename)
}

/// Notebook name from its directory.
pub fn notebook_name_from_dir(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// The `(On M-D-YY)` date embedded in a file name as `(year, month, day)`.
/// Two-digit years below 50 are 20xx, the rest 19xx.
pub fn section_date(filename: &str) -> Option<(u32, u32, u32)> {
    let caps = date_regex().captures(filename)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (month, day, mut year) = (field(1)?, field(2)?, field(3)?);
    if year < 100 {
        year += if year < 50 { 2000 } else { 1900 };
    }
    Some((year, month, day))
}

/// Keep only the newest copy of each section.
///
/// Files are grouped by section name; the copy with the latest embedded date
/// wins and undated copies count as oldest. Ties keep the first file in
/// input order. The result is ordered by section name.
pub fn latest_versions(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut versions: BTreeMap<String, Vec<(&PathBuf, (u32, u32, u32))>> = BTreeMap::new();
    for file in files {
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let date = section_date(&filename).unwrap_or((0, 0, 0));
        versions
            .entry(section_name_from_filename(&filename))
            .or_default()
            .push((file, date));
    }

    let mut latest = Vec::with_capacity(versions.len());
    for (name, mut copies) in versions {
        copies.sort_by(|a, b| b.1.cmp(&a.1));
        let (kept, _) = copies[0];
        if copies.len() > 1 {
            let skipped: Vec<String> = copies[1..]
                .iter()
                .map(|(p, _)| p.display().to_string())
                .collect();
            log::info!(
                "Section '{}': using {}, skipping older: {}",
                name,
                kept.display(),
                skipped.join(", ")
            );
        }
        latest.push(kept.clone());
    }
    latest
}

/// Discover section files under `dir`, grouped into notebooks by parent
/// directory, keeping the newest copy of each section.
pub fn discover_notebooks(dir: &Path) -> Result<Vec<NotebookSources>> {
    let mut by_dir: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();
    for file in discover_section_files(dir)? {
        let parent = file.parent().map(Path::to_path_buf).unwrap_or_default();
        by_dir.entry(parent).or_default().push(file);
    }

    let mut notebooks: Vec<NotebookSources> = by_dir
        .into_iter()
        .map(|(dir, files)| {
            let mut files = latest_versions(&files);
            files.sort();
            NotebookSources {
                name: notebook_name_from_dir(&dir),
                dir,
                files,
            }
        })
        .collect();
    notebooks.sort_by(|a, b| a.dir.cmp(&b.dir));
    Ok(notebooks)
}
