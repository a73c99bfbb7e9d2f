//! Writing sections and notebooks to Markdown files on disk.
//!
//! Layout: `<out>/<notebook>/<section>/<page>.md`, with page images in an
//! `images/` directory and attachments in `attachments/` next to the pages.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{ContentElement, Notebook, Page, Section, UNTITLED};
use crate::render::{page_to_markdown, RenderOptions};

/// Longest sanitized file name, in characters.
const MAX_FILENAME_CHARS: usize = 200;

fn unsafe_chars_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("valid filename pattern"))
}

fn separator_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[_\s]+").expect("valid separator pattern"))
}

/// Make a string safe to use as a file name.
///
/// Reserved and control characters become `_`, runs of `_` and whitespace
/// collapse to one space, and the result is trimmed and capped at 200
/// characters. An empty result is `unnamed`.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = unsafe_chars_regex().replace_all(name, "_");
    let collapsed = separator_run_regex().replace_all(&replaced, " ");
    let trimmed = collapsed.trim();

    let sanitized: String = trimmed.chars().take(MAX_FILENAME_CHARS).collect();
    if sanitized.is_empty() {
        "unnamed".to_string()
    } else {
        sanitized
    }
}

/// Options for exporting to disk.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Write sections directly under the output directory, without a
    /// notebook directory
    pub flat: bool,

    /// Markdown rendering options
    pub render: RenderOptions,
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the flat layout.
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }
}

/// File names already taken in one directory, compared case-insensitively.
#[derive(Debug, Default)]
struct NameSet {
    used: HashSet<String>,
}

impl NameSet {
    /// Claim `preferred` if it is free, else the first free `fallback(n)`.
    fn claim(&mut self, preferred: Option<String>, fallback: impl Fn(usize) -> String) -> String {
        if let Some(name) = preferred {
            if self.used.insert(name.to_lowercase()) {
                return name;
            }
        }
        let mut n = 1;
        loop {
            let candidate = fallback(n);
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Unique Markdown file name for a page title: `Title.md`, then
/// `Title (2).md`, `Title (3).md`, ...
fn page_filename(title: &str, taken: &mut NameSet) -> String {
    let title = if title.is_empty() { UNTITLED } else { title };
    let stem = sanitize_filename(title);
    let stem = stem.strip_suffix(".md").unwrap_or(&stem).to_string();
    taken.claim(Some(format!("{}.md", stem)), |n| format!("{} ({}).md", stem, n + 1))
}

/// Split a file name into stem and extension (with the dot).
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}

/// Exports sections as Markdown files.
pub struct Exporter {
    output_dir: PathBuf,
    options: ExportOptions,
}

impl Exporter {
    /// Create an exporter writing under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
        }
    }

    /// The output root.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export every section of a notebook. Returns the written paths.
    pub fn export_notebook(&self, notebook: &Notebook) -> Result<Vec<PathBuf>> {
        let base = if self.options.flat {
            self.output_dir.clone()
        } else {
            self.output_dir.join(sanitize_filename(&notebook.name))
        };

        let mut written = Vec::new();
        for section in &notebook.sections {
            written.extend(self.export_section_into(section, &base)?);
        }
        Ok(written)
    }

    /// Export one section directly under the output directory.
    pub fn export_section(&self, section: &Section) -> Result<Vec<PathBuf>> {
        self.export_section_into(section, &self.output_dir)
    }

    /// Export one section under `parent`. Returns the written paths.
    pub fn export_section_into(&self, section: &Section, parent: &Path) -> Result<Vec<PathBuf>> {
        let section_dir = parent.join(sanitize_filename(&section.name));
        create_dir(&section_dir)?;

        let mut written = Vec::new();
        let mut page_names = NameSet::default();
        let mut image_names = NameSet::default();
        let mut attachment_names = NameSet::default();

        for (i, page) in section.pages.iter().enumerate() {
            if !self.options.render.page_selection.includes(i as u32 + 1) {
                continue;
            }

            let mut page = page.clone();
            let payloads = assign_resource_names(&mut page, &mut image_names, &mut attachment_names);

            let path = section_dir.join(page_filename(&page.title, &mut page_names));
            write_file(&path, page_to_markdown(&page, &self.options.render).as_bytes())?;
            log::info!("Wrote {}", path.display());
            written.push(path);

            for (kind, name, data) in payloads {
                let dir = section_dir.join(kind.dir_name());
                create_dir(&dir)?;
                let path = dir.join(name);
                write_file(&path, &data)?;
                log::info!("Wrote {} {}", kind.label(), path.display());
                written.push(path);
            }
        }

        Ok(written)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Image,
    Attachment,
}

impl ResourceKind {
    fn dir_name(self) -> &'static str {
        match self {
            ResourceKind::Image => "images",
            ResourceKind::Attachment => "attachments",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Attachment => "attachment",
        }
    }
}

/// Give every image and attachment with a payload a unique, sanitized file
/// name within the section, so links in the rendered page match the files
/// written next to it. Returns the payloads to write.
fn assign_resource_names(
    page: &mut Page,
    images: &mut NameSet,
    attachments: &mut NameSet,
) -> Vec<(ResourceKind, String, Vec<u8>)> {
    let mut payloads = Vec::new();
    let mut image_count = 0;
    visit_elements(&mut page.elements, &mut |element| match element {
        ContentElement::Image(img) if img.has_data() => {
            image_count += 1;
            let ext = img.extension();
            let preferred = (!img.filename.is_empty()).then(|| sanitize_filename(&img.filename));
            let first = image_count;
            let name = images.claim(preferred, |n| {
                sanitize_filename(&format!("image_{:03}.{}", first + n - 1, ext))
            });
            img.filename = name.clone();
            payloads.push((ResourceKind::Image, name, img.data.clone()));
        }
        ContentElement::EmbeddedFile(file) if file.has_data() => {
            let original = if file.filename.is_empty() {
                "attachment".to_string()
            } else {
                file.filename.clone()
            };
            let preferred = sanitize_filename(&original);
            let (stem, ext) = split_extension(&preferred);
            let (stem, ext) = (stem.to_string(), ext.to_string());
            let name = attachments.claim(Some(preferred.clone()), |n| {
                format!("{} ({}){}", stem, n + 1, ext)
            });
            if name != preferred {
                file.filename = name.clone();
            }
            payloads.push((ResourceKind::Attachment, name, file.data.clone()));
        }
        _ => {}
    });
    payloads
}

/// Visit elements depth-first, descending into table cells.
fn visit_elements(elements: &mut [ContentElement], f: &mut impl FnMut(&mut ContentElement)) {
    for element in elements {
        match element {
            ContentElement::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                    visit_elements(&mut cell.content, f);
                }
            }
            other => f(other),
        }
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Export(format!("cannot create {}: {}", dir.display(), e)))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    std::fs::write(path, data)
        .map_err(|e| Error::Export(format!("cannot write {}: {}", path.display(), e)))
}
