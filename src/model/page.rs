//! Page-level types.

use super::{EmbeddedFile, Image, RichText, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used for pages whose metadata carries no title.
pub const UNTITLED: &str = "Untitled";

/// A single page of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page title (never empty)
    pub title: String,

    /// Subpage nesting level (0 = top-level page)
    pub level: u32,

    /// Author of the page node
    pub author: Option<String>,

    /// When the page was created
    pub creation_time: Option<DateTime<Utc>>,

    /// When the page was last modified
    pub last_modified: Option<DateTime<Utc>>,

    /// Content elements in reading order
    pub elements: Vec<ContentElement>,
}

impl Page {
    /// Create an empty page. An empty or whitespace title becomes `Untitled`.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };
        Self {
            title,
            level: 0,
            author: None,
            creation_time: None,
            last_modified: None,
            elements: Vec::new(),
        }
    }

    /// Add an element to the page.
    pub fn add_element(&mut self, element: ContentElement) {
        self.elements.push(element);
    }

    /// Get plain text content of the page.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.plain_text())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page has no content elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of elements on the page.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Iterate over images on the page, including those inside tables.
    pub fn images(&self) -> Vec<&Image> {
        let mut out = Vec::new();
        collect_images(&self.elements, &mut out);
        out
    }

    /// Iterate over embedded files on the page, including those inside tables.
    pub fn embedded_files(&self) -> Vec<&EmbeddedFile> {
        let mut out = Vec::new();
        collect_embedded_files(&self.elements, &mut out);
        out
    }

    /// Convert page metadata to YAML frontmatter.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("title: \"{}\"", escape_yaml(&self.title)));
        if let Some(ref author) = self.author {
            lines.push(format!("author: \"{}\"", escape_yaml(author)));
        }
        if let Some(ref created) = self.creation_time {
            lines.push(format!("created: {}", created.to_rfc3339()));
        }
        if let Some(ref modified) = self.last_modified {
            lines.push(format!("modified: {}", modified.to_rfc3339()));
        }
        if self.level > 0 {
            lines.push(format!("level: {}", self.level));
        }

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(UNTITLED)
    }
}

fn collect_images<'a>(elements: &'a [ContentElement], out: &mut Vec<&'a Image>) {
    for element in elements {
        match element {
            ContentElement::Image(img) => out.push(img),
            ContentElement::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect_images(&cell.content, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_embedded_files<'a>(elements: &'a [ContentElement], out: &mut Vec<&'a EmbeddedFile>) {
    for element in elements {
        match element {
            ContentElement::EmbeddedFile(f) => out.push(f),
            ContentElement::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect_embedded_files(&cell.content, out);
                }
            }
            _ => {}
        }
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// A content element on a page or inside a table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentElement {
    /// A paragraph of formatted text
    RichText(RichText),

    /// An image
    Image(Image),

    /// A table
    Table(Table),

    /// An attached file
    EmbeddedFile(EmbeddedFile),
}

impl ContentElement {
    /// Check if this element is rich text.
    pub fn is_rich_text(&self) -> bool {
        matches!(self, ContentElement::RichText(_))
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, ContentElement::Table(_))
    }

    /// Check if this element is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentElement::Image(_))
    }

    /// Borrow the rich text, if this is one.
    pub fn as_rich_text(&self) -> Option<&RichText> {
        match self {
            ContentElement::RichText(rt) => Some(rt),
            _ => None,
        }
    }

    /// Borrow the table, if this is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            ContentElement::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Plain text of the element. Images and files yield their alt text or name.
    pub fn plain_text(&self) -> String {
        match self {
            ContentElement::RichText(rt) => rt.plain_text(),
            ContentElement::Table(t) => t.plain_text(),
            ContentElement::Image(img) => img.alt_text.clone().unwrap_or_default(),
            ContentElement::EmbeddedFile(f) => f.filename.clone(),
        }
    }
}

impl From<RichText> for ContentElement {
    fn from(rt: RichText) -> Self {
        ContentElement::RichText(rt)
    }
}

impl From<Table> for ContentElement {
    fn from(t: Table) -> Self {
        ContentElement::Table(t)
    }
}

impl From<Image> for ContentElement {
    fn from(img: Image) -> Self {
        ContentElement::Image(img)
    }
}

impl From<EmbeddedFile> for ContentElement {
    fn from(f: EmbeddedFile) -> Self {
        ContentElement::EmbeddedFile(f)
    }
}
