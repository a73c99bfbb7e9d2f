//! Section and notebook types.

use super::Page;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A reconstructed OneNote section: one `.one` file worth of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section display name
    pub name: String,

    /// File the section was read from
    pub file_path: Option<PathBuf>,

    /// Pages in section order
    pub pages: Vec<Page>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_path: None,
            pages: Vec::new(),
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: usize) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get(page_num - 1)
    }

    /// Find a page by title, ignoring case.
    pub fn find_page(&self, title: &str) -> Option<&Page> {
        let wanted = title.trim().to_lowercase();
        self.pages
            .iter()
            .find(|p| p.title.trim().to_lowercase() == wanted)
    }

    /// Add a page.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the section has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the whole section.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A notebook: a directory of sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook name (directory name)
    pub name: String,

    /// Directory the notebook was read from
    pub dir_path: Option<PathBuf>,

    /// Sections in discovery order
    pub sections: Vec<Section>,
}

impl Notebook {
    /// Create a new empty notebook.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir_path: None,
            sections: Vec::new(),
        }
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Get a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total number of pages across sections.
    pub fn page_count(&self) -> usize {
        self.sections.iter().map(|s| s.page_count()).sum()
    }

    /// Check if the notebook has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
