//! Rendering options and configuration.

use std::ops::RangeInclusive;

/// Options for rendering section content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with page metadata
    pub include_frontmatter: bool,

    /// Render the page title as a level-1 heading
    pub title_heading: bool,

    /// Append an author footer when the page has an author
    pub include_author: bool,

    /// Directory prefix for image links (e.g., "./images")
    pub image_path_prefix: String,

    /// Directory prefix for attachment links (e.g., "./attachments")
    pub attachment_path_prefix: String,

    /// Spaces per list nesting level
    pub list_indent: usize,

    /// Escape special Markdown characters in text runs
    pub escape_special_chars: bool,

    /// Page selection (1-indexed within a section)
    pub page_selection: PageSelection,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable the title heading.
    pub fn with_title_heading(mut self, include: bool) -> Self {
        self.title_heading = include;
        self
    }

    /// Enable or disable the author footer.
    pub fn with_author(mut self, include: bool) -> Self {
        self.include_author = include;
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Set the attachment path prefix.
    pub fn with_attachment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attachment_path_prefix = prefix.into();
        self
    }

    /// Set the indent width per list level.
    pub fn with_list_indent(mut self, spaces: usize) -> Self {
        self.list_indent = spaces;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            title_heading: true,
            include_author: true,
            image_path_prefix: "./images".to_string(),
            attachment_path_prefix: "./attachments".to_string(),
            list_indent: 3,
            escape_special_chars: false,
            page_selection: PageSelection::All,
        }
    }
}

/// Page selection for rendering.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Render all pages
    #[default]
    All,
    /// Render a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Render specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                pages.extend(start..=end);
            } else {
                pages.push(part.parse().map_err(|_| "Invalid page number")?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}
