//! Rich text and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of formatted text from a rich-text outline node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// Text runs in reading order
    pub runs: Vec<TextRun>,

    /// Nesting depth (0 = top level)
    pub indent_level: u8,

    /// Heading level (1-6) or None for body text
    pub heading_level: Option<u8>,

    /// List kind if this paragraph is a list item
    pub list_type: Option<ListType>,

    /// Whether the node is the page title text
    pub is_title: bool,
}

impl RichText {
    /// Create an empty rich text element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rich text element with a single unstyled run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            ..Self::default()
        }
    }

    /// Create a heading.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut rt = Self::with_text(text);
        rt.heading_level = Some(level.clamp(1, 6));
        rt
    }

    /// Create a list item.
    pub fn list_item(text: impl Into<String>, list_type: ListType, indent_level: u8) -> Self {
        let mut rt = Self::with_text(text);
        rt.list_type = Some(list_type);
        rt.indent_level = indent_level;
        rt
    }

    /// Add a run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Run texts joined by single spaces.
    pub fn plain_text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Check if there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level.is_some()
    }

    /// Check if this is a list item.
    pub fn is_list_item(&self) -> bool {
        self.list_type.is_some()
    }
}

/// A run of text with uniform formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Character formatting
    pub style: TextStyle,

    /// Link target, if the run is a hyperlink
    pub hyperlink_url: Option<String>,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a styled run.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            hyperlink_url: None,
        }
    }

    /// Set the hyperlink and return self.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.hyperlink_url = Some(url.into());
        self
    }

    /// Check if this run is a hyperlink.
    pub fn is_link(&self) -> bool {
        self.hyperlink_url.is_some()
    }
}

/// Character formatting taken from the active style container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Superscript
    pub superscript: bool,

    /// Subscript
    pub subscript: bool,

    /// Font name
    pub font_name: Option<String>,

    /// Font size as stored (half-points)
    pub font_size: Option<u32>,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.strikethrough
            || self.superscript
            || self.subscript
    }
}

/// Kind of list a paragraph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Numbered list
    Ordered,
    /// Bulleted list
    Unordered,
}

impl std::fmt::Display for ListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListType::Ordered => write!(f, "ordered"),
            ListType::Unordered => write!(f, "unordered"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rich_text_plain_text() {
        let mut rt = RichText::new();
        rt.add_run(TextRun::new("Meeting options |"));
        rt.add_run(TextRun::new("Reset PIN").with_link("https://example.com"));

        assert_eq!(rt.plain_text(), "Meeting options | Reset PIN");
        assert!(rt.runs[1].is_link());
    }

    #[test]
    fn test_heading() {
        let h = RichText::heading("Title", 9);
        assert!(h.is_heading());
        assert_eq!(h.heading_level, Some(6));
    }

    #[test]
    fn test_list_item() {
        let item = RichText::list_item("Step", ListType::Ordered, 2);
        assert!(item.is_list_item());
        assert_eq!(item.indent_level, 2);
        assert_eq!(item.list_type.unwrap().to_string(), "ordered");
    }

    #[test]
    fn test_is_empty() {
        assert!(RichText::new().is_empty());
        assert!(RichText::with_text("  ").is_empty());
        assert!(!RichText::with_text("x").is_empty());
    }

    #[test]
    fn test_text_style() {
        let style = TextStyle::default();
        assert!(!style.has_styling());

        let bold_style = TextStyle {
            bold: true,
            ..Default::default()
        };
        assert!(bold_style.has_styling());
    }
}
