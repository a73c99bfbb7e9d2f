//! Markdown rendering for reconstructed sections.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::export::sanitize_filename;
use crate::model::{
    ContentElement, EmbeddedFile, Image, ListType, Page, RichText, Section, Table, TextRun,
};

use super::RenderOptions;

/// Convert a section to Markdown. Selected pages are separated by a blank line.
pub fn to_markdown(section: &Section, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    Ok(renderer.render_section(section))
}

/// Convert a single page to Markdown.
pub fn page_to_markdown(page: &Page, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render_page(page)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the selected pages of a section.
    pub fn render_section(&self, section: &Section) -> String {
        let pages: Vec<String> = section
            .pages
            .iter()
            .enumerate()
            .filter(|(i, _)| self.options.page_selection.includes(*i as u32 + 1))
            .map(|(_, page)| self.render_page(page))
            .collect();

        pages.join("\n").trim().to_string()
    }

    /// Render one page: title, elements, then the author footer.
    pub fn render_page(&self, page: &Page) -> String {
        let mut lines: Vec<String> = Vec::new();

        if self.options.include_frontmatter {
            lines.push(page.to_yaml_frontmatter());
        }

        if self.options.title_heading && !page.title.is_empty() {
            lines.push(format!("# {}", page.title));
            lines.push(String::new());
        }

        // Ordered-list counters per indent level
        let mut counters: BTreeMap<u8, u32> = BTreeMap::new();

        for element in &page.elements {
            let md = match element {
                ContentElement::RichText(rt) if rt.list_type == Some(ListType::Ordered) => {
                    let level = rt.indent_level;
                    counters.retain(|&k, _| k <= level);
                    let counter = counters.entry(level).or_insert(0);
                    *counter += 1;
                    self.render_rich_text(rt, *counter)
                }
                other => {
                    let in_list = other
                        .as_rich_text()
                        .is_some_and(|rt| rt.list_type.is_some());
                    if !in_list {
                        counters.clear();
                    }
                    self.render_element(other)
                }
            };

            if !md.is_empty() {
                lines.push(md);
                lines.push(String::new());
            }
        }

        if self.options.include_author {
            if let Some(ref author) = page.author {
                lines.push("---".to_string());
                lines.push(format!("*Author: {}*", author));
                lines.push(String::new());
            }
        }

        lines.join("\n")
    }

    fn render_element(&self, element: &ContentElement) -> String {
        match element {
            ContentElement::RichText(rt) => self.render_rich_text(rt, 0),
            ContentElement::Image(img) => self.render_image(img),
            ContentElement::Table(t) => self.render_table(t),
            ContentElement::EmbeddedFile(f) => self.render_embedded_file(f),
        }
    }

    fn render_rich_text(&self, rt: &RichText, ordered_number: u32) -> String {
        let heading = rt.heading_level.filter(|&l| l > 0);

        let parts: Vec<String> = rt
            .runs
            .iter()
            .filter(|run| !run.text.is_empty())
            .map(|run| self.render_run(run, heading.is_some()))
            .collect();
        let text = parts.concat();

        if let Some(level) = heading {
            return format!("{} {}", "#".repeat(level as usize), text);
        }

        let indent = " ".repeat(self.options.list_indent * rt.indent_level as usize);
        match rt.list_type {
            Some(ListType::Ordered) => format!("{}{}. {}", indent, ordered_number.max(1), text),
            Some(ListType::Unordered) => format!("{}- {}", indent, text),
            None if rt.indent_level > 0 => format!("{}- {}", indent, text),
            None => text,
        }
    }

    fn render_run(&self, run: &TextRun, in_heading: bool) -> String {
        let raw = if self.options.escape_special_chars {
            escape_markdown(&run.text)
        } else {
            run.text.clone()
        };
        let style = &run.style;
        let mut text = raw.clone();

        if !in_heading {
            if style.strikethrough {
                text = format!("~~{}~~", text);
            }
            text = match (style.bold, style.italic) {
                (true, true) => format!("***{}***", text),
                (true, false) => format!("**{}**", text),
                (false, true) => format!("*{}*", text),
                (false, false) => text,
            };
            if style.underline && run.hyperlink_url.is_none() {
                text = format!("*{}*", text);
            }
        }

        // Links show the bare run text
        if let Some(ref url) = run.hyperlink_url {
            text = format!("[{}]({})", raw, url);
        }

        if !in_heading {
            if style.superscript {
                text = format!("<sup>{}</sup>", text);
            }
            if style.subscript {
                text = format!("<sub>{}</sub>", text);
            }
        }

        text
    }

    fn render_image(&self, img: &Image) -> String {
        let alt = img
            .alt_text
            .as_deref()
            .filter(|a| !a.is_empty())
            .or(Some(img.filename.as_str()).filter(|f| !f.is_empty()))
            .unwrap_or("image");

        if img.has_data() {
            let target = join_prefix(&self.options.image_path_prefix, &sanitize_filename(&img.filename));
            format!("![{}]({})", alt, target)
        } else {
            format!("![{}]({})", alt, img.filename)
        }
    }

    fn render_table(&self, table: &Table) -> String {
        if table.is_empty() {
            return String::new();
        }

        let mut lines = Vec::new();
        for (i, row) in table.rows.iter().enumerate() {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|cell| {
                    let text = cell
                        .content
                        .iter()
                        .map(|e| self.render_element(e).trim().replace('\n', " "))
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    if text.is_empty() {
                        " ".to_string()
                    } else {
                        text
                    }
                })
                .collect();

            lines.push(format!("| {} |", cells.join(" | ")));
            if i == 0 {
                let separator = vec!["---"; cells.len()];
                lines.push(format!("| {} |", separator.join(" | ")));
            }
        }

        lines.join("\n")
    }

    fn render_embedded_file(&self, file: &EmbeddedFile) -> String {
        let name = if file.filename.is_empty() {
            "attachment"
        } else {
            file.filename.as_str()
        };

        if file.has_data() {
            let target = join_prefix(&self.options.attachment_path_prefix, &sanitize_filename(name));
            format!("[{}]({})", name, target)
        } else {
            format!("[{}]", name)
        }
    }
}

fn join_prefix(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
