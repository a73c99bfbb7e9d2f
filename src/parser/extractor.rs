//! Page content extraction: the sequential scan that turns a page's object
//! list into content elements.

use super::assembler::{assemble_pages, PageBucket};
use super::dedup::{deduplicate_elements, deduplicate_objects};
use super::hierarchy::reorder_by_outline;
use super::list::{ListInfo, ListResolver, ListState};
use super::media::{extract_embedded_file, extract_image};
use super::object::{JcidKind, TypedObject};
use super::options::ParseOptions;
use super::rich_text::{extract_rich_text, style_from_container};
use super::source::DecodedSection;
use super::table::TableScanner;
use crate::discover::section_name_from_path;
use crate::model::{ContentElement, Page, Section, TextStyle, UNTITLED};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Section-wide lookups needed to build leaf elements.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'s> {
    file_data: &'s HashMap<String, Vec<u8>>,
    paragraph_styles: &'s HashMap<String, String>,
    keep_payloads: bool,
}

impl<'s> ExtractContext<'s> {
    /// Create a context over a blob store and paragraph style table.
    pub fn new(
        file_data: &'s HashMap<String, Vec<u8>>,
        paragraph_styles: &'s HashMap<String, String>,
        keep_payloads: bool,
    ) -> Self {
        Self {
            file_data,
            paragraph_styles,
            keep_payloads,
        }
    }

    /// Context for a decoded section under the given options.
    pub fn for_section(decoded: &'s DecodedSection, options: &ParseOptions) -> Self {
        Self::new(
            &decoded.file_data,
            &decoded.paragraph_styles,
            options.extract_resources,
        )
    }

    /// Build the element for a rich-text, image or embedded-file node.
    /// Other kinds, and nodes with nothing to show, yield `None`.
    pub fn leaf_element(
        &self,
        obj: &TypedObject,
        style: &TextStyle,
        list: Option<ListInfo>,
    ) -> Option<ContentElement> {
        match obj.kind {
            JcidKind::RichTextNode => {
                extract_rich_text(obj, style, list, self.paragraph_styles).map(Into::into)
            }
            JcidKind::ImageNode => {
                extract_image(obj, self.file_data, self.keep_payloads).map(Into::into)
            }
            JcidKind::EmbeddedFileNode => {
                extract_embedded_file(obj, self.file_data, self.keep_payloads).map(Into::into)
            }
            _ => None,
        }
    }

    /// Build the element for a node inside a table cell. Cells hold plain
    /// paragraphs; a heading paragraph style is dropped.
    pub fn cell_element(&self, obj: &TypedObject, style: &TextStyle) -> Option<ContentElement> {
        let mut element = self.leaf_element(obj, style, None)?;
        if let ContentElement::RichText(rt) = &mut element {
            rt.heading_level = None;
        }
        Some(element)
    }
}

/// Extract one page's elements from its bucket.
pub fn extract_page(bucket: PageBucket<'_>, cx: &ExtractContext<'_>, options: &ParseOptions) -> Page {
    let PageBucket { mut page, objects } = bucket;

    let objects = if options.deduplicate {
        deduplicate_objects(&objects)
    } else {
        objects
    };
    let objects = if options.reorder_hierarchy {
        reorder_by_outline(&objects)
    } else {
        objects
    };

    let elements = scan_objects(&objects, cx);
    page.elements = if options.deduplicate {
        deduplicate_elements(elements)
    } else {
        elements
    };
    page
}

/// Sequential scan over an ordered object list.
///
/// Style containers update the running style, outline elements update the
/// list context, and tables consume the row and cell objects that follow
/// them. Out-of-line table content is skipped here so it only appears
/// inside its cell.
pub fn scan_objects(objects: &[&TypedObject], cx: &ExtractContext<'_>) -> Vec<ContentElement> {
    let tables = TableScanner::new(objects);
    let mut skip: HashSet<usize> = tables.out_of_line_targets();
    let lists = ListResolver::new(objects);

    let mut list_state = ListState::default();
    let mut style = TextStyle::default();
    let mut elements = Vec::new();

    let mut i = 0;
    while i < objects.len() {
        if skip.contains(&i) {
            i += 1;
            continue;
        }

        let obj = objects[i];
        match obj.kind {
            JcidKind::StyleContainer => {
                style = style_from_container(obj);
            }
            JcidKind::OutlineElementNode => {
                list_state.enter_element(lists.resolve(obj));
            }
            JcidKind::TableNode => {
                let outcome = tables.reconstruct(i, &style, cx);
                if let Some(table) = outcome.table {
                    elements.push(ContentElement::Table(table));
                    list_state.mark_used();
                }
                skip.extend(outcome.out_of_line);
                i += 1 + outcome.consumed;
                continue;
            }
            JcidKind::RichTextNode | JcidKind::ImageNode | JcidKind::EmbeddedFileNode => {
                if let Some(element) = cx.leaf_element(obj, &style, list_state.current()) {
                    elements.push(element);
                    list_state.mark_used();
                }
            }
            _ => {}
        }
        i += 1;
    }

    elements
}

/// Reconstruct a whole section from its decoded object stream.
///
/// The section is named from its metadata display name, else from `path`.
pub fn extract_section(
    decoded: &DecodedSection,
    path: Option<&Path>,
    options: &ParseOptions,
) -> Section {
    let name = decoded
        .display_name()
        .or_else(|| path.map(section_name_from_path))
        .unwrap_or_else(|| UNTITLED.to_string());

    let cx = ExtractContext::for_section(decoded, options);
    let buckets = assemble_pages(&decoded.objects);

    let pages: Vec<Page> = if options.parallel && buckets.len() > 1 {
        buckets
            .into_par_iter()
            .map(|bucket| extract_page(bucket, &cx, options))
            .collect()
    } else {
        buckets
            .into_iter()
            .map(|bucket| extract_page(bucket, &cx, options))
            .collect()
    };

    log::debug!("Section '{}': {} pages", name, pages.len());

    let mut section = Section::new(name);
    section.file_path = path.map(Path::to_path_buf);
    section.pages = pages;
    section
}
