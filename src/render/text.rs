//! Plain text rendering for reconstructed sections.

use crate::error::Result;
use crate::model::Section;

use super::RenderOptions;

/// Convert a section to plain text: each selected page's title followed by
/// its element text.
pub fn to_text(section: &Section, options: &RenderOptions) -> Result<String> {
    let pages: Vec<String> = section
        .pages
        .iter()
        .enumerate()
        .filter(|(i, _)| options.page_selection.includes(*i as u32 + 1))
        .map(|(_, page)| {
            let body = page.plain_text();
            if !options.title_heading {
                body
            } else if body.is_empty() {
                page.title.clone()
            } else {
                format!("{}\n\n{}", page.title, body)
            }
        })
        .filter(|text| !text.is_empty())
        .collect();

    Ok(pages.join("\n\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Page, RichText};

    #[test]
    fn test_to_text() {
        let mut page = Page::new("Groceries");
        page.add_element(RichText::with_text("Milk").into());
        page.add_element(RichText::with_text("Eggs").into());
        let mut section = Section::new("Home");
        section.add_page(page);
        section.add_page(Page::new("Empty"));

        let result = to_text(&section, &RenderOptions::default()).unwrap();
        assert_eq!(result, "Groceries\n\nMilk\n\nEggs\n\nEmpty");

        let options = RenderOptions::default().with_title_heading(false);
        let result = to_text(&section, &options).unwrap();
        assert_eq!(result, "Milk\n\nEggs");
    }
}
