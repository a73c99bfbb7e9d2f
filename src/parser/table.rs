//! Table reconstruction.
//!
//! A table node is followed in the stream by its rows, each row by its
//! cells, and each cell by its inline content. Rows are stored bottom to
//! top and cells right to left. A recently edited cell may have no inline
//! content at all; its content then lives elsewhere in the stream under a
//! newer revision and is reached through the cell's child references.

use super::extractor::ExtractContext;
use super::object::{props, JcidKind, TypedObject};
use crate::model::{ContentElement, Table, TableCell, TableRow, TextStyle};
use std::collections::{HashMap, HashSet};

/// Result of reconstructing one table.
#[derive(Debug, Clone, Default)]
pub struct TableOutcome {
    /// The table, or `None` when it was empty or malformed
    pub table: Option<Table>,

    /// Number of objects after the table node that belong to it
    pub consumed: usize,

    /// Indices of out-of-line objects pulled into cells
    pub out_of_line: HashSet<usize>,
}

/// Table reconstruction over one page's object list.
#[derive(Debug)]
pub struct TableScanner<'p, 'a> {
    objects: &'p [&'a TypedObject],
    by_identity: HashMap<&'a str, usize>,
}

impl<'p, 'a> TableScanner<'p, 'a> {
    /// Index the page objects by identity.
    pub fn new(objects: &'p [&'a TypedObject]) -> Self {
        let mut by_identity = HashMap::new();
        for (i, &obj) in objects.iter().enumerate() {
            if !obj.identity.is_empty() {
                by_identity.insert(obj.identity.as_str(), i);
            }
        }
        Self {
            objects,
            by_identity,
        }
    }

    /// Indices of objects that are out-of-line cell content: reachable from
    /// a cell's child references but outside every cell's inline region.
    /// The page scan skips these so they appear only inside their table.
    pub fn out_of_line_targets(&self) -> HashSet<usize> {
        let mut inline: HashSet<usize> = HashSet::new();
        let mut cell_refs: Vec<&'a str> = Vec::new();

        for (idx, &obj) in self.objects.iter().enumerate() {
            if obj.kind != JcidKind::TableCellNode {
                continue;
            }
            if obj.get(props::CHILD_NODES).is_some_and(|v| v.is_ref_list()) {
                cell_refs.extend(obj.refs(props::CHILD_NODES));
            }
            inline.extend(
                (idx + 1..self.objects.len())
                    .take_while(|&j| !self.objects[j].kind.is_table_structure()),
            );
        }

        let mut targets = HashSet::new();
        for reference in cell_refs {
            let Some(&start) = self.by_identity.get(reference) else {
                continue;
            };
            if inline.contains(&start) {
                continue;
            }
            targets.extend((start..self.objects.len()).take_while(|&j| {
                matches!(
                    self.objects[j].kind,
                    JcidKind::OutlineElementNode
                        | JcidKind::RichTextNode
                        | JcidKind::ImageNode
                        | JcidKind::EmbeddedFileNode
                )
            }));
        }
        targets
    }

    /// Reconstruct the table whose node is at `table_idx`.
    pub fn reconstruct(
        &self,
        table_idx: usize,
        style: &TextStyle,
        cx: &ExtractContext<'_>,
    ) -> TableOutcome {
        let objects = self.objects;
        let node = objects[table_idx];

        let row_count = usize::try_from(node.int(props::ROW_COUNT)).unwrap_or(0);
        let col_count = usize::try_from(node.int(props::COLUMN_COUNT)).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return TableOutcome::default();
        }

        let mut out_of_line = HashSet::new();
        let mut rows: Vec<TableRow> = Vec::new();
        let mut consumed = 0;
        let mut i = table_idx + 1;

        while i < objects.len() && rows.len() < row_count {
            if objects[i].kind != JcidKind::TableRowNode {
                break;
            }
            consumed += 1;
            i += 1;

            let mut cells: Vec<TableCell> = Vec::new();
            while i < objects.len() && cells.len() < col_count {
                let cell = objects[i];
                if cell.kind != JcidKind::TableCellNode {
                    break;
                }
                consumed += 1;
                i += 1;

                let refs = cell.refs(props::CHILD_NODES);
                let bound = match cell.get(props::CHILD_NODES) {
                    Some(v) if v.is_ref_list() => refs.len(),
                    _ => 1,
                };

                let mut content: Vec<ContentElement> = Vec::new();
                let mut outlines_seen = 0;
                while i < objects.len() {
                    let inner = objects[i];
                    if matches!(inner.kind, JcidKind::TableCellNode | JcidKind::TableRowNode) {
                        break;
                    }
                    if inner.kind == JcidKind::OutlineElementNode {
                        outlines_seen += 1;
                        if outlines_seen > bound {
                            break;
                        }
                    }
                    consumed += 1;
                    i += 1;

                    if let Some(element) = cx.cell_element(inner, style) {
                        content.push(element);
                    }
                }

                if content.is_empty() {
                    for reference in &refs {
                        self.collect_out_of_line(
                            reference,
                            style,
                            cx,
                            &mut content,
                            &mut out_of_line,
                        );
                    }
                }

                cells.push(TableCell::with_content(content));
            }

            cells.reverse();
            rows.push(TableRow::new(cells));
        }
        rows.reverse();

        let table = Table {
            rows,
            borders_visible: node.flag_or(props::TABLE_BORDERS_VISIBLE, true),
        };

        let table = if table.has_shape(row_count, col_count) {
            Some(table)
        } else {
            log::debug!(
                "Omitting table {}: declared {}x{}, reconstructed {} rows",
                node.identity,
                row_count,
                col_count,
                table.row_count()
            );
            None
        };

        TableOutcome {
            table,
            consumed,
            out_of_line,
        }
    }

    /// Walk forward from a referenced object, collecting its outline group.
    fn collect_out_of_line(
        &self,
        reference: &str,
        style: &TextStyle,
        cx: &ExtractContext<'_>,
        content: &mut Vec<ContentElement>,
        visited: &mut HashSet<usize>,
    ) {
        let Some(&start) = self.by_identity.get(reference) else {
            return;
        };
        for j in start..self.objects.len() {
            let obj = self.objects[j];
            match obj.kind {
                JcidKind::OutlineElementNode => {}
                JcidKind::RichTextNode | JcidKind::ImageNode => {
                    if let Some(element) = cx.cell_element(obj, style) {
                        content.push(element);
                    }
                }
                _ => break,
            }
            visited.insert(j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::object::{Identity, PropertyValue};
    use std::collections::HashMap;

    struct Stream {
        objects: Vec<TypedObject>,
        seq: u32,
    }

    impl Stream {
        fn new() -> Self {
            Self {
                objects: Vec::new(),
                seq: 0,
            }
        }

        fn next_id(&mut self) -> Identity {
            self.seq += 1;
            Identity::from_parts("page", self.seq)
        }

        fn push(&mut self, kind: JcidKind) -> Identity {
            let id = self.next_id();
            self.objects.push(TypedObject::new(kind, id.clone()));
            id
        }

        fn table(&mut self, rows: i64, cols: i64) {
            let id = self.next_id();
            self.objects.push(
                TypedObject::new(JcidKind::TableNode, id)
                    .with(props::ROW_COUNT, rows)
                    .with(props::COLUMN_COUNT, cols),
            );
        }

        fn cell(&mut self, refs: &[Identity]) {
            let id = self.next_id();
            self.objects.push(
                TypedObject::new(JcidKind::TableCellNode, id)
                    .with(props::CHILD_NODES, PropertyValue::ref_list(refs.to_vec())),
            );
        }

        fn text(&mut self, s: &str) -> Identity {
            let id = self.next_id();
            self.objects.push(
                TypedObject::new(JcidKind::RichTextNode, id.clone())
                    .with(props::RICH_EDIT_TEXT_UNICODE, s),
            );
            id
        }

        /// A cell with one inline outline element holding `s`.
        fn text_cell(&mut self, s: &str) {
            self.cell(&[Identity::new("inline")]);
            self.push(JcidKind::OutlineElementNode);
            self.text(s);
        }
    }

    fn cell_texts(table: &Table) -> Vec<Vec<String>> {
        table.rows.iter().map(|r| r.cell_texts()).collect()
    }

    fn run(objects: &[TypedObject], table_idx: usize) -> TableOutcome {
        run_with_styles(objects, table_idx, &HashMap::new())
    }

    fn run_with_styles(
        objects: &[TypedObject],
        table_idx: usize,
        styles: &HashMap<String, String>,
    ) -> TableOutcome {
        let refs: Vec<&TypedObject> = objects.iter().collect();
        let files = HashMap::new();
        let cx = ExtractContext::new(&files, styles, true);
        TableScanner::new(&refs).reconstruct(table_idx, &TextStyle::default(), &cx)
    }

    #[test]
    fn test_reading_order() {
        let mut s = Stream::new();
        s.table(2, 2);
        // Bottom row first, right cell first
        s.push(JcidKind::TableRowNode);
        s.text_cell("D");
        s.text_cell("C");
        s.push(JcidKind::TableRowNode);
        s.text_cell("B");
        s.text_cell("A");
        s.push(JcidKind::OutlineElementNode);
        s.text("after");

        let outcome = run(&s.objects, 0);
        let table = outcome.table.unwrap();
        assert_eq!(cell_texts(&table), vec![vec!["A", "B"], vec!["C", "D"]]);
        assert!(table.borders_visible);
        assert_eq!(outcome.consumed, 14);
    }

    #[test]
    fn test_zero_dimensions() {
        let mut s = Stream::new();
        s.table(0, 3);
        s.push(JcidKind::TableRowNode);
        let outcome = run(&s.objects, 0);
        assert!(outcome.table.is_none());
        assert_eq!(outcome.consumed, 0);
    }

    #[test]
    fn test_short_table_omitted_but_consumed() {
        let mut s = Stream::new();
        s.table(2, 2);
        s.push(JcidKind::TableRowNode);
        s.text_cell("B");
        s.text_cell("A");
        s.push(JcidKind::OutlineElementNode);
        s.text("not a row");

        let outcome = run(&s.objects, 0);
        assert!(outcome.table.is_none());
        assert_eq!(outcome.consumed, 7);
    }

    #[test]
    fn test_cell_bound_ends_inline_content() {
        let mut s = Stream::new();
        s.table(1, 1);
        s.push(JcidKind::TableRowNode);
        s.text_cell("inside");
        s.push(JcidKind::OutlineElementNode);
        s.text("outside");

        let outcome = run(&s.objects, 0);
        let table = outcome.table.unwrap();
        assert_eq!(cell_texts(&table), vec![vec!["inside"]]);
        assert_eq!(outcome.consumed, 4);
    }

    #[test]
    fn test_out_of_line_cell_content() {
        let mut s = Stream::new();
        // Edited cell content stored before the table
        let edited = s.push(JcidKind::OutlineElementNode);
        s.text("Edited");
        s.table(1, 2);
        s.push(JcidKind::TableRowNode);
        s.text_cell("Right");
        s.cell(&[edited]);

        let outcome = run(&s.objects, 2);
        let table = outcome.table.unwrap();
        assert_eq!(cell_texts(&table), vec![vec!["Edited", "Right"]]);
        assert_eq!(outcome.out_of_line, HashSet::from([0, 1]));
    }

    #[test]
    fn test_out_of_line_targets_prescan() {
        let mut s = Stream::new();
        let edited = s.push(JcidKind::OutlineElementNode);
        s.text("Edited");
        s.text("Also edited");
        s.table(1, 2);
        s.push(JcidKind::TableRowNode);
        let inline_target = Identity::from_parts("page", s.seq + 2);
        s.cell(&[inline_target]);
        s.push(JcidKind::OutlineElementNode);
        s.text("Right");
        s.cell(&[edited]);

        let refs: Vec<&TypedObject> = s.objects.iter().collect();
        let targets = TableScanner::new(&refs).out_of_line_targets();
        assert_eq!(targets, HashSet::from([0, 1, 2]));
    }

    #[test]
    fn test_cell_headings_are_plain_text() {
        let mut s = Stream::new();
        // Edited cell content stored before the table
        let edited = s.push(JcidKind::OutlineElementNode);
        let id = s.next_id();
        s.objects.push(
            TypedObject::new(JcidKind::RichTextNode, id)
                .with(props::RICH_EDIT_TEXT_UNICODE, "Moved")
                .with(props::PARAGRAPH_STYLE, PropertyValue::ref_list(["style-h2"])),
        );
        s.table(1, 2);
        s.push(JcidKind::TableRowNode);
        s.cell(&[Identity::new("inline")]);
        s.push(JcidKind::OutlineElementNode);
        let id = s.next_id();
        s.objects.push(
            TypedObject::new(JcidKind::RichTextNode, id)
                .with(props::RICH_EDIT_TEXT_UNICODE, "Total")
                .with(props::PARAGRAPH_STYLE, PropertyValue::ref_list(["style-h2"])),
        );
        s.cell(&[edited]);

        let styles = HashMap::from([("style-h2".to_string(), "h2".to_string())]);
        let table = run_with_styles(&s.objects, 2, &styles).table.unwrap();
        assert_eq!(cell_texts(&table), vec![vec!["Moved", "Total"]]);
        for cell in &table.rows[0].cells {
            let rt = cell.content[0].as_rich_text().unwrap();
            assert_eq!(rt.heading_level, None);
        }
    }

    #[test]
    fn test_borders_hidden() {
        let mut s = Stream::new();
        s.objects.push(
            TypedObject::new(JcidKind::TableNode, Identity::from_parts("t", 1))
                .with(props::ROW_COUNT, 1)
                .with(props::COLUMN_COUNT, 1)
                .with(props::TABLE_BORDERS_VISIBLE, false),
        );
        s.push(JcidKind::TableRowNode);
        s.text_cell("x");
        let table = run(&s.objects, 0).table.unwrap();
        assert!(!table.borders_visible);
    }
}
