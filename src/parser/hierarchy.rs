//! Outline-order restoration.
//!
//! Recently edited content is stored earlier in the stream than the outline
//! element that owns it. When a page starts with such orphaned content, the
//! outline tree is walked from its roots and each orphan is placed after the
//! first outline element that has no inline content of its own.

use super::object::{props, JcidKind, TypedObject};
use std::collections::{HashMap, HashSet, VecDeque};

/// Reorder page objects into outline reading order.
///
/// Returns the input unchanged when there are fewer than four objects, no
/// outline node, or no orphaned leading content. Every object appears in
/// the output at most once per identity; objects the walk never reaches
/// are appended in their original order.
pub fn reorder_by_outline<'a>(objects: &[&'a TypedObject]) -> Vec<&'a TypedObject> {
    if objects.len() < 4 || !objects.iter().any(|o| o.kind == JcidKind::OutlineNode) {
        return objects.to_vec();
    }

    let orphans: VecDeque<usize> = objects
        .iter()
        .enumerate()
        .take_while(|(_, o)| !o.kind.is_outline_boundary())
        .filter(|(_, o)| o.kind.is_leaf_content())
        .map(|(i, _)| i)
        .collect();

    if orphans.is_empty() {
        return objects.to_vec();
    }

    let orphan_count = orphans.len();
    let mut walker = OutlineWalker::new(objects, orphans);

    let mut roots: Vec<usize> = objects
        .iter()
        .enumerate()
        .filter(|(_, o)| o.kind == JcidKind::OutlineNode)
        .map(|(i, _)| i)
        .collect();
    // Roots without a vertical offset (title and date blocks) come first in
    // stream order, then the rest top to bottom.
    roots.sort_by_key(|&i| match objects[i].get(props::OFFSET_FROM_PARENT_VERT) {
        None => (0u8, i as i64),
        Some(vert) => (1u8, vert.as_int()),
    });

    for root in roots {
        walker.emit(root);
        walker.walk_children(root);
    }
    for idx in 0..objects.len() {
        walker.emit(idx);
    }

    log::debug!(
        "Reordered page by outline hierarchy ({} orphaned objects, {} left unplaced)",
        orphan_count,
        walker.orphans.len()
    );
    walker.order.into_iter().map(|i| objects[i]).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum VisitKey<'a> {
    Identity(&'a str),
    Index(usize),
}

struct OutlineWalker<'o, 'a> {
    objects: &'o [&'a TypedObject],
    by_identity: HashMap<&'a str, usize>,
    groups: HashMap<usize, Vec<usize>>,
    orphans: VecDeque<usize>,
    visited: HashSet<VisitKey<'a>>,
    order: Vec<usize>,
}

impl<'o, 'a> OutlineWalker<'o, 'a> {
    fn new(objects: &'o [&'a TypedObject], orphans: VecDeque<usize>) -> Self {
        let mut by_identity = HashMap::new();
        for (i, &obj) in objects.iter().enumerate() {
            if !obj.identity.is_empty() {
                by_identity.insert(obj.identity.as_str(), i);
            }
        }

        // Inline group of an outline element: following objects up to the
        // next outline boundary.
        let mut groups = HashMap::new();
        for (i, obj) in objects.iter().enumerate() {
            if obj.kind != JcidKind::OutlineElementNode {
                continue;
            }
            let group: Vec<usize> = (i + 1..objects.len())
                .take_while(|&j| !objects[j].kind.is_outline_boundary())
                .collect();
            groups.insert(i, group);
        }

        Self {
            objects,
            by_identity,
            groups,
            orphans,
            visited: HashSet::new(),
            order: Vec::with_capacity(objects.len()),
        }
    }

    fn key(&self, idx: usize) -> VisitKey<'a> {
        let obj: &'a TypedObject = self.objects[idx];
        if obj.identity.is_empty() {
            VisitKey::Index(idx)
        } else {
            VisitKey::Identity(obj.identity.as_str())
        }
    }

    fn emit(&mut self, idx: usize) {
        if self.visited.insert(self.key(idx)) {
            self.order.push(idx);
        }
    }

    /// Depth-first pre-order walk over declared children.
    fn walk_children(&mut self, parent: usize) {
        let parent_obj: &'a TypedObject = self.objects[parent];
        let mut stack: Vec<&'a str> = parent_obj.refs(props::CHILD_NODES);
        stack.reverse();

        while let Some(id) = stack.pop() {
            let Some(&idx) = self.by_identity.get(id) else {
                continue;
            };
            if self.visited.contains(&self.key(idx)) {
                continue;
            }
            self.emit(idx);

            let group = self.groups.get(&idx).cloned().unwrap_or_default();
            if !group.is_empty() {
                for member in group {
                    self.emit(member);
                }
            } else if let Some(orphan) = self.orphans.pop_front() {
                self.emit(orphan);
            }

            let obj: &'a TypedObject = self.objects[idx];
            let mut children = obj.refs(props::CHILD_NODES);
            children.reverse();
            stack.extend(children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::dedup::primary_or_secondary_text;
    use crate::parser::object::{Identity, PropertyValue};

    fn id(seq: u32) -> Identity {
        Identity::from_parts("page", seq)
    }

    fn text(seq: u32, s: &str) -> TypedObject {
        TypedObject::new(JcidKind::RichTextNode, id(seq)).with(props::RICH_EDIT_TEXT_UNICODE, s)
    }

    fn oe(seq: u32, children: &[u32]) -> TypedObject {
        let obj = TypedObject::new(JcidKind::OutlineElementNode, id(seq));
        if children.is_empty() {
            obj
        } else {
            obj.with(
                props::CHILD_NODES,
                PropertyValue::ref_list(children.iter().map(|&c| id(c))),
            )
        }
    }

    fn node(seq: u32, children: &[u32]) -> TypedObject {
        TypedObject::new(JcidKind::OutlineNode, id(seq)).with(
            props::CHILD_NODES,
            PropertyValue::ref_list(children.iter().map(|&c| id(c))),
        )
    }

    fn labels(objects: &[&TypedObject]) -> Vec<String> {
        objects
            .iter()
            .map(|o| match o.kind {
                JcidKind::RichTextNode => primary_or_secondary_text(o),
                JcidKind::OutlineElementNode => format!("OE{}", seq_of(o)),
                JcidKind::OutlineNode => format!("ON{}", seq_of(o)),
                _ => "?".to_string(),
            })
            .collect()
    }

    fn seq_of(o: &TypedObject) -> String {
        o.identity
            .as_str()
            .rsplit(", ")
            .next()
            .unwrap_or("")
            .trim_end_matches(')')
            .to_string()
    }

    #[test]
    fn test_unchanged_without_orphans() {
        let objs = [node(1, &[2]), oe(2, &[]), text(3, "a"), text(4, "b")];
        let input: Vec<&TypedObject> = objs.iter().collect();
        assert_eq!(labels(&reorder_by_outline(&input)), vec!["ON1", "OE2", "a", "b"]);
    }

    #[test]
    fn test_unchanged_without_outline_node() {
        let objs = [text(1, "x"), oe(2, &[]), text(3, "a"), text(4, "b")];
        let input: Vec<&TypedObject> = objs.iter().collect();
        assert_eq!(labels(&reorder_by_outline(&input)), vec!["x", "OE2", "a", "b"]);
    }

    #[test]
    fn test_orphan_placed_after_first_empty_element() {
        // "Edited" was stored first but belongs to OE3, which has no inline text.
        let objs = [
            text(10, "Edited"),
            node(1, &[2, 3, 4]),
            oe(2, &[]),
            text(11, "First"),
            oe(3, &[]),
            oe(4, &[]),
            text(12, "Last"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = reorder_by_outline(&input);

        assert_eq!(
            labels(&out),
            vec!["ON1", "OE2", "First", "OE3", "Edited", "OE4", "Last"]
        );
        assert_ne!(labels(&out)[0], "Edited");
    }

    #[test]
    fn test_nested_children_depth_first() {
        let objs = [
            text(10, "orphan"),
            node(1, &[2, 5]),
            oe(2, &[3]),
            text(20, "parent"),
            oe(3, &[]),
            text(30, "child"),
            oe(5, &[]),
            text(50, "sibling"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = reorder_by_outline(&input);
        assert_eq!(
            labels(&out),
            vec!["ON1", "OE2", "parent", "OE3", "child", "OE5", "sibling", "orphan"]
        );
    }

    #[test]
    fn test_roots_sorted_by_vertical_offset() {
        let objs = [
            text(10, "orphan"),
            node(1, &[2]).with(props::OFFSET_FROM_PARENT_VERT, 200),
            oe(2, &[]),
            text(20, "bottom"),
            node(3, &[4]).with(props::OFFSET_FROM_PARENT_VERT, 100),
            oe(4, &[]),
            text(40, "top"),
            node(5, &[6]),
            oe(6, &[]),
            text(60, "title"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = reorder_by_outline(&input);
        let l = labels(&out);
        let pos = |s: &str| l.iter().position(|x| x == s).unwrap();

        assert!(pos("title") < pos("top"));
        assert!(pos("top") < pos("bottom"));
        assert_eq!(out.len(), objs.len());
    }

    #[test]
    fn test_cycle_terminates_and_keeps_all_objects() {
        let objs = [
            text(10, "orphan"),
            node(1, &[2]),
            oe(2, &[3]),
            oe(3, &[2]),
            text(30, "leaf"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = reorder_by_outline(&input);
        assert_eq!(out.len(), 5);
        assert_eq!(labels(&out), vec!["ON1", "OE2", "orphan", "OE3", "leaf"]);
    }

    #[test]
    fn test_unreached_objects_appended() {
        let objs = [
            text(10, "orphan"),
            node(1, &[2]),
            oe(2, &[]),
            oe(7, &[]),
            text(70, "stray"),
        ];
        let input: Vec<&TypedObject> = objs.iter().collect();
        let out = reorder_by_outline(&input);
        assert_eq!(labels(&out), vec!["ON1", "OE2", "orphan", "OE7", "stray"]);
    }
}
