//! List type and nesting depth for outline elements.
//!
//! An outline element that starts a list item references a number-list
//! node. The node's format marker decides numbered versus bulleted, and its
//! MSAA index stands in for nesting depth, since the stream does not record
//! depth directly. Elements listed directly under an outline node are
//! always at depth 0.

use super::object::{props, JcidKind, TypedObject};
use crate::model::ListType;
use std::collections::{HashMap, HashSet};

/// Format marker of a numbered list.
const NUMBERED_FORMAT: u32 = 0x03;

/// A lookup from MSAA index to nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthTable {
    entries: Vec<(i64, u8)>,
    fallback: u8,
}

impl DepthTable {
    /// Create a table from `(msaa_index, depth)` pairs.
    pub fn new(entries: &[(i64, u8)], fallback: u8) -> Self {
        Self {
            entries: entries.to_vec(),
            fallback,
        }
    }

    /// Depth for an MSAA index, or the fallback.
    pub fn depth(&self, msaa: i64) -> u8 {
        self.entries
            .iter()
            .find(|(index, _)| *index == msaa)
            .map(|(_, depth)| *depth)
            .unwrap_or(self.fallback)
    }

    /// Observed depths for bulleted lists.
    pub fn bullets() -> Self {
        Self::new(&[(1, 1), (4, 2), (9, 3)], 1)
    }

    /// Observed depths for numbered lists.
    pub fn numbered() -> Self {
        Self::new(&[(36, 1), (53, 2), (45, 3)], 1)
    }
}

/// Resolved list membership of an outline element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListInfo {
    /// Numbered or bulleted
    pub list_type: ListType,

    /// Nesting depth (0 = top level)
    pub indent_level: u8,
}

/// Resolves list info for the outline elements of one page.
#[derive(Debug, Clone)]
pub struct ListResolver<'a> {
    list_nodes: HashMap<&'a str, &'a TypedObject>,
    top_level: HashSet<&'a str>,
    bullets: DepthTable,
    numbered: DepthTable,
}

impl<'a> ListResolver<'a> {
    /// Index the page's list nodes and top-level outline elements.
    pub fn new(objects: &[&'a TypedObject]) -> Self {
        Self::with_tables(objects, DepthTable::bullets(), DepthTable::numbered())
    }

    /// Like [`ListResolver::new`] with custom depth tables.
    pub fn with_tables(
        objects: &[&'a TypedObject],
        bullets: DepthTable,
        numbered: DepthTable,
    ) -> Self {
        let mut list_nodes = HashMap::new();
        let mut top_level = HashSet::new();

        for &obj in objects {
            match obj.kind {
                JcidKind::NumberListNode => {
                    list_nodes.insert(obj.identity.as_str(), obj);
                }
                JcidKind::OutlineNode => {
                    top_level.extend(obj.refs(props::CHILD_NODES));
                }
                _ => {}
            }
        }

        Self {
            list_nodes,
            top_level,
            bullets,
            numbered,
        }
    }

    /// Resolve list info for an outline element. `None` when the element
    /// carries no list marker.
    pub fn resolve(&self, element: &TypedObject) -> Option<ListInfo> {
        let list_ref = *element.refs(props::LIST_NODES).first()?;

        let Some(node) = self.list_nodes.get(list_ref) else {
            log::debug!(
                "List node {} not found; treating as a top-level bullet",
                list_ref
            );
            return Some(ListInfo {
                list_type: ListType::Unordered,
                indent_level: 0,
            });
        };

        let format = node
            .get(props::NUMBER_LIST_FORMAT)
            .map(|v| v.first_byte())
            .unwrap_or(0);
        let list_type = if format == NUMBERED_FORMAT {
            ListType::Ordered
        } else {
            ListType::Unordered
        };

        let indent_level = if self.top_level.contains(element.identity.as_str()) {
            0
        } else {
            let msaa = node
                .get(props::LIST_MSAA_INDEX)
                .map(|v| v.as_short())
                .unwrap_or(0);
            match list_type {
                ListType::Ordered => self.numbered.depth(msaa),
                ListType::Unordered => self.bullets.depth(msaa),
            }
        };

        Some(ListInfo {
            list_type,
            indent_level,
        })
    }
}

/// List context carried across the page scan.
///
/// A list marker on an outline element replaces the context. An element
/// without a marker keeps the context only while it has not produced any
/// content yet, which covers wrapper elements whose list text was stored
/// separately after an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListState {
    current: Option<ListInfo>,
    used: bool,
}

impl ListState {
    /// Update the context on entering an outline element.
    pub fn enter_element(&mut self, resolved: Option<ListInfo>) {
        match resolved {
            Some(info) => {
                self.current = Some(info);
                self.used = false;
            }
            None if self.used => {
                self.current = None;
            }
            None => {}
        }
    }

    /// Record that an element was emitted under the current context.
    pub fn mark_used(&mut self) {
        if self.current.is_some() {
            self.used = true;
        }
    }

    /// The active list info.
    pub fn current(&self) -> Option<ListInfo> {
        self.current
    }
}
