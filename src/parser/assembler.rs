//! Page assembly: grouping a section's object stream into pages.
//!
//! Every stored revision of a page shares the GUID part of its identity.
//! A GUID that owns a page node is a content GUID and becomes one page;
//! page metadata whose GUID owns no page node is orphaned and is adopted
//! by content GUIDs that have no metadata of their own.

use super::decode::{filetime_to_datetime, time32_to_datetime, timestamp};
use super::object::{props, JcidKind, TypedObject};
use crate::model::Page;
use std::collections::{HashMap, HashSet, VecDeque};

/// A page's metadata paired with its raw content objects.
#[derive(Debug, Clone)]
pub struct PageBucket<'a> {
    /// Page metadata, with no elements yet
    pub page: Page,

    /// Content objects belonging to the page, in stream order
    pub objects: Vec<&'a TypedObject>,
}

/// Group a section's objects into pages.
pub fn assemble_pages(objects: &[TypedObject]) -> Vec<PageBucket<'_>> {
    let mut by_guid: HashMap<&str, Vec<&TypedObject>> = HashMap::new();
    let mut metas: Vec<&TypedObject> = Vec::new();
    let mut page_guids: Vec<&str> = Vec::new();
    let mut page_guid_set: HashSet<&str> = HashSet::new();

    for obj in objects {
        let guid = obj.guid();
        by_guid.entry(guid).or_default().push(obj);

        match obj.kind {
            JcidKind::PageMetaData => metas.push(obj),
            JcidKind::PageNode => {
                if page_guid_set.insert(guid) {
                    page_guids.push(guid);
                }
            }
            _ => {}
        }
    }

    if metas.is_empty() {
        let content: Vec<&TypedObject> = objects
            .iter()
            .filter(|o| o.kind.is_page_content())
            .collect();
        if content.is_empty() {
            return Vec::new();
        }
        return vec![PageBucket {
            page: Page::default(),
            objects: content,
        }];
    }

    // Later metadata for a GUID overrides earlier; order is first-seen GUID.
    let mut meta_by_guid: HashMap<&str, &TypedObject> = HashMap::new();
    let mut meta_order: Vec<&str> = Vec::new();
    for meta in &metas {
        let guid = meta.guid();
        if meta_by_guid.insert(guid, meta).is_none() {
            meta_order.push(guid);
        }
    }

    let mut orphans: VecDeque<&TypedObject> = meta_order
        .iter()
        .filter(|g| !page_guid_set.contains(*g))
        .filter_map(|g| meta_by_guid.get(g).copied())
        .collect();

    let mut buckets: Vec<PageBucket<'_>> = Vec::new();
    let mut seen_titles: HashMap<String, usize> = HashMap::new();

    for guid in page_guids {
        let owned = by_guid.get(guid).map(Vec::as_slice).unwrap_or_default();

        let meta = match meta_by_guid.get(guid) {
            Some(meta) => Some(*meta),
            None => {
                let adopted = orphans.pop_front();
                if adopted.is_some() {
                    log::debug!("Page {} adopted orphan metadata", guid);
                }
                adopted
            }
        };

        let title = meta
            .map(|m| m.text(props::CACHED_TITLE_STRING))
            .unwrap_or_default();

        let mut page = Page::new(title.clone());
        if let Some(meta) = meta {
            page.level = u32::try_from(meta.int(props::PAGE_LEVEL)).unwrap_or(0);
            page.creation_time = timestamp(
                meta.get(props::TOPOLOGY_CREATION_TIME_STAMP),
                filetime_to_datetime,
            );
        }

        if let Some(node) = owned.iter().find(|o| o.kind == JcidKind::PageNode) {
            let author = node.text(props::AUTHOR);
            page.author = (!author.is_empty()).then_some(author);
            page.last_modified =
                timestamp(node.get(props::LAST_MODIFIED_TIME), time32_to_datetime);
        }

        let content: Vec<&TypedObject> = owned
            .iter()
            .copied()
            .filter(|o| o.kind.is_page_content())
            .collect();

        let bucket = PageBucket {
            page,
            objects: content,
        };

        let key = title.trim().to_lowercase();
        match seen_titles.get(&key) {
            Some(&idx) => {
                if bucket.objects.len() > buckets[idx].objects.len() {
                    log::debug!("Replacing revision of page '{}' with a fuller one", title);
                    buckets[idx] = bucket;
                }
            }
            None => {
                seen_titles.insert(key, buckets.len());
                buckets.push(bucket);
            }
        }
    }

    buckets
}
