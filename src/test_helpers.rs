//! Shared test utilities for the archive-pages test suite.
//!
//! Provides builders for query-results documents and lookup helpers that
//! panic with a clear message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = query_results_json(Some(3), &[("blogs", 7)]);
//! let source = source::from_json(&doc, &SiteConfig::default()).unwrap();
//! let (_, table) = pages::plan_table(&source, &SiteConfig::default(), None).unwrap();
//!
//! let page = find_page(&table, "blogs/2");
//! ```

use serde_json::json;

use crate::registry::PageTable;
use crate::source::{Collection, Source};
use crate::types::{ContentItem, PageRecord};

// =========================================================================
// Builders
// =========================================================================

/// `n` items with ids `{prefix}-1..={prefix}-n` and URIs `/{prefix}/{id}/`.
pub fn items(prefix: &str, n: usize) -> Vec<ContentItem> {
    (1..=n)
        .map(|i| {
            let id = format!("{prefix}-{i}");
            ContentItem {
                uri: format!("/{prefix}/{id}/"),
                id,
            }
        })
        .collect()
}

/// A query-results document with the given `postsPerPage` and
/// `(category, item count)` collections, edges shaped like the CMS returns
/// them (with `previous`/`next` objects).
pub fn query_results_json(posts_per_page: Option<i64>, collections: &[(&str, usize)]) -> String {
    let mut by_category = serde_json::Map::new();
    for (category, count) in collections {
        let list = items(category, *count);
        let edges: Vec<serde_json::Value> = list
            .iter()
            .enumerate()
            .map(|(i, item)| {
                json!({
                    "previous": i.checked_sub(1).map(|p| json!({ "id": list[p].id })),
                    "node": { "id": item.id, "uri": item.uri },
                    "next": list.get(i + 1).map(|n| json!({ "id": n.id })),
                })
            })
            .collect();
        by_category.insert(
            category.to_string(),
            json!({ "data": { "allWpPost": { "edges": edges } } }),
        );
    }
    json!({
        "settings": { "data": { "wp": { "readingSettings": { "postsPerPage": posts_per_page } } } },
        "collections": by_category,
    })
    .to_string()
}

// =========================================================================
// Lookups (panic with a clear message on miss)
// =========================================================================

/// Find a resolved collection by config name. Panics if not found.
pub fn find_collection<'a>(source: &'a Source, name: &str) -> &'a Collection {
    source.collection(name).unwrap_or_else(|| {
        let names: Vec<&str> = source.collections.iter().map(|c| c.name.as_str()).collect();
        panic!("collection '{name}' not found. Available: {names:?}")
    })
}

/// Find a page by path. Panics if not found.
pub fn find_page<'a>(table: &'a PageTable, path: &str) -> &'a PageRecord {
    table.find(path).unwrap_or_else(|| {
        let paths: Vec<&str> = table.pages.iter().map(|p| p.path.as_str()).collect();
        panic!("page '{path}' not found. Available: {paths:?}")
    })
}

/// Item ids of a collection in order.
pub fn item_ids(collection: &Collection) -> Vec<&str> {
    collection.items.iter().map(|i| i.id.as_str()).collect()
}
