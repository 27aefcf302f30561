//! Query-result loading.
//!
//! Stage 1 of the planning pipeline. The site's GraphQL queries are run by
//! the host generator; this module reads their resolved responses from one
//! JSON document and turns them into ordered item lists per collection.
//!
//! ## Document Layout
//!
//! ```json
//! {
//!   "settings": {
//!     "data": { "wp": { "readingSettings": { "postsPerPage": 10 } } }
//!   },
//!   "collections": {
//!     "blogs": {
//!       "data": {
//!         "allWpPost": {
//!           "edges": [
//!             { "previous": null, "node": { "id": "p1", "uri": "/p1/" }, "next": { "id": "p2" } }
//!           ]
//!         }
//!       }
//!     },
//!     "comics": { "errors": [{ "message": "Cannot query field \"allWpPost\"" }] }
//!   }
//! }
//! ```
//!
//! Collection responses are keyed by CMS category, exactly as each response
//! came back from the server. Edge `previous`/`next` objects are ignored:
//! neighbours are recomputed from edge order by the planner.
//!
//! ## Failure Rules
//!
//! - A collection response carrying errors aborts the whole load with
//!   [`SourceError::Query`], reporting every upstream message verbatim.
//! - A missing collection key or a `data: null` response is an empty
//!   collection.
//! - The settings response is best effort: errors or missing fields leave
//!   `posts_per_page` unset, and the planner falls back to one item per page.

use crate::config::SiteConfig;
use crate::types::ContentItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "There was an error loading collection '{collection}' (category \"{category}\"):{}",
        error_lines(.errors)
    )]
    Query {
        collection: String,
        category: String,
        errors: Vec<GraphqlError>,
    },
}

fn error_lines(errors: &[GraphqlError]) -> String {
    errors.iter().map(|e| format!("\n    {e}")).collect()
}

/// A GraphQL response envelope: `data`, `errors`, or both.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

impl<T> GraphqlResponse<T> {
    /// Upstream errors, if the response carries a non-empty error list.
    pub fn errors(&self) -> Option<&[GraphqlError]> {
        self.errors.as_deref().filter(|e| !e.is_empty())
    }
}

/// One entry of a GraphQL `errors` list.
///
/// Only `message` is required by the GraphQL spec; `locations`, `path`, and
/// `extensions` are kept as-is so nothing is lost when reporting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.message)
        } else {
            let details = serde_json::Value::Object(self.details.clone());
            write!(f, "{} {}", self.message, details)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsData {
    pub wp: Option<WpSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpSettings {
    pub reading_settings: Option<ReadingSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSettings {
    pub posts_per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsData {
    pub all_wp_post: PostConnection,
}

#[derive(Debug, Deserialize)]
pub struct PostConnection {
    #[serde(default)]
    pub edges: Vec<PostEdge>,
}

#[derive(Debug, Deserialize)]
pub struct PostEdge {
    pub node: ContentItem,
}

/// The raw query-results document.
#[derive(Debug, Default, Deserialize)]
pub struct QueryResults {
    #[serde(default)]
    pub settings: Option<GraphqlResponse<SettingsData>>,
    #[serde(default)]
    pub collections: BTreeMap<String, GraphqlResponse<PostsData>>,
}

impl QueryResults {
    /// The raw `postsPerPage` reading setting, if the CMS returned one.
    pub fn posts_per_page(&self) -> Option<i64> {
        self.settings
            .as_ref()?
            .data
            .as_ref()?
            .wp
            .as_ref()?
            .reading_settings
            .as_ref()?
            .posts_per_page
    }
}

/// Resolved input of the planner: ordered items per enabled collection.
#[derive(Debug, Serialize)]
pub struct Source {
    /// `postsPerPage` exactly as the CMS reported it (may be absent or <= 0).
    pub posts_per_page: Option<i64>,
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    /// Config name of the collection (`blogs`, `chapters`, ...).
    pub name: String,
    pub category: String,
    /// Items in the order the CMS returned them.
    pub items: Vec<ContentItem>,
}

impl Source {
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }

    pub fn item_count(&self) -> usize {
        self.collections.iter().map(|c| c.items.len()).sum()
    }
}

/// Read and resolve a query-results document from disk.
pub fn load(path: &Path, config: &SiteConfig) -> Result<Source, SourceError> {
    let content = fs::read_to_string(path)?;
    from_json(&content, config)
}

/// Parse and resolve a query-results document.
pub fn from_json(json: &str, config: &SiteConfig) -> Result<Source, SourceError> {
    let results: QueryResults = serde_json::from_str(json)?;
    resolve(results, config)
}

/// Pick each enabled collection's items out of the query results.
///
/// Fails on the first collection (in name order) whose response carries
/// errors; no partial result is returned. Collections sharing a category each
/// get the full item list.
pub fn resolve(results: QueryResults, config: &SiteConfig) -> Result<Source, SourceError> {
    let posts_per_page = results.posts_per_page();
    let mut collections = Vec::new();

    for (name, collection) in config.enabled_collections() {
        let items = match results.collections.get(&collection.category) {
            Some(response) => {
                if let Some(errors) = response.errors() {
                    return Err(SourceError::Query {
                        collection: name.to_string(),
                        category: collection.category.clone(),
                        errors: errors.to_vec(),
                    });
                }
                response
                    .data
                    .as_ref()
                    .map(|d| d.all_wp_post.edges.iter().map(|e| e.node.clone()).collect())
                    .unwrap_or_default()
            }
            None => Vec::new(),
        };
        collections.push(Collection {
            name: name.to_string(),
            category: collection.category.clone(),
            items,
        });
    }

    Ok(Source {
        posts_per_page,
        collections,
    })
}
