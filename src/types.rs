//! Shared types passed between the source, planner, and output stages.
//!
//! [`PageRecord`] is also the on-disk format of `pages.json`, so its JSON
//! field names follow what the site's templates read from their page context
//! (`postsPerPage`, `nextPagePath`, `previousPostId`, ...).

use serde::{Deserialize, Serialize};

/// A single published item (post, comic, chapter) as delivered by the CMS.
///
/// The order of items within a collection is the order the CMS returned
/// them in; nothing here re-sorts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    /// Site-relative URI of the item's detail page, e.g. `/2024/01/first-post/`.
    pub uri: String,
}

/// One page handed to the page registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub path: String,
    /// Template the registry renders this page with.
    pub template: String,
    pub context: PageContext,
}

/// Data the template receives for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageContext {
    /// Archive (list) page: the window of items to show and sibling links.
    #[serde(rename_all = "camelCase")]
    Archive {
        offset: usize,
        posts_per_page: usize,
        next_page_path: Option<String>,
        previous_page_path: Option<String>,
    },
    /// Detail page of a single item and the ids of its neighbours.
    #[serde(rename_all = "camelCase")]
    Detail {
        id: String,
        previous_post_id: Option<String>,
        next_post_id: Option<String>,
    },
}

impl PageContext {
    pub fn is_archive(&self) -> bool {
        matches!(self, PageContext::Archive { .. })
    }

    /// Replace absent archive links with `""`.
    ///
    /// Existing templates test links for truthiness, so an empty string and a
    /// missing link render the same. Detail ids are left as `null`.
    pub fn apply_empty_link_sentinel(&mut self) {
        if let PageContext::Archive {
            next_page_path,
            previous_page_path,
            ..
        } = self
        {
            next_page_path.get_or_insert_with(String::new);
            previous_page_path.get_or_insert_with(String::new);
        }
    }
}
