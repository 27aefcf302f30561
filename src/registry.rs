//! Page registry: where planned pages are handed off.
//!
//! The [`PageRegistry`] trait is the seam between planning and whatever
//! renders pages. The planner registers pages from several rayon workers at
//! once, so registries must be `Sync` and must not depend on call order.
//!
//! The production implementation is [`CollectingRegistry`], which gathers
//! records into a [`PageTable`] that the CLI writes as `pages.json`.

use crate::route::normalize_route;
use crate::types::PageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Page {path} rejected: {reason}")]
    Rejected { path: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receiver of planned pages.
pub trait PageRegistry: Sync {
    /// Register one page. Called concurrently; order carries no meaning.
    fn create_page(&self, page: PageRecord) -> Result<(), RegistryError>;
}

/// Registry that keeps every page in memory.
#[derive(Debug, Default)]
pub struct CollectingRegistry {
    pages: Mutex<Vec<PageRecord>>,
}

impl CollectingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish collecting and return the pages as a sorted table.
    pub fn into_table(self) -> PageTable {
        let pages = self
            .pages
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        PageTable::new(pages)
    }
}

impl PageRegistry for CollectingRegistry {
    fn create_page(&self, page: PageRecord) -> Result<(), RegistryError> {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page);
        Ok(())
    }
}

/// Every page of one planning run, sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTable {
    pub pages: Vec<PageRecord>,
}

impl PageTable {
    /// Build a table, sorting by path (then template) so output does not
    /// depend on registration order.
    pub fn new(mut pages: Vec<PageRecord>) -> Self {
        pages.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.template.cmp(&b.template)));
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn find(&self, path: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.path == path)
    }

    pub fn archive_pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(|p| p.context.is_archive())
    }

    pub fn detail_pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().filter(|p| !p.context.is_archive())
    }

    /// Paths registered more than once, with their counts.
    ///
    /// Paths are compared in normalized form, so a CMS URI like `/blogs/2/`
    /// collides with the archive page `blogs/2`. The host generator would
    /// keep only one of the pages.
    pub fn duplicate_paths(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for page in &self.pages {
            *counts.entry(normalize_route(&page.path)).or_default() += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).collect()
    }

    /// Write the table as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::types::PageContext;
    use rayon::prelude::*;
    use tempfile::TempDir;

    /// Registry that rejects one path and records everything else.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockRegistry {
        pub reject_path: Option<String>,
        pub recorded: Mutex<Vec<PageRecord>>,
    }

    impl MockRegistry {
        pub fn rejecting(path: &str) -> Self {
            Self {
                reject_path: Some(path.to_string()),
                recorded: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded_paths(&self) -> Vec<String> {
            let mut paths: Vec<String> = self
                .recorded
                .lock()
                .unwrap()
                .iter()
                .map(|p| p.path.clone())
                .collect();
            paths.sort();
            paths
        }
    }

    impl PageRegistry for MockRegistry {
        fn create_page(&self, page: PageRecord) -> Result<(), RegistryError> {
            if self.reject_path.as_deref() == Some(page.path.as_str()) {
                return Err(RegistryError::Rejected {
                    path: page.path,
                    reason: "rejected by mock".to_string(),
                });
            }
            self.recorded.lock().unwrap().push(page);
            Ok(())
        }
    }

    fn detail(path: &str) -> PageRecord {
        PageRecord {
            path: path.to_string(),
            template: "Detail.tsx".to_string(),
            context: PageContext::Detail {
                id: path.to_string(),
                previous_post_id: None,
                next_post_id: None,
            },
        }
    }

    fn archive(path: &str) -> PageRecord {
        PageRecord {
            path: path.to_string(),
            template: "List.tsx".to_string(),
            context: PageContext::Archive {
                offset: 0,
                posts_per_page: 1,
                next_page_path: None,
                previous_page_path: None,
            },
        }
    }

    #[test]
    fn collecting_registry_sorts_by_path() {
        let registry = CollectingRegistry::new();
        for path in ["/c/", "blogs", "/a/"] {
            registry.create_page(detail(path)).unwrap();
        }
        let table = registry.into_table();
        let paths: Vec<&str> = table.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["/a/", "/c/", "blogs"]);
    }

    #[test]
    fn collecting_registry_accepts_parallel_registration() {
        let registry = CollectingRegistry::new();
        (0..200).into_par_iter().for_each(|i| {
            registry.create_page(detail(&format!("/p{i:03}/"))).unwrap();
        });
        let table = registry.into_table();
        assert_eq!(table.len(), 200);
        assert_eq!(table.pages[0].path, "/p000/");
        assert_eq!(table.pages[199].path, "/p199/");
    }

    #[test]
    fn table_splits_archive_and_detail() {
        let table = PageTable::new(vec![archive("blogs"), detail("/x/"), archive("blogs/2")]);
        assert_eq!(table.archive_pages().count(), 2);
        assert_eq!(table.detail_pages().count(), 1);
        assert!(table.find("blogs/2").is_some());
        assert!(table.find("blogs/3").is_none());
    }

    #[test]
    fn duplicate_paths_reported() {
        let table = PageTable::new(vec![archive("blogs"), detail("blogs"), detail("/x/")]);
        assert_eq!(table.duplicate_paths(), vec![("blogs".to_string(), 2)]);
    }

    #[test]
    fn duplicate_paths_compare_normalized_shapes() {
        let table = PageTable::new(vec![
            archive("blogs"),
            archive("blogs/2"),
            detail("/blogs/"),
            detail("/blogs/2/"),
            detail("/blogs/3/"),
        ]);
        assert_eq!(
            table.duplicate_paths(),
            vec![("blogs".to_string(), 2), ("blogs/2".to_string(), 2)]
        );
    }

    #[test]
    fn no_duplicates_in_distinct_table() {
        let table = PageTable::new(vec![archive("blogs"), detail("/x/")]);
        assert!(table.duplicate_paths().is_empty());
    }

    #[test]
    fn write_and_read_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out/pages.json");
        let table = PageTable::new(vec![archive("blogs"), detail("/x/")]);
        table.write_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["pages"][0]["path"], "/x/");
        assert_eq!(json["pages"][1]["context"]["postsPerPage"], 1);

        assert_eq!(PageTable::read_json(&path).unwrap(), table);
    }

    #[test]
    fn mock_registry_rejects_configured_path() {
        let registry = MockRegistry::rejecting("/bad/");
        assert!(registry.create_page(detail("/ok/")).is_ok());
        let err = registry.create_page(detail("/bad/")).unwrap_err();
        assert!(err.to_string().contains("/bad/"));
        assert_eq!(registry.recorded_paths(), vec!["/ok/"]);
    }
}
