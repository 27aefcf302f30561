//! Page planning.
//!
//! Stage 2 of the planning pipeline. Takes the resolved [`Source`] and
//! registers every page the site needs with a [`PageRegistry`]:
//!
//! - **Detail pages**: one per item, at the item's own URI, linked to the
//!   ids of its neighbours in CMS order.
//! - **Archive pages**: for collections with an `archive_route`, one page
//!   per chunk of `postsPerPage` items (see [`crate::paginate`]).
//!
//! The same routine runs for every collection; only the collection's route
//! and templates differ.
//!
//! ## Parallel Planning
//!
//! Collections are planned in parallel with [rayon](https://docs.rs/rayon),
//! and pages within a collection are registered in parallel too. Pages do not
//! depend on each other and the collected [`PageTable`] is sorted, so the
//! result is identical to a sequential run.

use crate::config::{CollectionConfig, SiteConfig};
use crate::paginate::{PageDescriptor, effective_page_size, paginate};
use crate::registry::{CollectingRegistry, PageRegistry, PageTable, RegistryError};
use crate::source::{Collection, Source};
use crate::types::{ContentItem, PageContext, PageRecord};
use rayon::prelude::*;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Collection '{0}' is not configured")]
    UnknownCollection(String),
}

/// Progress event emitted as each collection finishes planning.
#[derive(Debug, Clone)]
pub enum PlanEvent {
    CollectionPlanned {
        name: String,
        item_count: usize,
        archive_pages: usize,
        detail_pages: usize,
    },
}

/// A detail page's place in its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub id: String,
    pub uri: String,
    pub previous_id: Option<String>,
    pub next_id: Option<String>,
}

/// What was planned for one collection.
#[derive(Debug, Clone)]
pub struct CollectionPlan {
    pub name: String,
    pub category: String,
    pub item_count: usize,
    /// Normalized archive route; `None` for detail-only collections.
    pub archive_route: Option<String>,
    pub archive: Vec<PageDescriptor>,
    pub details: Vec<DetailLink>,
}

/// Result of a planning run, in collection name order.
#[derive(Debug, Clone)]
pub struct PlanSummary {
    /// Effective page size after the fallback for missing settings.
    pub page_size: usize,
    /// `postsPerPage` as the CMS reported it.
    pub posts_per_page_setting: Option<i64>,
    pub collections: Vec<CollectionPlan>,
}

impl PlanSummary {
    pub fn archive_page_count(&self) -> usize {
        self.collections.iter().map(|c| c.archive.len()).sum()
    }

    pub fn detail_page_count(&self) -> usize {
        self.collections.iter().map(|c| c.details.len()).sum()
    }
}

/// Link every item to its immediate neighbours in `items` order.
///
/// Chunking plays no part here: the last item of one archive page links to
/// the first item of the next.
pub fn detail_links(items: &[ContentItem]) -> Vec<DetailLink> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| DetailLink {
            id: item.id.clone(),
            uri: item.uri.clone(),
            previous_id: i.checked_sub(1).map(|p| items[p].id.clone()),
            next_id: items.get(i + 1).map(|n| n.id.clone()),
        })
        .collect()
}

fn detail_record(link: &DetailLink, template: &str) -> PageRecord {
    PageRecord {
        path: link.uri.clone(),
        template: template.to_string(),
        context: PageContext::Detail {
            id: link.id.clone(),
            previous_post_id: link.previous_id.clone(),
            next_post_id: link.next_id.clone(),
        },
    }
}

fn archive_record(page: &PageDescriptor, template: &str, empty_link_sentinel: bool) -> PageRecord {
    let mut context = PageContext::Archive {
        offset: page.offset,
        posts_per_page: page.page_size,
        next_page_path: page.next_path.clone(),
        previous_page_path: page.previous_path.clone(),
    };
    if empty_link_sentinel {
        context.apply_empty_link_sentinel();
    }
    PageRecord {
        path: page.path.clone(),
        template: template.to_string(),
        context,
    }
}

/// Plan and register the pages of one collection.
pub fn plan_collection(
    collection: &Collection,
    config: &CollectionConfig,
    page_size: usize,
    empty_link_sentinel: bool,
    registry: &impl PageRegistry,
) -> Result<CollectionPlan, PlanError> {
    let details = detail_links(&collection.items);
    let archive_route = config.route();
    let archive = match &archive_route {
        Some(route) => paginate(&collection.items, page_size, route),
        None => Vec::new(),
    };

    let mut records: Vec<PageRecord> = details
        .iter()
        .map(|link| detail_record(link, &config.detail_template))
        .collect();
    if let Some(template) = &config.list_template {
        records.extend(
            archive
                .iter()
                .map(|page| archive_record(page, template, empty_link_sentinel)),
        );
    }

    records
        .into_par_iter()
        .try_for_each(|record| registry.create_page(record))?;

    Ok(CollectionPlan {
        name: collection.name.clone(),
        category: collection.category.clone(),
        item_count: collection.items.len(),
        archive_route,
        archive,
        details,
    })
}

/// Plan every collection of `source` into `registry`.
///
/// Fails if the registry rejects a page or a collection has no config entry.
/// Pages registered before a failure stay registered.
pub fn plan(
    source: &Source,
    config: &SiteConfig,
    registry: &impl PageRegistry,
    events: Option<Sender<PlanEvent>>,
) -> Result<PlanSummary, PlanError> {
    let page_size = effective_page_size(source.posts_per_page);
    let sentinel = config.output.empty_link_sentinel;

    let collections = source
        .collections
        .par_iter()
        .map(|collection| -> Result<CollectionPlan, PlanError> {
            let collection_config = config
                .collections
                .get(&collection.name)
                .ok_or_else(|| PlanError::UnknownCollection(collection.name.clone()))?;
            let planned =
                plan_collection(collection, collection_config, page_size, sentinel, registry)?;
            if let Some(tx) = &events {
                tx.send(PlanEvent::CollectionPlanned {
                    name: planned.name.clone(),
                    item_count: planned.item_count,
                    archive_pages: planned.archive.len(),
                    detail_pages: planned.details.len(),
                })
                .ok();
            }
            Ok(planned)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlanSummary {
        page_size,
        posts_per_page_setting: source.posts_per_page,
        collections,
    })
}

/// Plan into a fresh [`CollectingRegistry`] and return the sorted table.
pub fn plan_table(
    source: &Source,
    config: &SiteConfig,
    events: Option<Sender<PlanEvent>>,
) -> Result<(PlanSummary, PageTable), PlanError> {
    let registry = CollectingRegistry::new();
    let summary = plan(source, config, &registry, events)?;
    Ok((summary, registry.into_table()))
}
