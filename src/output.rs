//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every collection is
//! shown by positional index and name first, with its category, routes, and
//! page windows as indented context lines. The output reads as an inventory
//! of what the site will contain.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Settings
//!     postsPerPage: 3
//!
//! Collections
//! 001 blogs (7 items)
//!     Category: blogs
//!     001 blogs-1 → /2024/first-post/
//!     002 blogs-2 → /2024/second-post/
//! ```
//!
//! ## Plan
//!
//! ```text
//! Page size: 3
//! 001 blogs (7 items)
//!     Archive: blogs
//!         001 blogs (items 1-3)
//!         002 blogs/2 (items 4-6)
//!         003 blogs/3 (item 7)
//!     Detail pages: 7
//! 002 chapters (0 items)
//!     No pages
//!
//! Planned 3 archive pages, 7 detail pages
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::pages::{CollectionPlan, PlanEvent, PlanSummary};
use crate::paginate::PageDescriptor;
use crate::registry::PageTable;
use crate::source::Source;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Singular/plural item count: `1 item`, `7 items`.
fn item_count(n: usize) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{n} items")
    }
}

/// Format a collection header: positional index + name + item count.
///
/// ```text
/// 001 blogs (7 items)
/// ```
fn collection_header(index: usize, name: &str, items: usize) -> String {
    format!("{} {} ({})", format_index(index), name, item_count(items))
}

/// Format an archive page line with its 1-based item range.
///
/// ```text
/// 002 blogs/2 (items 4-6)
/// 003 blogs/3 (item 7)
/// ```
fn archive_line(page: &PageDescriptor) -> String {
    let first = page.offset + 1;
    let last = page.offset + page.len;
    let range = if first == last {
        format!("item {first}")
    } else {
        format!("items {first}-{last}")
    };
    format!("{} {} ({})", format_index(page.sequence_index), page.path, range)
}

fn page_size_line(summary: &PlanSummary) -> String {
    match summary.posts_per_page_setting {
        Some(n) if n > 0 => format!("Page size: {}", summary.page_size),
        Some(n) => format!(
            "Page size: {} (postsPerPage = {n} is not positive)",
            summary.page_size
        ),
        None => format!("Page size: {} (postsPerPage not set)", summary.page_size),
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format the resolved query results as a content inventory.
pub fn format_scan_output(source: &Source) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Settings".to_string());
    match source.posts_per_page {
        Some(n) => lines.push(format!("{}postsPerPage: {n}", indent(1))),
        None => lines.push(format!("{}postsPerPage: (not set)", indent(1))),
    }

    lines.push(String::new());
    lines.push("Collections".to_string());
    for (i, collection) in source.collections.iter().enumerate() {
        lines.push(collection_header(
            i + 1,
            &collection.name,
            collection.items.len(),
        ));
        lines.push(format!("{}Category: {}", indent(1), collection.category));
        for (j, item) in collection.items.iter().enumerate() {
            lines.push(format!(
                "{}{} {} \u{2192} {}",
                indent(1),
                format_index(j + 1),
                item.id,
                item.uri
            ));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(source: &Source) {
    for line in format_scan_output(source) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Plan output
// ============================================================================

/// Format a single planning progress event.
pub fn format_plan_event(event: &PlanEvent) -> Vec<String> {
    match event {
        PlanEvent::CollectionPlanned {
            name,
            item_count: items,
            archive_pages,
            detail_pages,
        } => vec![format!(
            "Planned {name}: {} \u{2192} {archive_pages} archive, {detail_pages} detail",
            item_count(*items)
        )],
    }
}

fn collection_lines(index: usize, plan: &CollectionPlan) -> Vec<String> {
    let mut lines = vec![collection_header(index, &plan.name, plan.item_count)];

    if plan.archive.is_empty() && plan.details.is_empty() {
        lines.push(format!("{}No pages", indent(1)));
        return lines;
    }

    if let Some(route) = &plan.archive_route {
        lines.push(format!("{}Archive: {route}", indent(1)));
        for page in &plan.archive {
            lines.push(format!("{}{}", indent(2), archive_line(page)));
        }
    }
    lines.push(format!("{}Detail pages: {}", indent(1), plan.details.len()));
    lines
}

/// Format the result of a planning run.
///
/// Information-first: each collection leads with its index and name, its
/// archive pages are listed with the item window they show.
pub fn format_plan_output(summary: &PlanSummary, table: &PageTable) -> Vec<String> {
    let mut lines = vec![page_size_line(summary)];

    for (i, plan) in summary.collections.iter().enumerate() {
        lines.extend(collection_lines(i + 1, plan));
    }

    let duplicates = table.duplicate_paths();
    if !duplicates.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for (path, count) in duplicates {
            lines.push(format!(
                "{}{path} is registered {count} times; only one page will be kept",
                indent(1)
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Planned {} archive pages, {} detail pages",
        summary.archive_page_count(),
        summary.detail_page_count()
    ));
    lines
}

/// Print plan output to stdout.
pub fn print_plan_output(summary: &PlanSummary, table: &PageTable) {
    for line in format_plan_output(summary, table) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::pages::plan_table;
    use crate::test_helpers::*;

    fn planned(posts_per_page: Option<i64>, counts: &[(&str, usize)]) -> (PlanSummary, PageTable) {
        let doc = query_results_json(posts_per_page, counts);
        let source = crate::source::from_json(&doc, &SiteConfig::default()).unwrap();
        plan_table(&source, &SiteConfig::default(), None).unwrap()
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn item_count_singular_and_plural() {
        assert_eq!(item_count(0), "0 items");
        assert_eq!(item_count(1), "1 item");
        assert_eq!(item_count(7), "7 items");
    }

    #[test]
    fn collection_header_format() {
        assert_eq!(collection_header(2, "comics", 1), "002 comics (1 item)");
    }

    #[test]
    fn archive_line_ranges() {
        let pages = crate::paginate::paginate(&items("b", 7), 3, "blogs");
        assert_eq!(archive_line(&pages[0]), "001 blogs (items 1-3)");
        assert_eq!(archive_line(&pages[2]), "003 blogs/3 (item 7)");
    }

    // =========================================================================
    // Scan output
    // =========================================================================

    #[test]
    fn scan_output_lists_items() {
        let doc = query_results_json(Some(3), &[("blogs", 2)]);
        let source = crate::source::from_json(&doc, &SiteConfig::default()).unwrap();
        let lines = format_scan_output(&source);
        assert_eq!(lines[0], "Settings");
        assert_eq!(lines[1], "    postsPerPage: 3");
        assert!(lines.contains(&"001 blogs (2 items)".to_string()));
        assert!(lines.contains(&"    Category: blogs".to_string()));
        assert!(lines.contains(&"    002 blogs-2 \u{2192} /blogs/blogs-2/".to_string()));
    }

    #[test]
    fn scan_output_unset_page_size() {
        let doc = query_results_json(None, &[]);
        let source = crate::source::from_json(&doc, &SiteConfig::default()).unwrap();
        assert_eq!(format_scan_output(&source)[1], "    postsPerPage: (not set)");
    }

    // =========================================================================
    // Plan output
    // =========================================================================

    #[test]
    fn plan_output_lists_archive_windows() {
        let (summary, table) = planned(Some(3), &[("blogs", 7)]);
        let lines = format_plan_output(&summary, &table);
        assert_eq!(lines[0], "Page size: 3");
        assert_eq!(lines[1], "001 blogs (7 items)");
        assert_eq!(lines[2], "    Archive: blogs");
        assert_eq!(lines[3], "        001 blogs (items 1-3)");
        assert_eq!(lines[4], "        002 blogs/2 (items 4-6)");
        assert_eq!(lines[5], "        003 blogs/3 (item 7)");
        assert_eq!(lines[6], "    Detail pages: 7");
        assert_eq!(lines[7], "002 chapters (0 items)");
        assert_eq!(lines[8], "    No pages");
        assert_eq!(
            lines.last().unwrap(),
            "Planned 3 archive pages, 7 detail pages"
        );
    }

    #[test]
    fn plan_output_explains_fallback() {
        let (summary, table) = planned(None, &[]);
        assert_eq!(
            format_plan_output(&summary, &table)[0],
            "Page size: 1 (postsPerPage not set)"
        );
        let (summary, table) = planned(Some(0), &[]);
        assert_eq!(
            format_plan_output(&summary, &table)[0],
            "Page size: 1 (postsPerPage = 0 is not positive)"
        );
    }

    #[test]
    fn plan_output_warns_on_duplicates() {
        use crate::types::{PageContext, PageRecord};
        let (summary, table) = planned(Some(3), &[("blogs", 1)]);
        let mut pages = table.pages.clone();
        pages.push(PageRecord {
            path: "blogs".to_string(),
            template: "Other.tsx".to_string(),
            context: PageContext::Detail {
                id: "x".to_string(),
                previous_post_id: None,
                next_post_id: None,
            },
        });
        let lines = format_plan_output(&summary, &PageTable::new(pages));
        assert!(lines.contains(&"Warnings".to_string()));
        assert!(lines.contains(
            &"    blogs is registered 2 times; only one page will be kept".to_string()
        ));
    }

    #[test]
    fn plan_output_warns_when_item_uri_shadows_archive_page() {
        let doc = serde_json::json!({
            "settings": { "data": { "wp": { "readingSettings": { "postsPerPage": 1 } } } },
            "collections": {
                "blogs": { "data": { "allWpPost": { "edges": [
                    { "node": { "id": "a", "uri": "/blogs/" } },
                    { "node": { "id": "b", "uri": "/blogs/2/" } }
                ] } } }
            }
        })
        .to_string();
        let source = crate::source::from_json(&doc, &SiteConfig::default()).unwrap();
        let (summary, table) = plan_table(&source, &SiteConfig::default(), None).unwrap();
        let lines = format_plan_output(&summary, &table);
        assert!(lines.contains(
            &"    blogs is registered 2 times; only one page will be kept".to_string()
        ));
        assert!(lines.contains(
            &"    blogs/2 is registered 2 times; only one page will be kept".to_string()
        ));
    }

    #[test]
    fn plan_event_line() {
        let event = PlanEvent::CollectionPlanned {
            name: "blogs".to_string(),
            item_count: 7,
            archive_pages: 3,
            detail_pages: 7,
        };
        assert_eq!(
            format_plan_event(&event),
            vec!["Planned blogs: 7 items \u{2192} 3 archive, 7 detail"]
        );
    }
}
