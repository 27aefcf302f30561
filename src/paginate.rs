//! Archive pagination.
//!
//! Turns an ordered list of content items into a sequence of linked archive
//! pages. The list is cut into contiguous chunks of `page_size` (the last one
//! may be shorter) and every chunk becomes one [`PageDescriptor`]:
//!
//! ```text
//! 7 items, page_size = 3, route = "blogs"
//!
//! page 1  blogs     offset 0  len 3  prev -        next blogs/2
//! page 2  blogs/2   offset 3  len 3  prev blogs    next blogs/3
//! page 3  blogs/3   offset 6  len 1  prev blogs/2  next -
//! ```
//!
//! The paginator never looks inside the items; only their count and order
//! matter. Descriptors carry the window (`offset`, `page_size`) rather than
//! the items themselves, because the list template queries its own window
//! at render time.
//!
//! ## Page Size Fallback
//!
//! The page size comes from the CMS reading settings. A missing, zero, or
//! negative value falls back to 1, i.e. one archive page per item. See
//! [`effective_page_size`].

use crate::route::numbered_route;
use serde::Serialize;

/// Page size used when the CMS does not provide a usable `postsPerPage`.
pub const FALLBACK_PAGE_SIZE: usize = 1;

/// One archive page: its path, data window, and links to its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    /// 1-based page number.
    pub sequence_index: usize,
    /// Output path: the route itself for page 1, `route/N` afterwards.
    pub path: String,
    /// Zero-based index of the first item on this page.
    pub offset: usize,
    /// Configured items per page (the same for every page of an archive).
    pub page_size: usize,
    /// Number of items actually on this page (`<= page_size`).
    pub len: usize,
    pub previous_path: Option<String>,
    pub next_path: Option<String>,
}

impl PageDescriptor {
    /// The slice of `items` shown on this page.
    ///
    /// `items` must be the same list the descriptor was computed from.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.offset..self.offset + self.len]
    }

    pub fn is_first(&self) -> bool {
        self.previous_path.is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next_path.is_none()
    }
}

/// Resolve the raw `postsPerPage` setting into a usable page size.
///
/// - `None` → [`FALLBACK_PAGE_SIZE`]
/// - `Some(n)` with `n <= 0` → [`FALLBACK_PAGE_SIZE`]
/// - `Some(n)` with `n > 0` → `n`
pub fn effective_page_size(setting: Option<i64>) -> usize {
    setting
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(FALLBACK_PAGE_SIZE)
}

/// Number of archive pages needed for `total` items: `ceil(total / page_size)`.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Path of archive page `page_number` out of `total_pages`.
///
/// Page 1 is the route itself; pages `2..=total_pages` are `route/N`.
/// Anything outside `1..=total_pages` has no page and yields `None`.
pub fn page_path(route: &str, page_number: usize, total_pages: usize) -> Option<String> {
    match page_number {
        0 => None,
        n if n > total_pages => None,
        1 => Some(route.to_string()),
        n => Some(numbered_route(route, n)),
    }
}

/// Split `items` into archive pages of `page_size` under `route`.
///
/// `route` is used as given; callers pass a normalized route
/// (see [`crate::route::normalize_route`]). A `page_size` of 0 is treated as
/// [`FALLBACK_PAGE_SIZE`]. An empty `items` slice yields no pages.
pub fn paginate<T>(items: &[T], page_size: usize, route: &str) -> Vec<PageDescriptor> {
    let page_size = if page_size == 0 {
        FALLBACK_PAGE_SIZE
    } else {
        page_size
    };
    let total_pages = page_count(items.len(), page_size);

    items
        .chunks(page_size)
        .enumerate()
        .filter_map(|(index, chunk)| {
            let page_number = index + 1;
            Some(PageDescriptor {
                sequence_index: page_number,
                path: page_path(route, page_number, total_pages)?,
                offset: index * page_size,
                page_size,
                len: chunk.len(),
                previous_path: page_path(route, page_number - 1, total_pages),
                next_path: page_path(route, page_number + 1, total_pages),
            })
        })
        .collect()
}
