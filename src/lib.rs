//! # archive-pages
//!
//! Plans the pages of a headless-CMS static site. The host generator runs the
//! site's GraphQL queries; this crate takes the resolved results and works
//! out every page to create: one detail page per post, comic, or chapter, and
//! a paginated archive per collection.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Source   queries.json  →  Source       (GraphQL responses → ordered items)
//! 2. Plan     Source        →  pages.json   (items → archive + detail pages)
//! ```
//!
//! Both stages are pure functions of their input apart from reading and
//! writing the JSON files, so tests exercise them without a CMS or a
//! generator.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | Stage 1: parses query results, aborts on upstream errors |
//! | [`pages`] | Stage 2: plans detail and archive pages per collection |
//! | [`paginate`] | Archive chunking and page path/link computation |
//! | [`registry`] | `PageRegistry` seam and the collected `PageTable` |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`types`] | Shared types (`ContentItem`, `PageRecord`, `PageContext`) |
//! | [`route`] | Archive route normalization |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Routine for Every Collection
//!
//! Blogs, comics, and chapters differ only in category, route, and templates.
//! They are entries in `config.toml` planned by the same code, so adding a
//! collection is a config change.
//!
//! ## Absent Links Are `Option`
//!
//! A first page has no previous link and a last page no next link; both are
//! `None` and serialize as `null`. Sites whose templates expect the empty
//! string can turn on `[output] empty_link_sentinel`.
//!
//! ## Page Size Falls Back to 1
//!
//! When the CMS reading settings carry no usable `postsPerPage`, archives get
//! one item per page instead of failing the build.

pub mod config;
pub mod output;
pub mod pages;
pub mod paginate;
pub mod registry;
pub mod route;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
