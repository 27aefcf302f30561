//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file is
//! optional: stock defaults describe the three collections of the original
//! site (blogs, comics, chapters), and a user file only overrides what it
//! names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! empty_link_sentinel = false   # write missing archive links as "" instead of null
//!
//! [processing]
//! max_processes = 4             # Max parallel workers (omit for auto = CPU cores)
//!
//! [collections.blogs]
//! category = "blogs"            # CMS category the items are queried by
//! archive_route = "blogs"       # Paginated archive lives here (omit = no archive)
//! list_template = "src/templates/BlogList.tsx"
//! detail_template = "src/templates/BlogDetail.tsx"
//! enabled = true
//! ```
//!
//! ## Partial Configuration
//!
//! Collections are merged by name, so a user file can tweak one field of a
//! stock collection, switch one off, or add a new one:
//!
//! ```toml
//! [collections.chapters]
//! enabled = false
//!
//! [collections.news]
//! category = "news"
//! archive_route = "news"
//! list_template = "src/templates/NewsList.tsx"
//! detail_template = "src/templates/NewsDetail.tsx"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::route::normalize_route;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// How the page table is written.
    pub output: OutputConfig,
    /// Parallel planning settings.
    pub processing: ProcessingConfig,
    /// Content collections keyed by name (`blogs`, `comics`, ...).
    pub collections: BTreeMap<String, CollectionConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(
            "blogs".to_string(),
            CollectionConfig::archived("blogs", "blogs", "BlogList", "BlogDetail"),
        );
        collections.insert(
            "comics".to_string(),
            CollectionConfig::archived("comics", "comics", "ComicList", "ComicDetail"),
        );
        collections.insert(
            "chapters".to_string(),
            CollectionConfig {
                category: "comic-detail".to_string(),
                archive_route: None,
                list_template: None,
                detail_template: template_path("Chapter"),
                enabled: true,
            },
        );
        Self {
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
            collections,
        }
    }
}

fn template_path(name: &str) -> String {
    format!("src/templates/{name}.tsx")
}

impl SiteConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut routes: HashMap<String, &str> = HashMap::new();
        let mut categories: HashMap<&str, &str> = HashMap::new();
        for (name, collection) in self.enabled_collections() {
            if collection.category.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "collections.{name}.category must not be empty"
                )));
            }
            if let Some(other) = categories.insert(collection.category.as_str(), name) {
                return Err(ConfigError::Validation(format!(
                    "category \"{}\" is used by both collections.{other} and collections.{name}",
                    collection.category
                )));
            }
            if collection.detail_template.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "collections.{name}.detail_template must not be empty"
                )));
            }
            let Some(raw_route) = &collection.archive_route else {
                continue;
            };
            let route = normalize_route(raw_route);
            if route.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "collections.{name}.archive_route must name a path segment"
                )));
            }
            if collection
                .list_template
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
            {
                return Err(ConfigError::Validation(format!(
                    "collections.{name}.list_template is required with an archive_route"
                )));
            }
            if let Some(other) = routes.insert(route.clone(), name) {
                return Err(ConfigError::Validation(format!(
                    "archive route \"{route}\" is used by both collections.{other} and collections.{name}"
                )));
            }
        }
        if self.enabled_collections().next().is_none() {
            return Err(ConfigError::Validation(
                "at least one collection must be enabled".into(),
            ));
        }
        Ok(())
    }

    /// Enabled collections in name order.
    pub fn enabled_collections(&self) -> impl Iterator<Item = (&str, &CollectionConfig)> {
        self.collections
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(name, c)| (name.as_str(), c))
    }
}

/// One CMS collection: which items belong to it and which pages it gets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// CMS category name; also the key of the collection's query result.
    pub category: String,
    /// Base route of the paginated archive. `None` means detail pages only.
    pub archive_route: Option<String>,
    /// Template for archive pages (required when `archive_route` is set).
    pub list_template: Option<String>,
    /// Template for per-item detail pages.
    pub detail_template: String,
    pub enabled: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            category: String::new(),
            archive_route: None,
            list_template: None,
            detail_template: String::new(),
            enabled: true,
        }
    }
}

impl CollectionConfig {
    fn archived(category: &str, route: &str, list: &str, detail: &str) -> Self {
        Self {
            category: category.to_string(),
            archive_route: Some(route.to_string()),
            list_template: Some(template_path(list)),
            detail_template: template_path(detail),
            enabled: true,
        }
    }

    /// Normalized archive route, if this collection has an archive.
    pub fn route(&self) -> Option<String> {
        self.archive_route.as_deref().map(normalize_route)
    }
}

/// Page table output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Write absent archive links as `""` rather than `null`, matching the
    /// page context an already-deployed site was built with.
    pub empty_link_sentinel: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel planning workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# archive-pages Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Collections are merged by name: a [collections.<name>] table here only
# needs the keys it changes. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Write missing previous/next archive links as "" instead of null.
# Turn on when the templates of an existing site expect empty strings.
empty_link_sentinel = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel planning workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Collections
# ---------------------------------------------------------------------------
# category        - CMS category; key of the collection's query result
# archive_route   - base route of the paginated archive (omit for none)
# list_template   - template for archive pages
# detail_template - template for one page per item
# enabled         - set to false to skip the collection

[collections.blogs]
category = "blogs"
archive_route = "blogs"
list_template = "src/templates/BlogList.tsx"
detail_template = "src/templates/BlogDetail.tsx"
enabled = true

[collections.comics]
category = "comics"
archive_route = "comics"
list_template = "src/templates/ComicList.tsx"
detail_template = "src/templates/ComicDetail.tsx"
enabled = true

# Chapters get detail pages only.
[collections.chapters]
category = "comic-detail"
detail_template = "src/templates/Chapter.tsx"
enabled = true
"##
}
