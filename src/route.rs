//! Route normalization for archive paths.
//!
//! Archive routes come from `config.toml`, where people write them in
//! whatever shape they are used to: `blogs`, `/blogs`, `blogs/`, even
//! `//blogs//`. Every generated path is built from the normalized form so
//! that all archive pages of a collection share one shape:
//!
//! - `"blogs"` → `"blogs"`
//! - `"/blogs/"` → `"blogs"`
//! - `"/comics//archive/"` → `"comics/archive"`
//! - `"  news "` → `"news"`
//! - `"/"` → `""` (rejected by config validation)

/// Normalize a configured route: trim whitespace, drop leading and trailing
/// slashes, and collapse empty segments.
pub fn normalize_route(route: &str) -> String {
    route
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Append a numbered segment to a normalized route: `("blogs", 3)` → `"blogs/3"`.
pub fn numbered_route(route: &str, number: usize) -> String {
    if route.is_empty() {
        number.to_string()
    } else {
        format!("{route}/{number}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_route_unchanged() {
        assert_eq!(normalize_route("blogs"), "blogs");
    }

    #[test]
    fn leading_and_trailing_slashes_stripped() {
        assert_eq!(normalize_route("/blogs/"), "blogs");
        assert_eq!(normalize_route("/blogs"), "blogs");
        assert_eq!(normalize_route("blogs/"), "blogs");
    }

    #[test]
    fn nested_route_keeps_inner_slash() {
        assert_eq!(normalize_route("/comics//archive/"), "comics/archive");
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(normalize_route("  news "), "news");
    }

    #[test]
    fn root_only_becomes_empty() {
        assert_eq!(normalize_route("/"), "");
        assert_eq!(normalize_route(""), "");
    }

    #[test]
    fn numbered_route_appends_segment() {
        assert_eq!(numbered_route("blogs", 2), "blogs/2");
        assert_eq!(numbered_route("comics/archive", 10), "comics/archive/10");
    }

    #[test]
    fn numbered_route_on_empty_route() {
        assert_eq!(numbered_route("", 2), "2");
    }
}
