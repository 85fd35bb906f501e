//! Collection path normalization.
//!
//! Every controller exposes its collection at a path ending in `/`, and item
//! paths are built by appending an identifier to that path. Normalizing once at
//! registration keeps `"/widgets"` and `"/widgets/"` pointing at the same routes.

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// Canonicalize a collection path so it ends with exactly one trailing separator.
///
/// - `""` becomes `"/"`
/// - a path already ending in `/` is returned unchanged
/// - anything else gets a `/` appended
///
/// # Examples
///
/// ```
/// use composable_restful_core::path::normalize_collection_path;
///
/// assert_eq!(normalize_collection_path(""), "/");
/// assert_eq!(normalize_collection_path("/widgets"), "/widgets/");
/// assert_eq!(normalize_collection_path("/widgets/"), "/widgets/");
/// ```
#[must_use]
pub fn normalize_collection_path(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        return path.to_string();
    }

    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push_str(path);
    normalized.push(SEPARATOR);
    normalized
}
