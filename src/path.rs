//! Task path helpers
//!
//! Task paths are plain `/`-separated strings. They are handed to the
//! dispatcher as-is and never touch the host filesystem here.

/// Append one segment to a task path.
///
/// An empty base is the workspace root, so the result starts with `/`.
///
/// ```
/// use structure_builder::path::join;
///
/// assert_eq!(join("/", "src"), "/src");
/// assert_eq!(join("projects/app", "src"), "projects/app/src");
/// assert_eq!(join("", "src"), "/src");
/// ```
pub fn join(base: &str, segment: &str) -> String {
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        format!("/{}", segment)
    } else if base.ends_with('/') {
        format!("{}{}", base, segment)
    } else {
        format!("{}/{}", base, segment)
    }
}

/// Split a node name that carries a relative directory.
///
/// `"shared/button"` at `/src` becomes path `/src/shared` and name `button`.
/// Empty segments are dropped. Explicit `collection:operation` names are
/// returned untouched, since scoped collections contain `/` themselves.
pub fn parse_name(path: &str, name: &str) -> (String, String) {
    if name.contains(':') {
        return (path.to_string(), name.to_string());
    }
    let mut segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();
    let leaf = segments.pop().unwrap_or_default().to_string();
    let path = segments
        .into_iter()
        .fold(path.to_string(), |acc, segment| join(&acc, segment));
    (path, leaf)
}
