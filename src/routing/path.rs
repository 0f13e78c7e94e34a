//! Path composition for route groups.

/// Returns the canonical, rooted form of `path`.
///
/// Repeated slashes collapse into one, `.` segments are dropped and `..` removes
/// the segment before it (never climbing above `/`). A trailing slash is not kept;
/// [`join_paths`] restores it where the caller asked for one.
///
/// ```
/// use axum_groups::clean_path;
///
/// assert_eq!(clean_path("//api/./v1/../v2/"), "/api/v2");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}

/// Joins a group's absolute base path with a relative path.
///
/// An empty relative path yields `absolute` unchanged. Otherwise the two are
/// concatenated and cleaned, and a trailing slash on `relative` is preserved.
///
/// ```
/// use axum_groups::join_paths;
///
/// assert_eq!(join_paths("/api", "users"), "/api/users");
/// assert_eq!(join_paths("/api/", "/users/"), "/api/users/");
/// assert_eq!(join_paths("/api", ""), "/api");
/// ```
pub fn join_paths(absolute: &str, relative: &str) -> String {
    if relative.is_empty() {
        return absolute.to_string();
    }

    let mut joined = clean_path(&format!("{absolute}/{relative}"));
    if relative.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_path_collapses_slashes() {
        assert_eq!(clean_path("/a//b///c"), "/a/b/c");
        assert_eq!(clean_path("a/b"), "/a/b");
        assert_eq!(clean_path("///"), "/");
    }

    #[test]
    fn test_clean_path_resolves_dots() {
        assert_eq!(clean_path("/a/./b"), "/a/b");
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_path("/../a"), "/a");
        assert_eq!(clean_path("/a/.."), "/");
    }

    #[test]
    fn test_clean_path_keeps_route_syntax() {
        assert_eq!(clean_path("/users/:id/*rest"), "/users/:id/*rest");
    }

    #[test]
    fn test_join_paths_empty_relative() {
        assert_eq!(join_paths("/", ""), "/");
        assert_eq!(join_paths("/api/", ""), "/api/");
    }

    #[test]
    fn test_join_paths_from_root() {
        assert_eq!(join_paths("/", "/ping"), "/ping");
        assert_eq!(join_paths("/", "ping"), "/ping");
        assert_eq!(join_paths("/", "/"), "/");
    }

    #[test]
    fn test_join_paths_trailing_slash() {
        assert_eq!(join_paths("/a", "b/"), "/a/b/");
        assert_eq!(join_paths("/a/", "b"), "/a/b");
    }

    fn relative_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,6}", 1..4).prop_map(|segments| {
            let mut path = String::new();
            for segment in segments {
                path.push('/');
                path.push_str(&segment);
            }
            path
        })
    }

    proptest! {
        #[test]
        fn joined_paths_are_rooted_and_clean(base in relative_path(), rel in relative_path()) {
            let joined = join_paths(&base, &rel);
            prop_assert!(joined.starts_with('/'));
            prop_assert!(!joined.contains("//"));
        }

        #[test]
        fn nested_joins_match_single_join(a in relative_path(), b in relative_path()) {
            let nested = join_paths(&join_paths("/", &a), &b);
            let single = join_paths("/", &format!("{a}/{b}"));
            prop_assert_eq!(nested, single);
        }
    }
}
