//! Logical route and base directory resolution.
//!
//! An application installed below the web root (say `/blog/index.php`) sees
//! request URIs like `/blog/posts/7`. The *route* is what the application
//! dispatches on (`/posts/7`), the *base directory* is the installation offset
//! that precedes it (`/blog`).
//!
//! Both values are computed by subtraction: the script directory is removed
//! from the URI to get the route, then the route is removed from the URI to get
//! the base directory. Removal targets the first occurrence wherever it sits in
//! the URI, not only a leading prefix.

use regex::RegexBuilder;

use crate::error::ContextError;
use crate::probe::percent_decode;
use crate::signals::{keys, Signals};

/// Trimmed `REQUEST_URI`, exactly as received (query string included).
pub fn request_uri(signals: &Signals) -> String {
    signals
        .get(keys::REQUEST_URI)
        .map(|uri| uri.trim().to_string())
        .unwrap_or_default()
}

/// Percent-decoded `SCRIPT_NAME`.
pub fn script_name(signals: &Signals) -> String {
    signals
        .get(keys::SCRIPT_NAME)
        .map(|name| percent_decode(name.trim()).into_owned())
        .unwrap_or_default()
}

/// Directory of the running script without surrounding slashes. Empty at the web root.
pub fn script_dir(signals: &Signals) -> String {
    script_dir_of(&script_name(signals))
}

pub fn resolve_route(signals: &Signals) -> String {
    route_from(&request_uri(signals), &script_name(signals))
}

pub fn resolve_base_dir(signals: &Signals) -> Result<String, ContextError> {
    let uri = request_uri(signals);
    let route = route_from(&uri, &script_name(signals));
    base_dir_from(&uri, &route)
}

/// Computes the logical route for a raw request URI and a decoded script name.
///
/// The result always begins with `/`, carries no query string and contains no
/// runs of slashes. Script directory removal is case-sensitive.
pub fn route_from(uri: &str, script_name: &str) -> String {
    let path = percent_decode(strip_query(uri.trim()));
    let dir = script_dir_of(script_name);

    let remainder = if dir.is_empty() {
        path.into_owned()
    } else {
        path.replacen(dir.as_str(), "", 1)
    };

    let route = collapse_slashes(&format!("/{}", remainder.trim()));
    if route.is_empty() {
        "/".to_string()
    } else {
        route
    }
}

/// Computes the base directory by removing `route` from `uri`.
///
/// The route is matched case-insensitively as a literal, together with any
/// slashes in front of it, and only its first match is removed. When the
/// route text also appears earlier in the URI that earlier occurrence is the
/// one removed.
pub fn base_dir_from(uri: &str, route: &str) -> Result<String, ContextError> {
    let path = percent_decode(strip_query(uri.trim()));
    let path = path.trim_matches('/');
    let route = route.trim_matches('/');

    let pattern = RegexBuilder::new(&format!("/*{}", regex::escape(route)))
        .case_insensitive(true)
        .build()
        .map_err(|err| ContextError::malformed_route(err.to_string()))?;

    let dir = pattern.replacen(path, 1, "");
    Ok(format!("/{}", dir))
}

fn strip_query(uri: &str) -> &str {
    match uri.split_once('?') {
        Some((path, _)) => path,
        None => uri,
    }
}

fn script_dir_of(script_name: &str) -> String {
    let name = script_name.trim().trim_end_matches('/');
    let parent = match name.rfind('/') {
        Some(index) => &name[..index],
        None => "",
    };
    parent.trim_matches('/').to_string()
}

pub(crate) fn collapse_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_slash = false;
    for ch in input.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_collapses_slashes_and_strips_query() {
        assert_eq!(route_from("/a//b///c?x=1", ""), "/a/b/c");
    }

    #[test]
    fn route_defaults_to_root() {
        assert_eq!(route_from("", ""), "/");
        assert_eq!(route_from("/", "/index.php"), "/");
        assert_eq!(route_from("?only=query", ""), "/");
    }

    #[test]
    fn route_subtracts_script_directory() {
        let script = "/subdirectorio/subdirectorio/index.php";
        assert_eq!(
            route_from("/subdirectorio/subdirectorio/ciencia", script),
            "/ciencia"
        );
        assert_eq!(route_from("/subdirectorio/subdirectorio/", script), "/");
    }

    #[test]
    fn route_removal_is_case_sensitive() {
        assert_eq!(route_from("/Blog/posts", "/blog/index.php"), "/Blog/posts");
    }

    #[test]
    fn route_is_percent_decoded() {
        assert_eq!(route_from("/mi%20ruta/%C3%B1?q=%3F", ""), "/mi ruta/ñ");
        assert_eq!(route_from("/mi%20app/datos", "/mi app/index.php"), "/datos");
    }

    #[test]
    fn escaped_question_mark_stays_in_route() {
        assert_eq!(route_from("/que%3F/x?y=1", ""), "/que?/x");
    }

    #[test]
    fn script_dir_is_slash_trimmed() {
        assert_eq!(script_dir_of("/index.php"), "");
        assert_eq!(script_dir_of("index.php"), "");
        assert_eq!(script_dir_of(""), "");
        assert_eq!(script_dir_of("/app/public/index.php"), "app/public");
        assert_eq!(script_dir_of("/app/public/"), "app");
    }

    #[test]
    fn base_dir_isolates_nested_prefix() {
        assert_eq!(
            base_dir_from("/subdirectorio/subdirectorio/ciencia", "ciencia").unwrap(),
            "/subdirectorio/subdirectorio"
        );
    }

    #[test]
    fn base_dir_matches_case_insensitively() {
        assert_eq!(base_dir_from("/App/USERS/List", "/users/list").unwrap(), "/App");
    }

    #[test]
    fn base_dir_of_root_route_is_the_whole_path() {
        assert_eq!(base_dir_from("/blog/", "/").unwrap(), "/blog");
        assert_eq!(base_dir_from("/", "/").unwrap(), "/");
        assert_eq!(base_dir_from("", "/").unwrap(), "/");
    }

    #[test]
    fn base_dir_ignores_query_string() {
        assert_eq!(base_dir_from("/blog/posts?page=2", "/posts").unwrap(), "/blog");
    }

    #[test]
    fn base_dir_treats_route_as_literal() {
        assert_eq!(base_dir_from("/shop/a.b+c", "/a.b+c").unwrap(), "/shop");
        assert_eq!(base_dir_from("/shop/axbbc", "/a.b+c").unwrap(), "/shop/axbbc");
    }

    #[test]
    fn base_dir_removes_first_occurrence_of_repeated_route() {
        // Script at /a/x/index.php with URI /a/x/a resolves to route /a.
        // The first "a" in the URI is removed, not the trailing one.
        assert_eq!(route_from("/a/x/a", "/a/x/index.php"), "/a");
        assert_eq!(base_dir_from("/a/x/a", "/a").unwrap(), "//x/a");
    }

    #[test]
    fn resolves_from_signals() {
        let signals = Signals::new()
            .with(keys::REQUEST_URI, " /subdirectorio/subdirectorio/ciencia?x=1 ")
            .with(keys::SCRIPT_NAME, "/subdirectorio/subdirectorio/index.php");
        assert_eq!(request_uri(&signals), "/subdirectorio/subdirectorio/ciencia?x=1");
        assert_eq!(script_dir(&signals), "subdirectorio/subdirectorio");
        assert_eq!(resolve_route(&signals), "/ciencia");
        assert_eq!(
            resolve_base_dir(&signals).unwrap(),
            "/subdirectorio/subdirectorio"
        );
    }

    #[test]
    fn missing_signals_resolve_to_root() {
        let signals = Signals::new();
        assert_eq!(request_uri(&signals), "");
        assert_eq!(script_name(&signals), "");
        assert_eq!(resolve_route(&signals), "/");
        assert_eq!(resolve_base_dir(&signals).unwrap(), "/");
    }

    #[test]
    fn collapse_slashes_keeps_single_separators() {
        assert_eq!(collapse_slashes("///a//b/"), "/a/b/");
        assert_eq!(collapse_slashes("abc"), "abc");
    }
}
