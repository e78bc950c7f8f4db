use std::sync::OnceLock;

use regex::Regex;

use crate::error::ContextError;
use crate::scheme::Scheme;

static SEPARATOR_RUNS: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

/// Builds absolute links back into the running application.
///
/// The base URL is `scheme://host` followed by the script directory when the
/// application is installed below the web root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlBuilder {
    scheme: Scheme,
    host: String,
    script_dir: String,
}

impl UrlBuilder {
    pub fn new(scheme: Scheme, host: impl Into<String>, script_dir: impl AsRef<str>) -> Self {
        Self {
            scheme,
            host: host.into(),
            script_dir: script_dir.as_ref().trim_matches('/').to_string(),
        }
    }

    /// `scheme://host`, without any directory.
    pub fn http_host(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    pub fn base_url(&self) -> String {
        if self.script_dir.is_empty() {
            self.http_host()
        } else {
            format!("{}/{}", self.http_host(), self.script_dir)
        }
    }

    /// Absolute URL for `route`. An empty route or `/` yields the bare base URL.
    pub fn build(&self, route: &str) -> Result<String, ContextError> {
        let route = normalize_route(route)?;
        let base = self.base_url();
        if route.is_empty() || route == "/" {
            Ok(base)
        } else {
            Ok(format!("{}/{}", base, route))
        }
    }

    /// Absolute URL for a dotted path, e.g. `assets.css` becomes `<base>/assets/css`.
    pub fn subdir_url(&self, dotted: &str) -> Result<String, ContextError> {
        self.build(&dotted.replace('.', "/"))
    }
}

/// Trims whitespace and outer separators, then collapses runs of `/` or `\` into `/`.
pub fn normalize_route(route: &str) -> Result<String, ContextError> {
    let trimmed = route
        .trim()
        .trim_matches(|c: char| c == '/' || c == '\\');
    let separators = SEPARATOR_RUNS
        .get_or_init(|| Regex::new(r"[/\\]+"))
        .as_ref()
        .map_err(|err| ContextError::malformed_route(err.to_string()))?;
    Ok(separators.replace_all(trimmed, "/").into_owned())
}
