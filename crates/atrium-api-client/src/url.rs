//! URL construction: origin + prefix joining, path templating and query
//! serialization.

use atrium_config::Config;

/// Path roots the backend serves outside the version prefix.
const UNPREFIXED_ROOTS: &[&str] = &["/auth", "/health", "/uploads"];

/// Joins a base origin, an optional API version prefix and resource paths
/// into final URLs.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    origin: String,
    prefix: String,
}

impl UrlBuilder {
    /// Create a builder. Trailing slashes on the origin and prefix are
    /// normalized away; the prefix gains a leading slash when missing.
    pub fn new(origin: impl Into<String>, prefix: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let mut prefix = prefix.into().trim_end_matches('/').to_string();
        if !prefix.is_empty() && !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        Self { origin, prefix }
    }

    /// Create a builder from the client configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_origin.clone(), config.api_prefix.clone())
    }

    /// Whether a version prefix is configured at all.
    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }

    /// Whether `path` targets a root segment served outside the prefix.
    pub fn is_unprefixed_root(&self, path: &str) -> bool {
        let reserved = UNPREFIXED_ROOTS
            .iter()
            .any(|root| path == *root || path.starts_with(&format!("{}/", root)));
        let already_prefixed = self.has_prefix()
            && (path == self.prefix || path.starts_with(&format!("{}/", self.prefix)));
        reserved || already_prefixed
    }

    /// Build the final URL for `path` (which must start with `/`).
    ///
    /// The version prefix is inserted between origin and path unless
    /// `skip_prefix` is set or the path targets an unprefixed root.
    pub fn build(&self, path: &str, skip_prefix: bool) -> String {
        if skip_prefix || self.is_unprefixed_root(path) {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}{}{}", self.origin, self.prefix, path)
        }
    }

    /// Build the final URL with the query string appended.
    pub fn build_with_query(&self, path: &str, skip_prefix: bool, query: &Query) -> String {
        let mut url = self.build(path, skip_prefix);
        if let Some(encoded) = query.encode() {
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }
}

/// Replace each `:name` placeholder in a path template with the
/// percent-encoded value from `params`.
///
/// A placeholder with no matching param is left intact; callers own
/// supplying every required param.
pub fn fill_path(template: &str, params: &[(&str, &str)]) -> String {
    template
        .split('/')
        .map(|segment| {
            let Some(name) = segment.strip_prefix(':') else {
                return segment.to_string();
            };
            match params.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => percent_encode(value),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-encode a string, leaving RFC 3986 unreserved characters alone.
pub fn percent_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                for byte in c.to_string().as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

/// An ordered set of query parameters.
///
/// Order is preserved as supplied, absent and empty-string values are
/// dropped, and sequence values repeat the key.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

/// A single query parameter value.
#[derive(Debug, Clone)]
pub enum QueryValue {
    /// Dropped at serialization.
    Absent,
    One(String),
    Many(Vec<String>),
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: &str, value: impl Into<QueryValue>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Chainable form of [`push`](Self::push).
    pub fn with(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize into a query string, or `None` when every value was
    /// dropped.
    pub fn encode(&self) -> Option<String> {
        let mut parts = Vec::new();
        for (key, value) in &self.pairs {
            match value {
                QueryValue::Absent => {}
                QueryValue::One(v) if v.is_empty() => {}
                QueryValue::One(v) => {
                    parts.push(format!("{}={}", percent_encode(key), percent_encode(v)));
                }
                QueryValue::Many(values) => {
                    for v in values.iter().filter(|v| !v.is_empty()) {
                        parts.push(format!("{}={}", percent_encode(key), percent_encode(v)));
                    }
                }
            }
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("&"))
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::One(value.clone())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Many(values)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(values: &[&str]) -> Self {
        QueryValue::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => QueryValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("http://backend.test/", "/api/v1/")
    }

    #[test]
    fn test_trailing_slashes_normalized() {
        let urls = builder();
        assert_eq!(urls.build("/admin/users", false), "http://backend.test/api/v1/admin/users");
    }

    #[test]
    fn test_skip_prefix() {
        let urls = builder();
        assert_eq!(urls.build("/admin/users", true), "http://backend.test/admin/users");
    }

    #[test]
    fn test_reserved_roots_stay_unprefixed() {
        let urls = builder();
        assert_eq!(urls.build("/auth/sign-in", false), "http://backend.test/auth/sign-in");
        assert_eq!(urls.build("/health", false), "http://backend.test/health");
        // /authors is not under /auth
        assert_eq!(urls.build("/authors", false), "http://backend.test/api/v1/authors");
    }

    #[test]
    fn test_already_prefixed_path_not_doubled() {
        let urls = builder();
        assert_eq!(urls.build("/api/v1/admin/users", false), "http://backend.test/api/v1/admin/users");
    }

    #[test]
    fn test_empty_prefix() {
        let urls = UrlBuilder::new("http://backend.test", "");
        assert!(!urls.has_prefix());
        assert_eq!(urls.build("/admin/users", false), "http://backend.test/admin/users");
    }

    #[test]
    fn test_fill_path_encodes_params() {
        let path = fill_path("/admin/users/:id/status", &[("id", "5 x")]);
        assert_eq!(path, "/admin/users/5%20x/status");
    }

    #[test]
    fn test_fill_path_multiple_params() {
        let path = fill_path(
            "/admin/chats/:chat_id/messages/:id",
            &[("chat_id", "c/7"), ("id", "42")],
        );
        assert_eq!(path, "/admin/chats/c%2F7/messages/42");
    }

    #[test]
    fn test_fill_path_missing_param_left_intact() {
        let path = fill_path("/admin/users/:id/status", &[("user", "5")]);
        assert_eq!(path, "/admin/users/:id/status");
    }

    #[test]
    fn test_query_filtering_and_order() {
        let query = Query::new()
            .with("a", 1u32)
            .with("b", Option::<&str>::None)
            .with("c", "")
            .with("d", &["x", "y"][..]);
        assert_eq!(query.encode().as_deref(), Some("a=1&d=x&d=y"));
    }

    #[test]
    fn test_query_values_percent_encoded() {
        let query = Query::new().with("search", "café menu");
        assert_eq!(query.encode().as_deref(), Some("search=caf%C3%A9%20menu"));
    }

    #[test]
    fn test_all_dropped_yields_none() {
        let query = Query::new().with("a", "").with("b", Option::<u32>::None);
        assert!(query.encode().is_none());
        assert!(Query::new().encode().is_none());
    }

    #[test]
    fn test_build_with_query() {
        let urls = builder();
        let query = Query::new().with("page", 2u32).with("per_page", 50u32);
        assert_eq!(
            urls.build_with_query("/admin/users", false, &query),
            "http://backend.test/api/v1/admin/users?page=2&per_page=50"
        );
        assert_eq!(
            urls.build_with_query("/admin/users", false, &Query::new()),
            "http://backend.test/api/v1/admin/users"
        );
    }
}
