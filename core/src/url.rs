//! URL assembly.
//!
//! URLs take the shape
//! `{protocol}://{domain}/{prefix}[/{version}]/{endpoint}[?{query}]`, where
//! domain, prefix and endpoint pass through [`sanitize`]. Query strings are
//! interpolated verbatim: nothing is percent-encoded, so callers pre-encode
//! values that contain reserved characters.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::ConnectorConfig;

/// From the first word character to the last word character on the line.
/// Word characters are ASCII `[0-9A-Za-z_]`.
static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9A-Za-z_](?:.*[0-9A-Za-z_])?").expect("segment pattern is valid")
});

/// Trim leading and trailing non-word characters from a path component.
///
/// A component with no word character at all becomes `""`; the surrounding
/// slashes are kept, so the URL ends up with an adjacent `//`.
pub fn sanitize(segment: &str) -> &str {
    SEGMENT.find(segment).map_or("", |m| m.as_str())
}

/// A query parameter value: a single value or a list rendered as repeated
/// `key=value` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    fn values(&self) -> &[String] {
        match self {
            QueryValue::One(value) => std::slice::from_ref(value),
            QueryValue::Many(values) => values,
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

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Many(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for QueryValue {
    fn from(values: [T; N]) -> Self {
        QueryValue::Many(values.iter().map(ToString::to_string).collect())
    }
}

macro_rules! query_value_from_display {
    ($($ty:ty),*) => {
        $(impl From<$ty> for QueryValue {
            fn from(value: $ty) -> Self {
                QueryValue::One(value.to_string())
            }
        })*
    };
}

query_value_from_display!(i32, i64, u32, u64, usize, bool);

/// Ordered query parameters. Keys keep insertion order and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams(Vec<(String, QueryValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as `k=v&k=v` with no encoding. An empty list contributes no
    /// pairs.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .flat_map(|(key, value)| value.values().iter().map(move |v| format!("{key}={v}")))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Assemble the target URL for `endpoint`.
///
/// The query string is appended only when it renders to something.
pub fn build_url(config: &ConnectorConfig, endpoint: &str, query: &QueryParams) -> String {
    let mut url = format!(
        "{}://{}/{}",
        config.protocol,
        sanitize(&config.domain),
        sanitize(&config.prefix)
    );
    if let Some(version) = &config.version {
        url.push('/');
        url.push_str(version);
    }
    url.push('/');
    url.push_str(sanitize(endpoint));

    let query = query.to_query_string();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}
