//! Trace linkage map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key/value map carrying distributed-trace linkage.
///
/// Semantically unordered. Backed by a `BTreeMap` so that serialized output
/// is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceContext(BTreeMap<String, String>);

impl TraceContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a JSON object string (the `nrDt` wire form).
    pub fn to_json(&self) -> String {
        // A string-to-string map always serializes.
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Decode from a JSON object string.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Build a context from HTTP headers, keeping only the given names.
    ///
    /// Header names are matched case-insensitively and stored lowercase.
    pub fn from_headers(headers: &axum::http::HeaderMap, names: &[&str]) -> Self {
        let mut ctx = Self::new();
        for name in names {
            if let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) {
                ctx.insert(name.to_ascii_lowercase(), value);
            }
        }
        ctx
    }
}

impl FromIterator<(String, String)> for TraceContext {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TraceContext {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn test_json_roundtrip_preserves_pairs() {
        let ctx = TraceContext::new()
            .with("traceparent", "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01")
            .with("tracestate", "nr=b7ad6b7169203331");

        let raw = ctx.to_json();
        assert!(raw.starts_with('{'));
        assert_eq!(TraceContext::from_json(&raw).unwrap(), ctx);
    }

    #[test]
    fn test_empty_context_encodes_as_empty_object() {
        assert_eq!(TraceContext::new().to_json(), "{}");
    }

    #[test]
    fn test_from_headers_keeps_only_named_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("00-abc"));
        headers.insert("x-other", HeaderValue::from_static("ignored"));

        let ctx = TraceContext::from_headers(&headers, &["traceparent", "tracestate"]);
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("traceparent"), Some("00-abc"));
    }
}
