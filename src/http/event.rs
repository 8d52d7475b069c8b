//! Proxy-style request/response documents.
//!
//! The router speaks these shapes directly. Real HTTP requests are adapted
//! onto `InboundEvent` by the server, and `/invoke` accepts them as JSON.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{RelayError, RelayResult};
use crate::trace::{TraceContext, PROPAGATION_HEADERS};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const TEXT_HTML: &str = "text/html";
pub const APPLICATION_JSON: &str = "application/json";

/// Inbound request: `{ httpMethod, body?, headers? }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub http_method: String,

    /// Raw text or an already-structured JSON body.
    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl InboundEvent {
    pub fn get() -> Self {
        Self {
            http_method: "GET".to_string(),
            ..Default::default()
        }
    }

    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            body: Some(Value::String(body.into())),
            ..Default::default()
        }
    }

    /// Adapt an HTTP request. Only propagation headers are kept.
    pub fn from_http(method: &Method, headers: &HeaderMap, body: Bytes) -> RelayResult<Self> {
        let body = if body.is_empty() {
            None
        } else {
            let text = String::from_utf8(body.to_vec())
                .map_err(|_| RelayError::MalformedRequest("body is not valid UTF-8".to_string()))?;
            Some(Value::String(text))
        };

        let headers = TraceContext::from_headers(headers, PROPAGATION_HEADERS)
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Self {
            http_method: method.as_str().to_string(),
            body,
            headers,
        })
    }

    /// Propagation headers carried by this event, keys lowercased.
    pub fn trace_headers(&self) -> TraceContext {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .filter(|(k, _)| PROPAGATION_HEADERS.contains(&k.as_str()))
            .collect()
    }
}

/// Outbound response: `{ statusCode, headers, isBase64Encoded, body }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub is_base64_encoded: bool,
    pub body: String,
}

impl OutboundResponse {
    pub fn new(status_code: u16, content_type: &str, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());
        Self {
            status_code,
            headers,
            is_base64_encoded: false,
            body: body.into(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(200, TEXT_HTML, body)
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::new(200, APPLICATION_JSON, body)
    }

    pub fn error(err: &RelayError) -> Self {
        Self::new(err.status().as_u16(), APPLICATION_JSON, err.body())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).map(String::as_str)
    }
}
