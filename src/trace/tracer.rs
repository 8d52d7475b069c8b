//! Per-invocation distributed-trace transactions.
//!
//! # Responsibilities
//! - Begin one transaction per invocation, continuing an inbound W3C
//!   `traceparent` when present
//! - Expose linking metadata for log correlation
//! - Produce propagation headers for outbound events
//! - Accept propagation headers carried inside consumed events
//!
//! # Design Decisions
//! - The tracer is constructed once and shared; transactions are owned by
//!   the invocation that began them
//! - A disabled tracer yields empty maps, never errors

use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::TracingConfig;
use crate::trace::TraceContext;

pub const TRACEPARENT: &str = "traceparent";
pub const TRACESTATE: &str = "tracestate";

/// Header names read from inbound HTTP requests.
pub const PROPAGATION_HEADERS: &[&str] = &[TRACEPARENT, TRACESTATE];

/// Source of trace linkage consumed by the publisher.
pub trait TraceCollaborator: Send + Sync {
    /// Metadata used to correlate log lines with the active trace,
    /// including any custom attributes.
    fn capture_linkage(&self) -> TraceContext;

    /// Propagation headers to embed in an outbound event.
    fn inject_headers(&self) -> TraceContext;
}

/// Collaborator used when no trace is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceCollaborator for NoTrace {
    fn capture_linkage(&self) -> TraceContext {
        TraceContext::new()
    }

    fn inject_headers(&self) -> TraceContext {
        TraceContext::new()
    }
}

/// Parsed W3C `traceparent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParent {
    pub trace_id: String,
    pub parent_id: String,
    pub sampled: bool,
}

impl TraceParent {
    /// Parse `00-<32 hex>-<16 hex>-<2 hex>`. All-zero ids are invalid.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('-');
        let version = parts.next()?;
        let trace_id = parts.next()?;
        let parent_id = parts.next()?;
        let flags = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        if !is_hex(version, 2) || version == "ff" {
            return None;
        }
        if !is_hex(trace_id, 32) || trace_id.bytes().all(|b| b == b'0') {
            return None;
        }
        if !is_hex(parent_id, 16) || parent_id.bytes().all(|b| b == b'0') {
            return None;
        }
        if !is_hex(flags, 2) {
            return None;
        }
        let flags = u8::from_str_radix(flags, 16).ok()?;

        Some(Self {
            trace_id: trace_id.to_ascii_lowercase(),
            parent_id: parent_id.to_ascii_lowercase(),
            sampled: flags & 0x01 == 0x01,
        })
    }
}

fn is_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_span_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

/// Factory for per-invocation transactions.
#[derive(Debug, Clone)]
pub struct Tracer {
    enabled: bool,
    entity_name: String,
    vendor_key: String,
    hostname: String,
}

impl Tracer {
    /// Create a tracer from configuration.
    pub fn new(config: &TracingConfig) -> Self {
        Self {
            enabled: config.enabled,
            entity_name: config.entity_name.clone(),
            vendor_key: config.vendor_key.clone(),
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
        }
    }

    /// A tracer that never produces linkage.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            entity_name: String::new(),
            vendor_key: String::new(),
            hostname: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Begin a transaction, continuing the inbound trace if one is present.
    pub fn begin(&self, inbound: &TraceContext) -> Transaction {
        if !self.enabled {
            return Transaction::inactive();
        }

        let parent = inbound.get(TRACEPARENT).and_then(TraceParent::parse);
        let (trace_id, parent_id) = match parent {
            Some(p) => (p.trace_id, Some(p.parent_id)),
            None => (new_trace_id(), None),
        };

        Transaction {
            ids: Some(TraceIds {
                trace_id,
                span_id: new_span_id(),
                parent_id,
            }),
            entity_name: self.entity_name.clone(),
            vendor_key: self.vendor_key.clone(),
            hostname: self.hostname.clone(),
            attributes: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct TraceIds {
    trace_id: String,
    span_id: String,
    parent_id: Option<String>,
}

/// One invocation's view of the distributed trace.
#[derive(Debug, Clone)]
pub struct Transaction {
    ids: Option<TraceIds>,
    entity_name: String,
    vendor_key: String,
    hostname: String,
    attributes: BTreeMap<String, String>,
}

impl Transaction {
    fn inactive() -> Self {
        Self {
            ids: None,
            entity_name: String::new(),
            vendor_key: String::new(),
            hostname: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.ids.is_some()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.ids.as_ref().map(|ids| ids.trace_id.as_str())
    }

    pub fn span_id(&self) -> Option<&str> {
        self.ids.as_ref().map(|ids| ids.span_id.as_str())
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.ids.as_ref().and_then(|ids| ids.parent_id.as_deref())
    }

    /// Adopt the trace carried by propagation headers.
    ///
    /// Returns `false` when the transaction is inactive or the headers hold
    /// no valid `traceparent`.
    pub fn accept_headers(&mut self, headers: &TraceContext) -> bool {
        let Some(ids) = self.ids.as_mut() else {
            return false;
        };

        match headers.get(TRACEPARENT).and_then(TraceParent::parse) {
            Some(parent) => {
                ids.trace_id = parent.trace_id;
                ids.parent_id = Some(parent.parent_id);
                true
            }
            None => {
                tracing::warn!(
                    header_count = headers.len(),
                    "No valid traceparent in accepted headers"
                );
                false
            }
        }
    }

    /// Record a custom attribute on this transaction.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if self.is_active() {
            self.attributes.insert(key.into(), value.into());
        }
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

impl TraceCollaborator for Transaction {
    fn capture_linkage(&self) -> TraceContext {
        let Some(ids) = &self.ids else {
            return TraceContext::new();
        };
        // Attributes go in first so linkage keys always win.
        let mut linkage: TraceContext = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        linkage.insert("trace.id", ids.trace_id.as_str());
        linkage.insert("span.id", ids.span_id.as_str());
        linkage.insert("entity.name", self.entity_name.as_str());
        linkage.insert("entity.type", "SERVICE");
        linkage.insert("hostname", self.hostname.as_str());
        linkage
    }

    fn inject_headers(&self) -> TraceContext {
        let Some(ids) = &self.ids else {
            return TraceContext::new();
        };
        TraceContext::new()
            .with(TRACEPARENT, format!("00-{}-{}-01", ids.trace_id, ids.span_id))
            .with(TRACESTATE, format!("{}={}", self.vendor_key, ids.span_id))
    }
}
