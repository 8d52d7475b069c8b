//! Trace-stamped event envelope.
//!
//! Wire form (UTF-8 JSON):
//!
//! ```text
//! { "message": "<message>", "nrDt": "<JSON-encoded trace map>" }
//! ```
//!
//! `nrDt` is a string holding a JSON object, not a nested object. Consumers
//! decode it in two steps.

use serde::{Deserialize, Serialize};

use crate::trace::TraceContext;

/// A message paired with the trace linkage active when it was built.
///
/// Fields are private: an envelope is never changed after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    message: String,
    #[serde(rename = "nrDt", with = "nested_json", default)]
    trace: TraceContext,
}

impl Envelope {
    pub fn new(message: impl Into<String>, trace: TraceContext) -> Self {
        Self {
            message: message.into(),
            trace,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &TraceContext {
        &self.trace
    }

    pub fn into_parts(self) -> (String, TraceContext) {
        (self.message, self.trace)
    }

    /// Encode to the wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode from the wire form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

mod nested_json {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::trace::TraceContext;

    pub fn serialize<S: Serializer>(trace: &TraceContext, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&trace.to_json())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TraceContext, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.trim().is_empty() {
            return Ok(TraceContext::new());
        }
        TraceContext::from_json(&raw).map_err(serde::de::Error::custom)
    }
}
