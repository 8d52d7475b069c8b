//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (level and format from config)
//! - Emit correlated JSON lines that pair a message with trace linkage
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level
//! - Correlated lines bypass the subscriber so their keys stay flat
//!   (`trace.id`, `span.id`, ...) for the log collector

use serde_json::{Map, Value};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::trace::TraceContext;

/// Initialize the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "nrdt_relay={level},tower_http={level}",
            level = config.log_level
        ))
    });
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

/// Build a correlated log line: `{"message": ..., <linkage pairs>}`.
///
/// Linkage keys never overwrite `message`.
pub fn correlated(message: impl Into<String>, linkage: &TraceContext) -> Value {
    let mut line = Map::new();
    for (k, v) in linkage.iter() {
        line.insert(k.to_string(), Value::String(v.to_string()));
    }
    line.insert("message".to_string(), Value::String(message.into()));
    Value::Object(line)
}

/// Destination for correlated log lines.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: Value);
}

/// Writes one JSON document per line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, line: Value) {
        println!("{}", line);
    }
}

/// Keeps emitted lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<Value>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<Value> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: Value) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlated_line_is_flat() {
        let linkage = TraceContext::new()
            .with("trace.id", "abc")
            .with("span.id", "def");
        let line = correlated("RECORD: hi", &linkage);

        assert_eq!(line["message"], "RECORD: hi");
        assert_eq!(line["trace.id"], "abc");
        assert_eq!(line["span.id"], "def");
    }

    #[test]
    fn test_linkage_cannot_replace_message() {
        let linkage = TraceContext::new().with("message", "spoofed");
        assert_eq!(correlated("inside POST", &linkage)["message"], "inside POST");
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(correlated("a", &TraceContext::new()));
        sink.emit(correlated("b", &TraceContext::new()));
        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["message"], "b");
    }
}
