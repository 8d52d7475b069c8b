//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Request parsing and destination routing.
    pub relay: RoutingConfig,

    /// Event stream backend.
    pub stream: StreamConfig,

    /// Distributed-trace settings.
    pub tracing: TracingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds, including the stream call.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// How POST bodies are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// JSON object `{message, stream?}`.
    Json,
    /// The whole body is the message.
    Raw,
    /// JSON object when the body parses as one, raw otherwise.
    #[default]
    Auto,
}

/// What to do with a selector that names no configured destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSelectorPolicy {
    /// Fail with `UnknownDestination` before any submission.
    #[default]
    Reject,
    /// Submit with an empty destination and let the stream service fail.
    Passthrough,
}

/// Request parsing and destination routing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub body_format: BodyFormat,

    /// Partition key for every record. All records share one shard.
    pub partition_key: String,

    pub unknown_selector: UnknownSelectorPolicy,

    /// Stream used when the request carries no selector.
    pub default_stream: Option<String>,

    /// Named destinations, in the order offered on the form page.
    pub destinations: Vec<DestinationConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            body_format: BodyFormat::Auto,
            partition_key: "1".to_string(),
            unknown_selector: UnknownSelectorPolicy::Reject,
            default_stream: None,
            destinations: vec![
                DestinationConfig::from_env("go", "Go", "GO_STREAM"),
                DestinationConfig::from_env("node", "Node", "NODE_STREAM"),
            ],
        }
    }
}

/// A selector bound to a concrete stream identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DestinationConfig {
    /// Client-facing selector (e.g., "go").
    pub selector: String,

    /// Label shown on the form page. Defaults to the selector.
    #[serde(default)]
    pub label: Option<String>,

    /// Environment variable holding the stream name or ARN.
    #[serde(default)]
    pub env: Option<String>,

    /// Literal stream name, used when `env` is unset or empty.
    #[serde(default)]
    pub stream: Option<String>,
}

impl DestinationConfig {
    pub fn from_env(selector: &str, label: &str, env: &str) -> Self {
        Self {
            selector: selector.to_string(),
            label: Some(label.to_string()),
            env: Some(env.to_string()),
            stream: None,
        }
    }

    pub fn literal(selector: &str, stream: &str) -> Self {
        Self {
            selector: selector.to_string(),
            label: None,
            env: None,
            stream: Some(stream.to_string()),
        }
    }
}

/// Stream backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StreamBackend {
    #[default]
    Kinesis,
    Memory,
}

/// Event stream backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StreamConfig {
    pub backend: StreamBackend,

    /// AWS region override. Falls back to the SDK's default chain.
    pub region: Option<String>,

    /// Endpoint override (e.g., a local Kinesis emulator).
    pub endpoint_url: Option<String>,
}

/// Distributed-trace settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Emit trace linkage and propagation headers.
    pub enabled: bool,

    /// Service name reported in linking metadata.
    pub entity_name: String,

    /// Vendor key used in `tracestate`.
    pub vendor_key: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entity_name: "nrdt-relay".to_string(),
            vendor_key: "nr".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.relay.partition_key, "1");
        assert_eq!(config.relay.unknown_selector, UnknownSelectorPolicy::Reject);
        assert_eq!(config.relay.body_format, BodyFormat::Auto);
        assert_eq!(config.relay.destinations.len(), 2);
        assert_eq!(config.relay.destinations[0].env.as_deref(), Some("GO_STREAM"));
        assert_eq!(config.stream.backend, StreamBackend::Kinesis);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [relay]
            unknown_selector = "passthrough"
            default_stream = "lambda-stream-NR"

            [stream]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.relay.unknown_selector, UnknownSelectorPolicy::Passthrough);
        assert_eq!(config.relay.default_stream.as_deref(), Some("lambda-stream-NR"));
        assert_eq!(config.stream.backend, StreamBackend::Memory);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.relay.destinations.len(), 2);
    }

    #[test]
    fn test_destinations_table() {
        let config: RelayConfig = toml::from_str(
            r#"
            [[relay.destinations]]
            selector = "go"
            stream = "stream-A"

            [[relay.destinations]]
            selector = "node"
            env = "NODE_STREAM"
            label = "Node"
            "#,
        )
        .unwrap();

        let d = &config.relay.destinations;
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].stream.as_deref(), Some("stream-A"));
        assert!(d[0].env.is_none());
        assert_eq!(d[1].label.as_deref(), Some("Node"));
    }
}
