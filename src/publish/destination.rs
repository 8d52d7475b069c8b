//! Selector → stream resolution.
//!
//! # Responsibilities
//! - Bind configured selectors to stream identifiers at startup
//! - Resolve a request's selector (or its absence) to a destination
//! - Apply the unknown-selector policy
//!
//! # Design Decisions
//! - Environment is read once, through an injected lookup, so tests never
//!   touch process-wide state
//! - An env variable that is unset or empty falls back to the literal stream

use std::collections::HashMap;

use crate::config::{RoutingConfig, UnknownSelectorPolicy};
use crate::error::{RelayError, RelayResult};

/// A selector offered to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub name: String,
    pub label: String,
}

/// Immutable selector table.
#[derive(Debug, Clone)]
pub struct DestinationTable {
    bound: HashMap<String, Option<String>>,
    selectors: Vec<Selector>,
    default_stream: Option<String>,
    policy: UnknownSelectorPolicy,
}

impl DestinationTable {
    /// Build from configuration, reading process environment variables.
    pub fn from_env(config: &RoutingConfig) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Build from configuration with a custom environment lookup.
    pub fn from_lookup<F>(config: &RoutingConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut bound = HashMap::new();
        let mut selectors = Vec::new();

        for dest in &config.destinations {
            let from_env = dest
                .env
                .as_deref()
                .and_then(&lookup)
                .filter(|v| !v.is_empty());
            let stream = from_env.or_else(|| dest.stream.clone());

            match &stream {
                Some(s) => tracing::info!(selector = %dest.selector, stream = %s, "Destination bound"),
                None => tracing::warn!(
                    selector = %dest.selector,
                    env = ?dest.env,
                    "Destination has no stream; variable unset"
                ),
            }

            bound.insert(dest.selector.clone(), stream);
            selectors.push(Selector {
                name: dest.selector.clone(),
                label: dest.label.clone().unwrap_or_else(|| dest.selector.clone()),
            });
        }

        Self {
            bound,
            selectors,
            default_stream: config.default_stream.clone(),
            policy: config.unknown_selector,
        }
    }

    /// Selectors in configuration order.
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn policy(&self) -> UnknownSelectorPolicy {
        self.policy
    }

    /// Resolve a selector to a stream identifier.
    ///
    /// An absent or empty selector uses the default stream. Under the
    /// passthrough policy every failure resolves to an empty identifier.
    pub fn resolve(&self, selector: Option<&str>) -> RelayResult<String> {
        let resolved = match selector.filter(|s| !s.is_empty()) {
            None => self
                .default_stream
                .clone()
                .ok_or_else(|| "no stream selected and no default stream configured".to_string()),
            Some(name) => match self.bound.get(name) {
                Some(Some(stream)) => Ok(stream.clone()),
                Some(None) => Err(format!("'{}' has no stream configured", name)),
                None => Err(format!("'{}' is not a known stream", name)),
            },
        };

        match (resolved, self.policy) {
            (Ok(stream), _) => Ok(stream),
            (Err(reason), UnknownSelectorPolicy::Reject) => Err(RelayError::UnknownDestination(reason)),
            (Err(reason), UnknownSelectorPolicy::Passthrough) => {
                tracing::warn!(reason = %reason, "Proceeding with empty destination");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DestinationConfig;

    fn env(name: &str) -> Option<String> {
        match name {
            "GO_STREAM" => Some("stream-A".to_string()),
            "NODE_STREAM" => Some(String::new()),
            _ => None,
        }
    }

    fn table(policy: UnknownSelectorPolicy) -> DestinationTable {
        let config = RoutingConfig {
            unknown_selector: policy,
            ..RoutingConfig::default()
        };
        DestinationTable::from_lookup(&config, env)
    }

    #[test]
    fn test_env_binding() {
        let t = table(UnknownSelectorPolicy::Reject);
        assert_eq!(t.resolve(Some("go")).unwrap(), "stream-A");
    }

    #[test]
    fn test_empty_env_is_unbound() {
        let t = table(UnknownSelectorPolicy::Reject);
        assert!(matches!(t.resolve(Some("node")), Err(RelayError::UnknownDestination(_))));
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let t = table(UnknownSelectorPolicy::Reject);
        let err = t.resolve(Some("rust")).unwrap_err();
        assert!(err.to_string().contains("rust"));
    }

    #[test]
    fn test_unknown_selector_passthrough_is_empty() {
        let t = table(UnknownSelectorPolicy::Passthrough);
        assert_eq!(t.resolve(Some("rust")).unwrap(), "");
        assert_eq!(t.resolve(None).unwrap(), "");
    }

    #[test]
    fn test_absent_selector_uses_default() {
        let config = RoutingConfig {
            default_stream: Some("lambda-stream-NR".into()),
            ..RoutingConfig::default()
        };
        let t = DestinationTable::from_lookup(&config, env);
        assert_eq!(t.resolve(None).unwrap(), "lambda-stream-NR");
        assert_eq!(t.resolve(Some("")).unwrap(), "lambda-stream-NR");
    }

    #[test]
    fn test_absent_selector_without_default_rejected() {
        let t = table(UnknownSelectorPolicy::Reject);
        assert!(t.resolve(None).is_err());
    }

    #[test]
    fn test_literal_fallback_and_labels() {
        let config = RoutingConfig {
            destinations: vec![
                DestinationConfig {
                    selector: "go".into(),
                    label: Some("Go".into()),
                    env: Some("MISSING".into()),
                    stream: Some("fallback".into()),
                },
                DestinationConfig::literal("py", "py-stream"),
            ],
            ..RoutingConfig::default()
        };
        let t = DestinationTable::from_lookup(&config, env);
        assert_eq!(t.resolve(Some("go")).unwrap(), "fallback");
        assert_eq!(t.resolve(Some("py")).unwrap(), "py-stream");
        assert_eq!(t.selectors()[0].label, "Go");
        assert_eq!(t.selectors()[1].label, "py");
    }
}
