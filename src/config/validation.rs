//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate or empty selectors
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("relay.partition_key must not be empty")]
    EmptyPartitionKey,

    #[error("destination selector must not be empty")]
    EmptySelector,

    #[error("duplicate destination selector '{0}'")]
    DuplicateSelector(String),

    #[error("destination '{0}' has neither env nor stream")]
    UnboundSelector(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.relay.partition_key.is_empty() {
        errors.push(ValidationError::EmptyPartitionKey);
    }

    let mut seen = HashSet::new();
    for dest in &config.relay.destinations {
        if dest.selector.is_empty() {
            errors.push(ValidationError::EmptySelector);
            continue;
        }
        if !seen.insert(dest.selector.as_str()) {
            errors.push(ValidationError::DuplicateSelector(dest.selector.clone()));
        }
        if dest.env.is_none() && dest.stream.is_none() {
            errors.push(ValidationError::UnboundSelector(dest.selector.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
