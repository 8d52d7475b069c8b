//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → environment lookups bind selectors to streams at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    BodyFormat, DestinationConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig,
    RoutingConfig, StreamBackend, StreamConfig, TracingConfig, UnknownSelectorPolicy,
};
pub use validation::ValidationError;
