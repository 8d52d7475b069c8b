//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / Publisher / Consumer produce:
//!     → logging.rs (tracing events + correlated JSON lines)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log collector (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every correlated line carries the active trace linkage
//! - Request ID flows through the HTTP layer
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{correlated, init_logging, LogSink, MemorySink, StdoutSink};
