//! Distributed-trace linkage subsystem.
//!
//! # Data Flow
//! ```text
//! inbound headers (traceparent/tracestate)
//!     → tracer.rs (begin Transaction)
//!     → capture_linkage()  → correlated log lines
//!     → inject_headers()   → TraceContext embedded in the Envelope
//!
//! consumed event (nrDt)
//!     → context.rs (TraceContext::from_json)
//!     → Transaction::accept_headers
//! ```

pub mod context;
pub mod tracer;

pub use context::TraceContext;
pub use tracer::{NoTrace, TraceCollaborator, TraceParent, Tracer, Transaction, PROPAGATION_HEADERS};
