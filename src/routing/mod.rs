//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundEvent { httpMethod, body, headers }
//!     → router.rs (begin trace, dispatch on method)
//!         GET  → static page
//!         POST → body.rs (message, selector) → Publisher
//!     → OutboundResponse { statusCode, headers, body }
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing survives an invocation
//! - Every error maps to a response; the router never panics on input

pub mod body;
pub mod router;

pub use body::{parse_body, PublishRequest};
pub use router::RequestRouter;
