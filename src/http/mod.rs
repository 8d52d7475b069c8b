//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → event.rs (HTTP request → InboundEvent)
//!     → [routing layer: page or publish]
//!     → response.rs (OutboundResponse → HTTP response)
//!     → Send to client
//! ```

pub mod event;
pub mod page;
pub mod response;
pub mod server;

pub use event::{InboundEvent, OutboundResponse};
pub use server::HttpServer;
