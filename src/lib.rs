//! HTTP-triggered relay that publishes trace-stamped messages to an event stream.

pub mod config;
pub mod consume;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod publish;
pub mod routing;
pub mod stream;
pub mod trace;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use publish::{Envelope, Publisher};
pub use routing::RequestRouter;
