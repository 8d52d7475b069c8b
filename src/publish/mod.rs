//! Trace-stamped publishing subsystem.
//!
//! # Data Flow
//! ```text
//! (message, selector, Transaction)
//!     → envelope.rs (Envelope { message, trace })
//!     → destination.rs (selector → stream name)
//!     → publisher.rs (correlated log line, put_record, acknowledgement)
//! ```

pub mod destination;
pub mod envelope;
pub mod publisher;

pub use destination::{DestinationTable, Selector};
pub use envelope::Envelope;
pub use publisher::Publisher;
