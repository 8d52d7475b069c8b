//! Event stream subsystem.
//!
//! # Data Flow
//! ```text
//! Publisher
//!     → StreamRecord { stream_name, partition_key, data }
//!     → EventStream::put_record (kinesis.rs | memory.rs)
//!     → Acknowledgement { ShardId, SequenceNumber } returned verbatim
//! ```
//!
//! # Design Decisions
//! - The client is built once at startup and shared via `Arc<dyn EventStream>`
//! - One record per call, no batching, no retries
//! - `InMemoryStream` stands in for the managed service in dev and tests

pub mod kinesis;
pub mod memory;

pub use kinesis::KinesisStream;
pub use memory::InMemoryStream;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StreamBackend, StreamConfig};

/// A single record submitted to a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Destination stream name or ARN. May be empty under the passthrough policy.
    pub stream_name: String,
    pub partition_key: String,
    pub data: Vec<u8>,
}

/// Raw acknowledgement returned by the stream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Acknowledgement {
    pub shard_id: String,
    pub sequence_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<String>,
}

/// Errors raised by stream backends.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The service rejected the request (validation, auth, missing stream).
    #[error("stream service rejected record: {0}")]
    Rejected(String),

    /// The request never completed (network, timeout, dispatch).
    #[error("stream transport error: {0}")]
    Transport(String),
}

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Append-only event stream.
#[async_trait]
pub trait EventStream: Send + Sync {
    /// Append one record and return the service acknowledgement unmodified.
    async fn put_record(&self, record: StreamRecord) -> StreamResult<Acknowledgement>;
}

impl std::fmt::Debug for dyn EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventStream")
    }
}

/// Build the configured backend.
pub async fn connect(config: &StreamConfig) -> Arc<dyn EventStream> {
    match config.backend {
        StreamBackend::Kinesis => Arc::new(KinesisStream::from_config(config).await),
        StreamBackend::Memory => {
            tracing::warn!("Using in-memory event stream; records are not persisted");
            Arc::new(InMemoryStream::new())
        }
    }
}
