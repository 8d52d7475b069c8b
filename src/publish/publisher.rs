//! Trace-stamped publisher.
//!
//! # Responsibilities
//! - Stamp each message with the trace active when the envelope is built
//! - Resolve the destination stream
//! - Log a correlated record line, then submit with the fixed partition key
//! - Return the stream acknowledgement unmodified
//!
//! # Design Decisions
//! - No retries; stream errors surface as `PublishFailed`
//! - The envelope is built before destination resolution

use std::sync::Arc;

use crate::error::{RelayError, RelayResult};
use crate::observability::{correlated, metrics, LogSink};
use crate::publish::{DestinationTable, Envelope};
use crate::stream::{Acknowledgement, EventStream, StreamRecord};
use crate::trace::TraceCollaborator;

/// Publishes envelopes to the event stream.
#[derive(Clone)]
pub struct Publisher {
    stream: Arc<dyn EventStream>,
    destinations: Arc<DestinationTable>,
    partition_key: String,
    sink: Arc<dyn LogSink>,
}

impl Publisher {
    /// Create a publisher over an explicitly constructed stream client.
    pub fn new(
        stream: Arc<dyn EventStream>,
        destinations: Arc<DestinationTable>,
        partition_key: impl Into<String>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            stream,
            destinations,
            partition_key: partition_key.into(),
            sink,
        }
    }

    pub fn destinations(&self) -> &DestinationTable {
        &self.destinations
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// Publish `message` to the stream chosen by `selector`.
    pub async fn publish(
        &self,
        trace: &dyn TraceCollaborator,
        message: &str,
        selector: Option<&str>,
    ) -> RelayResult<Acknowledgement> {
        let envelope = Envelope::new(message, trace.inject_headers());
        let stream_name = self.destinations.resolve(selector)?;
        let data = envelope
            .to_bytes()
            .map_err(|e| RelayError::Internal(format!("envelope encoding failed: {}", e)))?;

        self.sink.emit(correlated(
            format!("RECORD: {}", envelope.message()),
            &trace.capture_linkage(),
        ));

        let record = StreamRecord {
            stream_name: stream_name.clone(),
            partition_key: self.partition_key.clone(),
            data,
        };

        match self.stream.put_record(record).await {
            Ok(ack) => {
                metrics::record_publish(&stream_name, true);
                tracing::info!(
                    stream = %stream_name,
                    shard_id = %ack.shard_id,
                    sequence_number = %ack.sequence_number,
                    "Record published"
                );
                Ok(ack)
            }
            Err(e) => {
                metrics::record_publish(&stream_name, false);
                tracing::error!(stream = %stream_name, error = %e, "Publish failed");
                Err(RelayError::PublishFailed(e))
            }
        }
    }
}
