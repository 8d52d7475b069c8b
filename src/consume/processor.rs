//! Stream record processing.
//!
//! # Responsibilities
//! - Decode each record's base64 payload into an `Envelope`
//! - Continue the producer's trace from the embedded linkage
//! - Log one correlated line per record
//!
//! # Design Decisions
//! - Records are handled in batch order
//! - The first undecodable record aborts the batch so the trigger redelivers it

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use base64::Engine;

use crate::consume::KinesisEvent;
use crate::observability::{correlated, metrics, LogSink};
use crate::publish::Envelope;
use crate::trace::{TraceCollaborator, TraceContext, Tracer};

/// Errors raised while decoding a batch.
#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error("record {index}: data is not valid base64: {source}")]
    Decode {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("record {index}: payload is not an envelope: {source}")]
    Payload {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Summary of one processed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumedRecord {
    pub event_name: String,
    pub sequence_number: String,
    pub message: String,
    /// Trace id of the consumer transaction after accepting the linkage.
    pub trace_id: Option<String>,
    /// Whether the embedded linkage continued the producer's trace.
    pub trace_accepted: bool,
}

/// Decodes stream-trigger batches.
#[derive(Clone)]
pub struct RecordProcessor {
    tracer: Arc<Tracer>,
    sink: Arc<dyn LogSink>,
}

impl RecordProcessor {
    pub fn new(tracer: Arc<Tracer>, sink: Arc<dyn LogSink>) -> Self {
        Self { tracer, sink }
    }

    /// Process every record in `event`, in order.
    pub fn process(&self, event: &KinesisEvent) -> Result<Vec<ConsumedRecord>, ConsumeError> {
        let engine = base64::engine::general_purpose::STANDARD;
        let mut consumed = Vec::with_capacity(event.records.len());

        for (index, record) in event.records.iter().enumerate() {
            let bytes = engine
                .decode(record.kinesis.data.as_bytes())
                .map_err(|source| ConsumeError::Decode { index, source })?;
            let envelope = Envelope::from_slice(&bytes)
                .map_err(|source| ConsumeError::Payload { index, source })?;

            let mut txn = self.tracer.begin(&TraceContext::new());
            let accepted = txn.accept_headers(envelope.trace());
            txn.add_attribute("myCustomData", envelope.message());

            self.sink.emit(correlated(
                format!("Data from {} = {}", record.event_name, envelope.message()),
                &txn.capture_linkage(),
            ));
            tracing::debug!(
                index,
                sequence_number = %record.kinesis.sequence_number,
                trace_accepted = accepted,
                "Record consumed"
            );

            consumed.push(ConsumedRecord {
                event_name: record.event_name.clone(),
                sequence_number: record.kinesis.sequence_number.clone(),
                message: envelope.message().to_string(),
                trace_id: txn.trace_id().map(str::to_string),
                trace_accepted: accepted,
            });
        }

        metrics::record_consumed(consumed.len());
        Ok(consumed)
    }
}
