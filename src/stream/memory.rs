//! In-memory implementation of the EventStream trait for testing and development.

use async_trait::async_trait;
use base64::Engine;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::consume::{KinesisEvent, KinesisEventRecord, KinesisRecordData};
use crate::stream::{Acknowledgement, EventStream, StreamError, StreamRecord, StreamResult};

/// Shard id reported for every record. A single fixed partition key means a
/// single shard.
pub const SHARD_ID: &str = "shardId-000000000000";

/// EventStream that keeps every accepted record in memory.
///
/// Sequence numbers start at 1 and increase by one per accepted record.
/// Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryStream {
    records: Arc<Mutex<Vec<(Acknowledgement, StreamRecord)>>>,
    sequence: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl InMemoryStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent submissions fail with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of accepted records in arrival order.
    pub fn records(&self) -> Vec<StreamRecord> {
        self.lock().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Render accepted records as a stream-trigger batch.
    pub fn to_event(&self) -> KinesisEvent {
        let engine = base64::engine::general_purpose::STANDARD;
        let records = self
            .lock()
            .iter()
            .map(|(ack, record)| KinesisEventRecord {
                event_name: "aws:kinesis:record".to_string(),
                event_id: Some(format!("{}:{}", ack.shard_id, ack.sequence_number)),
                event_source_arn: Some(record.stream_name.clone()),
                kinesis: KinesisRecordData {
                    data: engine.encode(&record.data),
                    partition_key: record.partition_key.clone(),
                    sequence_number: ack.sequence_number.clone(),
                },
            })
            .collect();
        KinesisEvent { records }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Acknowledgement, StreamRecord)>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventStream for InMemoryStream {
    async fn put_record(&self, record: StreamRecord) -> StreamResult<Acknowledgement> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StreamError::Transport("in-memory stream set to fail".to_string()));
        }

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let ack = Acknowledgement {
            shard_id: SHARD_ID.to_string(),
            sequence_number: format!("{:056}", seq),
            encryption_type: Some("NONE".to_string()),
        };

        tracing::debug!(
            stream = %record.stream_name,
            partition_key = %record.partition_key,
            bytes = record.data.len(),
            sequence = %ack.sequence_number,
            "Record appended"
        );

        self.lock().push((ack.clone(), record));
        Ok(ack)
    }
}
