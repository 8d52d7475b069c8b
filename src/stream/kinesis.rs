//! Kinesis Data Streams backend.
//!
//! # Responsibilities
//! - Build an SDK client from the default credential/region chain
//! - Submit one record per call with `PutRecord`
//! - Map SDK failures onto `StreamError`

use async_trait::async_trait;
use aws_sdk_kinesis::config::Region;
use aws_sdk_kinesis::error::{DisplayErrorContext, SdkError};
use aws_sdk_kinesis::operation::put_record::PutRecordError;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::Client;

use crate::config::StreamConfig;
use crate::stream::{Acknowledgement, EventStream, StreamError, StreamRecord, StreamResult};

/// EventStream backed by Amazon Kinesis.
#[derive(Clone, Debug)]
pub struct KinesisStream {
    client: Client,
}

impl KinesisStream {
    /// Wrap an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from configuration plus the SDK's default provider chain.
    pub async fn from_config(config: &StreamConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        tracing::info!(
            region = ?shared.region(),
            endpoint = ?config.endpoint_url,
            "Kinesis client initialized"
        );

        Self::new(Client::new(&shared))
    }
}

#[async_trait]
impl EventStream for KinesisStream {
    async fn put_record(&self, record: StreamRecord) -> StreamResult<Acknowledgement> {
        let mut request = self
            .client
            .put_record()
            .partition_key(record.partition_key)
            .data(Blob::new(record.data));

        // Destinations may be bound to a stream ARN rather than a name.
        request = if is_arn(&record.stream_name) {
            request.stream_arn(record.stream_name)
        } else {
            request.stream_name(record.stream_name)
        };

        let output = request.send().await.map_err(classify)?;

        Ok(Acknowledgement {
            shard_id: output.shard_id().to_string(),
            sequence_number: output.sequence_number().to_string(),
            encryption_type: output.encryption_type().map(|e| e.as_str().to_string()),
        })
    }
}

fn is_arn(name: &str) -> bool {
    name.starts_with("arn:")
}

fn classify(err: SdkError<PutRecordError>) -> StreamError {
    match &err {
        SdkError::ServiceError(_) | SdkError::ConstructionFailure(_) => {
            StreamError::Rejected(DisplayErrorContext(&err).to_string())
        }
        _ => StreamError::Transport(DisplayErrorContext(&err).to_string()),
    }
}
