//! Stream-trigger batch shape.

use serde::{Deserialize, Serialize};

/// A batch of stream records as delivered to a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinesisEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<KinesisEventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisEventRecord {
    #[serde(default)]
    pub event_name: String,

    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    #[serde(rename = "eventSourceARN", default, skip_serializing_if = "Option::is_none")]
    pub event_source_arn: Option<String>,

    pub kinesis: KinesisRecordData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinesisRecordData {
    /// Base64-encoded record payload.
    pub data: String,
    #[serde(default)]
    pub partition_key: String,
    #[serde(default)]
    pub sequence_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_trigger_payload() {
        let raw = r#"{
            "Records": [{
                "eventID": "shardId-000000000000:4959",
                "eventName": "aws:kinesis:record",
                "eventSourceARN": "arn:aws:kinesis:us-east-1:123456789012:stream/go",
                "kinesis": {
                    "kinesisSchemaVersion": "1.0",
                    "partitionKey": "1",
                    "sequenceNumber": "4959",
                    "data": "aGVsbG8="
                }
            }]
        }"#;

        let event: KinesisEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.records.len(), 1);
        let r = &event.records[0];
        assert_eq!(r.event_name, "aws:kinesis:record");
        assert_eq!(r.event_id.as_deref(), Some("shardId-000000000000:4959"));
        assert_eq!(r.kinesis.partition_key, "1");
        assert_eq!(r.kinesis.data, "aGVsbG8=");
    }

    #[test]
    fn test_missing_records_is_empty_batch() {
        let event: KinesisEvent = serde_json::from_str("{}").unwrap();
        assert!(event.records.is_empty());
    }
}
