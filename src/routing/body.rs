//! POST body interpretation.
//!
//! # Responsibilities
//! - Accept structured `{message, stream?}` bodies and raw-text bodies
//! - Reject bodies missing a usable `message`
//!
//! # Design Decisions
//! - `auto` treats anything that parses as a JSON object as structured;
//!   every other body is the message itself
//! - Structured bodies delivered pre-parsed (proxy events) are handled the
//!   same as their text form

use serde_json::{Map, Value};

use crate::config::BodyFormat;
use crate::error::{RelayError, RelayResult};

/// A parsed write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub message: String,
    pub stream: Option<String>,
}

/// Interpret a POST body according to `format`.
pub fn parse_body(body: Option<&Value>, format: BodyFormat) -> RelayResult<PublishRequest> {
    let body = match body {
        None | Some(Value::Null) => return Err(malformed("request body is empty")),
        Some(b) => b,
    };

    match (body, format) {
        (Value::Object(fields), BodyFormat::Json | BodyFormat::Auto) => from_fields(fields),
        (Value::String(text), BodyFormat::Json) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => from_fields(&fields),
            Ok(_) => Err(malformed("body must be a JSON object")),
            Err(e) => Err(malformed(&format!("body is not valid JSON: {}", e))),
        },
        (Value::String(text), BodyFormat::Auto) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(fields)) => from_fields(&fields),
            _ => raw(text),
        },
        (Value::String(text), BodyFormat::Raw) => raw(text),
        (_, BodyFormat::Json) => Err(malformed("body must be a JSON object")),
        (other, BodyFormat::Raw | BodyFormat::Auto) => raw(&other.to_string()),
    }
}

fn raw(text: &str) -> RelayResult<PublishRequest> {
    if text.is_empty() {
        return Err(malformed("request body is empty"));
    }
    Ok(PublishRequest {
        message: text.to_string(),
        stream: None,
    })
}

fn from_fields(fields: &Map<String, Value>) -> RelayResult<PublishRequest> {
    let message = match fields.get("message") {
        Some(Value::String(m)) => m.clone(),
        Some(_) => return Err(malformed("'message' must be a string")),
        None => return Err(malformed("missing required field 'message'")),
    };

    let stream = match fields.get("stream") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(malformed("'stream' must be a string")),
    };

    Ok(PublishRequest { message, stream })
}

fn malformed(reason: &str) -> RelayError {
    RelayError::MalformedRequest(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_json_body_with_stream() {
        let req = parse_body(Some(&text(r#"{"message":"hi","stream":"go"}"#)), BodyFormat::Json).unwrap();
        assert_eq!(req.message, "hi");
        assert_eq!(req.stream.as_deref(), Some("go"));
    }

    #[test]
    fn test_preparsed_object_body() {
        let body = json!({"message": "hi"});
        let req = parse_body(Some(&body), BodyFormat::Auto).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.stream.is_none());
    }

    #[test]
    fn test_missing_message_is_malformed() {
        let err = parse_body(Some(&text(r#"{"stream":"go"}"#)), BodyFormat::Auto).unwrap_err();
        assert!(matches!(err, RelayError::MalformedRequest(_)));
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn test_wrong_field_types_are_malformed() {
        assert!(parse_body(Some(&json!({"message": 5})), BodyFormat::Json).is_err());
        assert!(parse_body(Some(&json!({"message": "a", "stream": 1})), BodyFormat::Json).is_err());
    }

    #[test]
    fn test_null_stream_is_absent() {
        let req = parse_body(Some(&json!({"message": "a", "stream": null})), BodyFormat::Json).unwrap();
        assert!(req.stream.is_none());
    }

    #[test]
    fn test_json_format_rejects_text() {
        assert!(parse_body(Some(&text("Hello world")), BodyFormat::Json).is_err());
        assert!(parse_body(Some(&text("[1,2]")), BodyFormat::Json).is_err());
    }

    #[test]
    fn test_auto_format_falls_back_to_raw() {
        let req = parse_body(Some(&text("Hello world")), BodyFormat::Auto).unwrap();
        assert_eq!(req.message, "Hello world");
        assert!(req.stream.is_none());

        let req = parse_body(Some(&text("42")), BodyFormat::Auto).unwrap();
        assert_eq!(req.message, "42");
    }

    #[test]
    fn test_raw_format_keeps_json_text_verbatim() {
        let body = r#"{"message":"hi"}"#;
        let req = parse_body(Some(&text(body)), BodyFormat::Raw).unwrap();
        assert_eq!(req.message, body);
    }

    #[test]
    fn test_empty_body_is_malformed() {
        for format in [BodyFormat::Json, BodyFormat::Raw, BodyFormat::Auto] {
            assert!(parse_body(None, format).is_err());
            assert!(parse_body(Some(&Value::Null), format).is_err());
        }
        assert!(parse_body(Some(&text("")), BodyFormat::Raw).is_err());
        assert!(parse_body(Some(&text("")), BodyFormat::Auto).is_err());
    }
}
