//! Single-line message parsing

use contracts::{Message, RecordMessage, SchemaMessage, StateMessage, TargetError};
use serde::de::DeserializeOwned;
use std::path::{Component, Path};

/// Parse one protocol line.
///
/// # Errors
/// `Protocol` when the line is not JSON, has no `type`, names an unknown kind,
/// lacks the fields its kind requires, or carries a stream name that is not a
/// single plain path segment.
pub fn parse_message(line: &str) -> Result<Message, TargetError> {
    let raw: serde_json::Value = serde_json::from_str(line)
        .map_err(|e| TargetError::protocol(format!("unable to parse line as JSON: {e}")))?;

    let kind = raw
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| TargetError::protocol("message has no string 'type' field"))?
        .to_string();

    let message = match kind.as_str() {
        "SCHEMA" => Message::Schema(payload::<SchemaMessage>(&kind, raw)?),
        "RECORD" => Message::Record(payload::<RecordMessage>(&kind, raw)?),
        "STATE" => Message::State(payload::<StateMessage>(&kind, raw)?),
        other => {
            return Err(TargetError::protocol(format!(
                "unknown message type '{other}'"
            )))
        }
    };

    if let Some(stream) = message.stream() {
        check_stream_name(&kind, stream)?;
    }
    Ok(message)
}

/// Stream names become a directory below the destination root, so they must
/// be exactly one plain path segment.
fn check_stream_name(kind: &str, stream: &str) -> Result<(), TargetError> {
    if stream.is_empty() {
        return Err(TargetError::protocol(format!(
            "{kind} message has an empty stream name"
        )));
    }

    let single_segment = matches!(
        Path::new(stream).components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !single_segment || stream.contains(['/', '\\']) {
        return Err(TargetError::protocol(format!(
            "{kind} message has stream name '{stream}' that is not a single path segment"
        )));
    }
    Ok(())
}

fn payload<T: DeserializeOwned>(kind: &str, raw: serde_json::Value) -> Result<T, TargetError> {
    serde_json::from_value(raw)
        .map_err(|e| TargetError::protocol(format!("invalid {kind} message: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Value;

    #[test]
    fn parses_schema() {
        let message = parse_message(
            r#"{"type": "SCHEMA", "stream": "users", "schema": {"properties": {"id": {"type": "integer"}}}, "key_properties": ["id"]}"#,
        )
        .unwrap();
        match message {
            Message::Schema(schema) => {
                assert_eq!(schema.stream, "users");
                assert_eq!(schema.key_properties, vec!["id".to_string()]);
                assert!(schema.schema.properties.unwrap().contains_key("id"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn key_properties_are_optional() {
        let message =
            parse_message(r#"{"type": "SCHEMA", "stream": "s", "schema": {}}"#).unwrap();
        assert_eq!(message.kind(), "SCHEMA");
    }

    #[test]
    fn parses_record_ignoring_extra_fields() {
        let message = parse_message(
            r#"{"type": "RECORD", "stream": "users", "record": {"name": "kyrie", "age": 10}, "time_extracted": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        match message {
            Message::Record(record) => {
                assert_eq!(record.stream, "users");
                assert_eq!(record.record.get("age"), Some(&Value::Integer(10)));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn parses_state() {
        let message =
            parse_message(r#"{"type": "STATE", "value": {"bookmarks": {"users": 5}}}"#).unwrap();
        match message {
            Message::State(state) => assert_eq!(state.value["bookmarks"]["users"], 5),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_protocol_error() {
        let err = parse_message("{not json").unwrap_err();
        assert!(matches!(err, TargetError::Protocol { .. }));
    }

    #[test]
    fn unknown_kind_is_named() {
        let err = parse_message(r#"{"type": "ACTIVATE_VERSION", "stream": "s", "version": 1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("ACTIVATE_VERSION"), "got: {err}");
    }

    #[test]
    fn missing_type_is_protocol_error() {
        let err = parse_message(r#"{"stream": "s"}"#).unwrap_err();
        assert!(err.to_string().contains("'type'"), "got: {err}");
    }

    #[test]
    fn record_must_be_object() {
        let err = parse_message(r#"{"type": "RECORD", "stream": "s", "record": [1]}"#).unwrap_err();
        assert!(err.to_string().contains("invalid RECORD"), "got: {err}");
    }

    #[test]
    fn state_requires_value() {
        assert!(parse_message(r#"{"type": "STATE"}"#).is_err());
    }

    #[test]
    fn stream_name_must_stay_below_destination() {
        for stream in ["/etc/evil", "../up", "..", ".", "a/b", "a\\b", "./a"] {
            let line = serde_json::json!({"type": "SCHEMA", "stream": stream, "schema": {}});
            let err = parse_message(&line.to_string()).unwrap_err();
            assert!(
                matches!(err, TargetError::Protocol { .. }),
                "{stream:?} accepted: {err}"
            );
        }
        assert!(parse_message(r#"{"type": "SCHEMA", "stream": "public-users.v2", "schema": {}}"#).is_ok());
    }

    #[test]
    fn empty_stream_name_is_rejected() {
        let err = parse_message(r#"{"type": "RECORD", "stream": "", "record": {}}"#).unwrap_err();
        assert!(err.to_string().contains("empty stream"), "got: {err}");
    }
}
