//! Response validation.
//!
//! # Design
//! The API signals failures inside the body: an object with an `error` key.
//! A body that is a JSON array never carries one and is always a success.
//! Status codes are only consulted for deletes (204 means success) and to
//! report bodies that are not JSON at all.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;

const NO_CONTENT: u16 = 204;

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse the body and convert an embedded error indicator into an `ApiError`.
///
/// Returns the parsed body unchanged on success.
pub fn validate(response: &HttpResponse) -> Result<Value, ApiError> {
    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(_) if !is_success(response.status) => {
            return Err(ApiError::RemoteError {
                status: response.status,
                kind: None,
                message: response.body.clone(),
            });
        }
        Err(e) => return Err(ApiError::DeserializationError(e)),
    };

    match &body {
        Value::Object(map) => match map.get("error") {
            Some(error) => Err(error_from_body(response.status, error)),
            None => Ok(body),
        },
        _ => Ok(body),
    }
}

/// Validate and deserialize the body into `T`.
pub fn parse<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let body = validate(response)?;
    serde_json::from_value(body).map_err(ApiError::DeserializationError)
}

/// Interpret a delete response. A 204 is success and the body is ignored.
pub fn validate_delete(response: &HttpResponse) -> Result<bool, ApiError> {
    if response.status == NO_CONTENT {
        return Ok(true);
    }
    if response.body.trim().is_empty() {
        return Ok(false);
    }
    validate(response)?;
    Ok(false)
}

fn error_from_body(status: u16, error: &Value) -> ApiError {
    let Value::Object(fields) = error else {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return ApiError::RemoteError {
            status,
            kind: None,
            message,
        };
    };

    let message = message_of(fields);
    if fields.contains_key("revision_conflict") {
        warn!(status, %message, "server reported a revision conflict");
        return ApiError::StaleRevision(message);
    }

    let kind = fields.get("type").and_then(Value::as_str).map(str::to_string);
    if kind.as_deref() == Some("not_found") {
        return ApiError::NotFound(message);
    }
    ApiError::RemoteError {
        status,
        kind,
        message,
    }
}

fn message_of(fields: &Map<String, Value>) -> String {
    match fields.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => Value::Object(fields.clone()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn list_body_is_success_even_if_it_mentions_error() {
        let body = validate(&response(200, r#"[{"error": {"message": "nope"}}]"#)).unwrap();
        assert!(body.is_array());
    }

    #[test]
    fn list_body_is_success_regardless_of_status() {
        assert!(validate(&response(500, "[]")).is_ok());
    }

    #[test]
    fn object_without_error_is_returned_unchanged() {
        let body = validate(&response(200, r#"{"id": 1, "title": "Inbox"}"#)).unwrap();
        assert_eq!(body, json!({"id": 1, "title": "Inbox"}));
    }

    #[test]
    #[traced_test]
    fn revision_conflict_is_stale_revision() {
        let err = validate(&response(
            409,
            r#"{"error":{"type":"conflict","message":"The revision does not match.","revision_conflict":true}}"#,
        ))
        .unwrap_err();
        match err {
            ApiError::StaleRevision(msg) => assert_eq!(msg, "The revision does not match."),
            other => panic!("expected StaleRevision, got {other:?}"),
        }
        assert!(logs_contain("revision conflict"));
    }

    #[test]
    fn other_error_keeps_server_message() {
        let err = validate(&response(
            401,
            r#"{"error":{"type":"unauthorized","message":"You are not authorized."}}"#,
        ))
        .unwrap_err();
        match err {
            ApiError::RemoteError { status, kind, message } => {
                assert_eq!(status, 401);
                assert_eq!(kind.as_deref(), Some("unauthorized"));
                assert_eq!(message, "You are not authorized.");
            }
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn not_found_error_type_maps_to_not_found() {
        let err = validate(&response(
            404,
            r#"{"error":{"type":"not_found","message":"The resource you requested could not be found."}}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn error_key_wins_over_success_status() {
        let err = validate(&response(200, r#"{"error":{"message":"odd"}}"#)).unwrap_err();
        assert!(matches!(err, ApiError::RemoteError { status: 200, .. }));
    }

    #[test]
    fn string_error_value_is_used_as_message() {
        let err = validate(&response(400, r#"{"error":"bad_request"}"#)).unwrap_err();
        match err {
            ApiError::RemoteError { message, kind, .. } => {
                assert_eq!(message, "bad_request");
                assert!(kind.is_none());
            }
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn non_json_error_page_is_remote_error() {
        let err = validate(&response(502, "<html>Bad Gateway</html>")).unwrap_err();
        match err {
            ApiError::RemoteError { status, message, .. } => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn non_json_success_is_deserialization_error() {
        let err = validate(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Rec {
            id: u64,
        }
        let err = parse::<Rec>(&response(200, r#"{"title":"no id"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn delete_no_content_is_true_without_parsing() {
        assert!(validate_delete(&response(204, "garbage")).unwrap());
    }

    #[test]
    fn delete_conflict_is_stale_revision() {
        let err = validate_delete(&response(
            409,
            r#"{"error":{"type":"conflict","revision_conflict":true,"message":"stale"}}"#,
        ))
        .unwrap_err();
        assert!(err.is_stale_revision());
    }

    #[test]
    fn delete_other_status_without_error_is_false() {
        assert!(!validate_delete(&response(200, "{}")).unwrap());
        assert!(!validate_delete(&response(202, "")).unwrap());
    }
}
