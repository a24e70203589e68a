//! Regression coverage for domain error construction and serialisation.

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::TraceId;

#[rstest]
#[case(Error::invalid_request("bad payload"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("permission denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("already rejected"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("database down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn try_new_rejects_blank_message() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[test]
fn blank_convenience_message_is_replaced() {
    let error = Error::internal("");
    assert_eq!(error.message(), "unspecified error");
}

#[test]
fn details_round_trip_through_serde() {
    let error =
        Error::invalid_request("validation failed").with_details(json!({"field": "title"}));

    let encoded = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(encoded["code"], "invalid_request");
    assert_eq!(encoded["details"]["field"], "title");

    let decoded: Error = serde_json::from_value(encoded).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[test]
fn deserialisation_rejects_empty_message() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "not_found", "message": ""}));
    assert!(result.is_err());
}

#[test]
fn absent_optional_fields_are_omitted_from_wire_form() {
    let error = Error::not_found("document not found");
    let encoded = serde_json::to_value(&error).expect("serialise error");
    let object = encoded.as_object().expect("object form");
    assert!(!object.contains_key("details"));
    assert!(!object.contains_key("trace_id"));
}

#[tokio::test]
async fn constructor_captures_trace_id_in_scope() {
    let trace_id = TraceId::from_uuid(uuid::Uuid::new_v4());
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[test]
fn constructor_leaves_trace_id_empty_out_of_scope() {
    let error = Error::internal("boom");
    assert_eq!(error.trace_id(), None);
}

#[test]
fn with_trace_id_overrides_captured_value() {
    let error = Error::internal("boom").with_trace_id("abc".to_owned());
    assert_eq!(error.trace_id(), Some("abc"));
}

#[test]
fn display_uses_message_only() {
    let error = Error::forbidden("permission denied");
    assert_eq!(error.to_string(), "permission denied");
}
