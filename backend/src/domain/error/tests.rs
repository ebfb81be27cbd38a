//! Tests for the domain error payload and its serde contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn provider_error() -> Error {
    Error::provider("Mailchimp upsert failed")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "stage": "upsert", "status": 400 }))
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::provider(Error::provider("upstream"), ErrorCode::ProviderError)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.trace_id().is_none());
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn serialises_camel_case_and_skips_absent_fields() {
    let value = serde_json::to_value(Error::invalid_request("Invalid email")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "invalid_request", "message": "Invalid email" })
    );
}

#[rstest]
fn serialised_payload_carries_trace_and_details(provider_error: Error) {
    let value = serde_json::to_value(&provider_error).expect("serialise");
    assert_eq!(value["code"], "provider_error");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["stage"], "upsert");

    let decoded: Error = serde_json::from_value(value).expect("deserialise");
    assert_eq!(decoded, provider_error);
}

#[rstest]
fn deserialising_rejects_blank_trace_id() {
    let payload = json!({ "code": "internal_error", "message": "boom", "traceId": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err(), "blank trace identifiers must be rejected");
}
