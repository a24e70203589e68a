//! Shared validation helpers for inbound HTTP adapters.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidBase64,
    PayloadTooLarge,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidBase64 => "invalid_base64",
            ErrorCode::PayloadTooLarge => "payload_too_large",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must contain valid UUIDs")).with_index(
        ErrorCode::InvalidUuid,
        index,
        value,
    )
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| invalid_uuid_error(field, &value))
}

pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(&value).map_err(|_| invalid_uuid_index_error(field, index, &value))
        })
        .collect()
}

/// Decode a base64 payload, bounding the decoded size.
///
/// The bound applies to the decoded byte count so clients cannot smuggle an
/// oversized file behind a compact-looking base64 string.
pub(crate) fn decode_base64_content(
    value: &str,
    field: FieldName,
    max_bytes: usize,
) -> Result<Vec<u8>, Error> {
    let name = field.as_str();
    // 4 base64 characters encode at most 3 bytes.
    let decoded_upper_bound = value.len() / 4 * 3 + 3;
    if decoded_upper_bound > max_bytes {
        return Err(ValidationError::new(
            name,
            format!("{name} exceeds the maximum upload size of {max_bytes} bytes"),
        )
        .with_code(ErrorCode::PayloadTooLarge));
    }
    let bytes = BASE64.decode(value.trim()).map_err(|_| {
        ValidationError::new(name, format!("{name} must be valid base64"))
            .with_code(ErrorCode::InvalidBase64)
    })?;
    if bytes.len() > max_bytes {
        return Err(ValidationError::new(
            name,
            format!("{name} exceeds the maximum upload size of {max_bytes} bytes"),
        )
        .with_code(ErrorCode::PayloadTooLarge));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;

    #[rstest]
    fn parse_uuid_accepts_canonical_form() {
        let parsed = parse_uuid(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            FieldName::new("id"),
        )
        .expect("valid uuid");
        assert_eq!(parsed.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn parse_uuid_reports_field_and_value() {
        let error = parse_uuid("nope".to_owned(), FieldName::new("id")).expect_err("invalid uuid");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "id");
        assert_eq!(details["value"], "nope");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    fn parse_uuid_list_reports_offending_index() {
        let error = parse_uuid_list(
            vec![
                "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
                "broken".to_owned(),
            ],
            FieldName::new("ids"),
        )
        .expect_err("second entry invalid");
        let details = error.details().expect("details present");
        assert_eq!(details["index"], 1);
        assert_eq!(details["value"], "broken");
    }

    #[rstest]
    fn base64_decoding_round_trips() {
        let bytes = decode_base64_content("aGVsbG8=", FieldName::new("file.contentBase64"), 64)
            .expect("valid base64");
        assert_eq!(bytes, b"hello");
    }

    #[rstest]
    fn base64_decoding_rejects_garbage() {
        let error = decode_base64_content("!!!", FieldName::new("file.contentBase64"), 64)
            .expect_err("invalid base64");
        let details = error.details().expect("details present");
        assert_eq!(details["code"], "invalid_base64");
    }

    #[rstest]
    fn base64_decoding_bounds_decoded_size() {
        let payload = BASE64.encode(vec![0u8; 128]);
        let error = decode_base64_content(&payload, FieldName::new("file.contentBase64"), 64)
            .expect_err("oversized payload");
        let details = error.details().expect("details present");
        assert_eq!(details["code"], "payload_too_large");
    }
}
