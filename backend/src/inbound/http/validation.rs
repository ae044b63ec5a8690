//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with `details` naming the
//! offending field and a stable machine-readable code.

use serde_json::{Value, json};

use crate::domain::{
    Coordinate, CoordinateValidationError, Error, PostContent, PostId, PostValidationError, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidNumber,
    OutOfRange,
    InvalidUuid,
    InvalidPostId,
    EmptyValue,
    TooLong,
    InvalidFormat,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidNumber => "invalid_number",
            Self::OutOfRange => "out_of_range",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidPostId => "invalid_post_id",
            Self::EmptyValue => "empty_value",
            Self::TooLong => "too_long",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const LATITUDE: FieldName = FieldName::new("latitude");
pub(crate) const LONGITUDE: FieldName = FieldName::new("longitude");
pub(crate) const CONTENT: FieldName = FieldName::new("content");
pub(crate) const USER_ID: FieldName = FieldName::new("user_id");
pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const POST_ID: FieldName = FieldName::new("id");

/// Build an `invalid_request` error tagged with `field` and `code`.
pub(crate) fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Unwrap an optional field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn invalid_number_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::InvalidNumber,
        format!("{} must be a number", field.as_str()),
    )
}

/// Parse a decimal number supplied as text, e.g. in a query string.
pub(crate) fn parse_number(raw: &str, field: FieldName) -> Result<f64, Error> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| invalid_number_error(field))
}

/// Read a decimal number from a JSON value given either as a number or
/// as numeric text.
pub(crate) fn number_from_json(value: &Value, field: FieldName) -> Result<f64, Error> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|value| value.is_finite())
            .ok_or_else(|| invalid_number_error(field)),
        Value::String(text) => parse_number(text, field),
        _ => Err(invalid_number_error(field)),
    }
}

/// Validate a latitude/longitude pair.
pub(crate) fn coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, Error> {
    Coordinate::try_new(latitude, longitude).map_err(|err| {
        let field = match err {
            CoordinateValidationError::LatitudeOutOfRange { .. } => LATITUDE,
            CoordinateValidationError::LongitudeOutOfRange { .. } => LONGITUDE,
        };
        field_error(field, ValidationCode::OutOfRange, err.to_string())
    })
}

pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        field_error(
            USER_ID,
            ValidationCode::InvalidUuid,
            "user_id must be a valid UUID",
        )
    })
}

pub(crate) fn parse_content(raw: String) -> Result<PostContent, Error> {
    PostContent::new(raw).map_err(|err| {
        let code = match err {
            PostValidationError::ContentTooLong { .. } => ValidationCode::TooLong,
            _ => ValidationCode::EmptyValue,
        };
        field_error(CONTENT, code, err.to_string())
    })
}

pub(crate) fn parse_post_id(raw: i64) -> Result<PostId, Error> {
    PostId::new(raw)
        .map_err(|err| field_error(POST_ID, ValidationCode::InvalidPostId, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn detail_code(error: &Error) -> Option<&str> {
        error.details()?.get("code")?.as_str()
    }

    fn detail_field(error: &Error) -> Option<&str> {
        error.details()?.get("field")?.as_str()
    }

    #[rstest]
    #[case("42.5", 42.5)]
    #[case(" -76.25 ", -76.25)]
    #[case("0", 0.0)]
    fn numeric_text_parses(#[case] raw: &str, #[case] expected: f64) {
        let value = parse_number(raw, LATITUDE).expect("numeric");
        assert!((value - expected).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("NaN")]
    #[case("inf")]
    fn non_numeric_text_is_rejected(#[case] raw: &str) {
        let error = parse_number(raw, LONGITUDE).expect_err("not a number");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail_field(&error), Some("longitude"));
        assert_eq!(detail_code(&error), Some("invalid_number"));
    }

    #[rstest]
    #[case(json!(12.5), Some(12.5))]
    #[case(json!(7), Some(7.0))]
    #[case(json!("3.25"), Some(3.25))]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    #[case(json!([1.0]), None)]
    fn json_numbers_accept_numbers_and_numeric_strings(
        #[case] value: Value,
        #[case] expected: Option<f64>,
    ) {
        let parsed = number_from_json(&value, LATITUDE).ok();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(91.0, 0.0, "latitude")]
    #[case(-90.5, 0.0, "latitude")]
    #[case(0.0, 180.5, "longitude")]
    fn out_of_range_coordinates_name_the_field(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] field: &str,
    ) {
        let error = coordinate(latitude, longitude).expect_err("out of range");
        assert_eq!(detail_field(&error), Some(field));
        assert_eq!(detail_code(&error), Some("out_of_range"));
    }

    #[rstest]
    fn missing_fields_are_reported_by_name() {
        let error = require::<String>(None, CONTENT).expect_err("missing");
        assert_eq!(error.message(), "missing required field: content");
        assert_eq!(detail_code(&error), Some("missing_field"));
    }

    #[rstest]
    fn malformed_user_ids_are_rejected() {
        let error = parse_user_id("not-a-uuid").expect_err("invalid uuid");
        assert_eq!(detail_field(&error), Some("user_id"));
        assert_eq!(detail_code(&error), Some("invalid_uuid"));
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_post_ids_are_rejected(#[case] raw: i64) {
        let error = parse_post_id(raw).expect_err("invalid id");
        assert_eq!(detail_code(&error), Some("invalid_post_id"));
    }
}
