//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper fails with `invalid_request` and a `details` object naming
//! the offending field and a machine-readable reason.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Error, LONG_TEXT_MAX, RequiredText};

/// Request field as spelled in the JSON body or path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Machine-readable reason placed in `details.code`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum Reason {
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
    InvalidFile,
}

#[derive(Serialize)]
struct Details<'a> {
    field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    code: Reason,
}

fn reject(field: FieldName, reason: Reason, value: Option<&str>, message: String) -> Error {
    let details = Details {
        field: field.0,
        value,
        code: reason,
    };
    let error = Error::invalid_request(message);
    match serde_json::to_value(details) {
        Ok(details) => error.with_details(details),
        Err(_) => error,
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    reject(
        field,
        Reason::InvalidUuid,
        Some(value),
        format!("{field} must be a valid UUID"),
    )
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    reject(
        field,
        Reason::InvalidTimestamp,
        Some(value),
        format!("{field} must be an RFC 3339 timestamp"),
    )
}

/// Field-level rejection carrying the domain validator's message.
pub(crate) fn invalid_field_error(field: FieldName, reason: impl fmt::Display) -> Error {
    reject(field, Reason::InvalidValue, None, format!("{field} {reason}"))
}

pub(crate) fn invalid_file_error(field: FieldName, reason: impl fmt::Display) -> Error {
    reject(field, Reason::InvalidFile, None, format!("{field}: {reason}"))
}

/// Parse a UUID-backed identifier such as
/// [`EquipmentId`](crate::domain::EquipmentId).
pub(crate) fn parse_id<T: FromStr>(value: &str, field: FieldName) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_rfc3339_timestamp(
    value: String,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_rfc3339_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value
        .map(|raw| parse_rfc3339_timestamp(raw, field))
        .transpose()
}

/// Short required text (names, codes, locations).
pub(crate) fn required_text(value: &str, field: FieldName) -> Result<RequiredText, Error> {
    RequiredText::new(value).map_err(|err| invalid_field_error(field, err))
}

/// Long required text (observations).
pub(crate) fn long_text(value: &str, field: FieldName) -> Result<RequiredText, Error> {
    RequiredText::bounded(value, LONG_TEXT_MAX).map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn optional_text(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<RequiredText>, Error> {
    value.map(|raw| required_text(&raw, field)).transpose()
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EquipmentId;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn details(error: &Error) -> &Value {
        error.details().expect("details present")
    }

    #[test]
    fn invalid_ids_name_field_and_value() {
        let error = parse_id::<EquipmentId>("abc", FieldName::new("equipmentId"))
            .expect_err("not a uuid");
        assert_eq!(error.message(), "equipmentId must be a valid UUID");
        assert_eq!(
            details(&error),
            &json!({"field": "equipmentId", "value": "abc", "code": "invalid_uuid"})
        );
    }

    #[rstest]
    #[case("2026-03-02T09:00:00Z", true)]
    #[case("2026-03-02T09:00:00-06:00", true)]
    #[case("2026-03-02", false)]
    #[case("ayer", false)]
    fn timestamps_require_rfc3339(#[case] raw: &str, #[case] valid: bool) {
        let result = parse_rfc3339_timestamp(raw.to_owned(), FieldName::new("performedOn"));
        assert_eq!(result.is_ok(), valid);
    }

    #[test]
    fn blank_text_is_rejected_with_field() {
        let error = required_text("   ", FieldName::new("serialNumber")).expect_err("blank");
        assert_eq!(details(&error)["field"], "serialNumber");
        assert_eq!(details(&error)["code"], "invalid_value");
    }

    #[test]
    fn long_text_allows_more_than_short_text() {
        let observations = "x".repeat(1000);
        assert!(required_text(&observations, FieldName::new("name")).is_err());
        assert!(long_text(&observations, FieldName::new("observations")).is_ok());
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        next_due: Option<Option<String>>,
    }

    #[rstest]
    #[case("{}", None)]
    #[case(r#"{"next_due":null}"#, Some(None))]
    #[case(r#"{"next_due":"2026-04-01T00:00:00Z"}"#, Some(Some("2026-04-01T00:00:00Z")))]
    fn nullable_separates_absent_from_null(
        #[case] raw: &str,
        #[case] expected: Option<Option<&str>>,
    ) {
        let patch: Patch = serde_json::from_str(raw).expect("json");
        assert_eq!(patch.next_due.as_ref().map(Option::as_deref), expected);
    }
}
