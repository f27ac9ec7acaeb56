/// Payload validation for the write endpoints
///
/// Payloads arrive as untyped JSON so that every field can be checked and
/// reported independently, the way the API contract describes errors: all
/// field problems are collected into one `FieldErrors` map. Read-only and
/// unknown fields are ignored. Checks that need the store (does the group
/// exist, does the user exist) run in the service layer and add to the same
/// map.
pub mod comment;
pub mod follow;
pub mod post;

pub use comment::{parse_comment, CommentPayload};
pub use follow::{parse_follow, search_terms, FollowPayload};
pub use post::{parse_post, PostPayload};

use crate::error::{AppError, FieldErrors, Result, NON_FIELD_ERRORS};
use serde_json::{Map, Value};

/// Error messages shared by validators, services and stores.
pub mod messages {
    pub const REQUIRED: &str = "This field is required.";
    pub const BLANK: &str = "This field may not be blank.";
    pub const NULL: &str = "This field may not be null.";
    pub const NOT_A_STRING: &str = "Not a valid string.";
    pub const INVALID_VALUE: &str = "Invalid value.";
    pub const SELF_FOLLOW: &str = "cannot follow yourself";
    pub const FOLLOW_NOT_UNIQUE: &str = "The fields user, following must make a unique set.";

    pub fn invalid_pk(pk: i64) -> String {
        format!("Invalid pk \"{}\" - object does not exist.", pk)
    }

    pub fn incorrect_pk_type(received: &str) -> String {
        format!("Incorrect type. Expected pk value, received {}.", received)
    }

    pub fn unknown_username(username: &str) -> String {
        format!("Object with username={} does not exist.", username)
    }
}

/// How a write payload is applied to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: required fields must be present.
    Create,
    /// PUT: same requirements as create.
    Replace,
    /// PATCH: every field is optional.
    Partial,
}

impl WriteMode {
    pub fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// Name of a JSON value's type, as reported in type errors.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// The payload must be a JSON object.
pub(crate) fn as_object(payload: &Value) -> Result<&Map<String, Value>> {
    payload.as_object().ok_or_else(|| {
        AppError::Validation(FieldErrors::single(
            NON_FIELD_ERRORS,
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                type_name(payload)
            ),
        ))
    })
}

/// Read a text field: strings are trimmed, numbers are stringified.
/// Blankness is left to the caller's `Validate` derive.
pub(crate) fn read_text(
    map: &Map<String, Value>,
    field: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<String> {
    match map.get(field) {
        None => {
            if required {
                errors.add(field, messages::REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(field, messages::NULL);
            None
        }
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => {
            errors.add(field, messages::NOT_A_STRING);
            None
        }
    }
}

/// Fold `validator` output into an existing error map.
pub(crate) fn merge_validation(
    errors: &mut FieldErrors,
    result: std::result::Result<(), validator::ValidationErrors>,
) {
    if let Err(validation) = result {
        errors.merge(validation.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_payload_is_rejected() {
        let err = as_object(&json!([1, 2])).unwrap_err();
        match err {
            AppError::Validation(fields) => assert_eq!(
                fields.get(NON_FIELD_ERRORS).unwrap()[0],
                "Invalid data. Expected a dictionary, but got list."
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_text_reports_each_problem() {
        let payload = json!({"a": null, "b": true, "c": 42, "d": "  hi  "});
        let map = payload.as_object().unwrap();
        let mut errors = FieldErrors::new();

        assert_eq!(read_text(map, "a", true, &mut errors), None);
        assert_eq!(read_text(map, "b", true, &mut errors), None);
        assert_eq!(read_text(map, "c", true, &mut errors), Some("42".into()));
        assert_eq!(read_text(map, "d", true, &mut errors), Some("hi".into()));
        assert_eq!(read_text(map, "missing", false, &mut errors), None);
        assert_eq!(read_text(map, "required", true, &mut errors), None);

        assert_eq!(errors.get("a").unwrap()[0], messages::NULL);
        assert_eq!(errors.get("b").unwrap()[0], messages::NOT_A_STRING);
        assert_eq!(errors.get("required").unwrap()[0], messages::REQUIRED);
        assert!(errors.get("missing").is_none());
    }
}
