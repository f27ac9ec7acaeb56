use crate::error::{FieldErrors, Result};
use serde_json::Value;
use validator::Validate;

use super::{as_object, merge_validation, messages, read_text, type_name, WriteMode};

/// Writable post fields after type checks. `group: Some(None)` means the
/// client explicitly sent `null`.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PostPayload {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
    pub group: Option<Option<i64>>,
}

/// Parse a post write payload. Field problems are returned alongside the
/// partially parsed value so the caller can add store-level checks.
pub fn parse_post(payload: &Value, mode: WriteMode) -> Result<(PostPayload, FieldErrors)> {
    let map = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let text = read_text(map, "text", mode.requires_all(), &mut errors);
    let group = match map.get("group") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(value) => match group_pk(value) {
            Ok(pk) => Some(Some(pk)),
            Err(message) => {
                errors.add("group", message);
                None
            }
        },
    };

    let parsed = PostPayload { text, group };
    merge_validation(&mut errors, parsed.validate());
    Ok((parsed, errors))
}

/// Primary keys may arrive as integers or numeric strings.
fn group_pk(value: &Value) -> std::result::Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| messages::incorrect_pk_type(type_name(value))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| messages::incorrect_pk_type(type_name(value))),
        other => Err(messages::incorrect_pk_type(type_name(other))),
    }
}
