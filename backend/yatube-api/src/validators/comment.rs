use crate::error::{FieldErrors, Result};
use serde_json::Value;
use validator::Validate;

use super::{as_object, merge_validation, read_text, WriteMode};

/// Writable comment fields. `post` and `author` come from the request, never
/// from the body.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct CommentPayload {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
}

pub fn parse_comment(payload: &Value, mode: WriteMode) -> Result<CommentPayload> {
    let map = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let parsed = CommentPayload {
        text: read_text(map, "text", mode.requires_all(), &mut errors),
    };
    merge_validation(&mut errors, parsed.validate());
    errors.into_result()?;
    Ok(parsed)
}
