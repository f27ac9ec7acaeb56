use crate::error::{FieldErrors, Result};
use serde_json::Value;

use super::{as_object, messages};

/// Follow create payload. Only `following` is read; a client-supplied `user`
/// is ignored because the follower is always the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowPayload {
    pub following: Option<String>,
}

pub fn parse_follow(payload: &Value) -> Result<(FollowPayload, FieldErrors)> {
    let map = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let following = match map.get("following") {
        None => {
            errors.add("following", messages::REQUIRED);
            None
        }
        Some(Value::Null) => {
            errors.add("following", messages::NULL);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add("following", messages::INVALID_VALUE);
            None
        }
    };

    Ok((FollowPayload { following }, errors))
}

/// Split a `?search=` value into terms on whitespace and commas.
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .unwrap_or_default()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_field_is_not_read() {
        let (payload, errors) =
            parse_follow(&json!({"user": "mallory", "following": "bob"})).unwrap();
        assert!(errors.is_empty());
        assert_eq!(payload.following.as_deref(), Some("bob"));
    }

    #[test]
    fn following_is_required_and_must_be_a_string() {
        let (_, errors) = parse_follow(&json!({})).unwrap();
        assert_eq!(errors.get("following").unwrap()[0], messages::REQUIRED);

        let (_, errors) = parse_follow(&json!({"following": 3})).unwrap();
        assert_eq!(errors.get("following").unwrap()[0], messages::INVALID_VALUE);
    }

    #[test]
    fn search_terms_split_on_whitespace_and_commas() {
        assert_eq!(search_terms(Some(" ann, bel  x")), vec!["ann", "bel", "x"]);
        assert!(search_terms(None).is_empty());
        assert!(search_terms(Some(" , ")).is_empty());
    }
}
