/// HTTP handlers for yatube-api
///
/// Every resource handler follows the same order: request-level permission
/// check, object lookup (404), object-level permission check, then body
/// parsing and validation. Bodies are read raw so that a malformed or
/// invalid payload never masks a 401/403/404.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod health;
pub mod posts;

pub use comments::{
    create_comment, delete_comment, get_comment, list_comments, partial_update_comment,
    update_comment,
};
pub use follows::{create_follow, get_follow, list_follows};
pub use groups::{get_group, list_groups};
pub use health::{health_summary, liveness_check, readiness_summary};
pub use posts::{create_post, delete_post, get_post, list_posts, partial_update_post, update_post};

use actix_web::web::Bytes;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::middleware::Principal;
use crate::models::User;

/// Parse a request body as JSON. An empty body is an empty object.
pub(crate) fn json_body(body: &Bytes) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(body)?)
}

pub(crate) fn principal_user(principal: &Option<Principal>) -> Option<&User> {
    principal.as_ref().map(Principal::user)
}

/// The authenticated user, for operations whose permission chain has
/// already required one.
pub(crate) fn require_user(principal: &Option<Principal>) -> Result<&User> {
    principal_user(principal).ok_or_else(|| {
        AppError::Unauthorized("Authentication credentials were not provided.".into())
    })
}
