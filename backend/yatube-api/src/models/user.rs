use serde::{Deserialize, Serialize};

/// Identity principal. Rows are owned by the auth subsystem; the API only
/// reads them and refers to users by `username` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}
