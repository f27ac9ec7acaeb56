use serde::{Deserialize, Serialize};

/// Directed follow edge, joined with both usernames.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub user: String,
    pub following_id: i64,
    pub following: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub user: String,
    pub following: String,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            user: follow.user,
            following: follow.following,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewFollow {
    pub user_id: i64,
    pub following_id: i64,
}
