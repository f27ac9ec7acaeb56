use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post row joined with its author's username and the ids of its comments.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub author: String,
    pub group_id: Option<i64>,
    pub pub_date: DateTime<Utc>,
    pub comments: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub group: Option<i64>,
    pub comments: Vec<i64>,
    pub pub_date: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            text: post.text,
            author: post.author,
            group: post.group_id,
            comments: post.comments,
            pub_date: post.pub_date,
        }
    }
}

/// Validated input for inserting a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub text: String,
    pub group_id: Option<i64>,
}

/// Validated changes for an update. `None` leaves the column untouched;
/// `group_id: Some(None)` clears the group.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub group_id: Option<Option<i64>>,
}
