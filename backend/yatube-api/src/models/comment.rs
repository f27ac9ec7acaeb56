use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub author_id: i64,
    pub author: String,
    pub post_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: String,
    pub post: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub author_id: i64,
    pub post_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub text: Option<String>,
}
