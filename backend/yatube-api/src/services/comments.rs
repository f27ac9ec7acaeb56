/// Comment service - comments scoped to their parent post
use crate::db::Repository;
use crate::error::{AppError, FieldErrors, Result};
use crate::metrics::record_write;
use crate::models::{Comment, CommentChanges, NewComment, Post, User};
use crate::validators::{messages, parse_comment, WriteMode};
use serde_json::Value;
use std::sync::Arc;

pub struct CommentService {
    repo: Arc<dyn Repository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Every comment operation starts here: an unknown post is a 404, never
    /// an empty result.
    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.repo
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let post = self.get_post(post_id).await?;
        self.repo.list_comments(post.id).await
    }

    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        let post = self.get_post(post_id).await?;
        self.repo
            .get_comment(post.id, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))
    }

    /// Create a comment on post `post_id` by `author`. Body `post` and
    /// `author` are read-only and ignored. The body is validated before the
    /// post is resolved, so an invalid body is a 400 even for an unknown post.
    pub async fn create_comment(
        &self,
        post_id: i64,
        author: &User,
        payload: &Value,
    ) -> Result<Comment> {
        let parsed = parse_comment(payload, WriteMode::Create)?;
        let text = parsed
            .text
            .ok_or_else(|| AppError::Validation(FieldErrors::single("text", messages::REQUIRED)))?;
        let post = self.get_post(post_id).await?;

        let comment = self
            .repo
            .create_comment(NewComment {
                author_id: author.id,
                post_id: post.id,
                text,
            })
            .await?;

        record_write("comment", "create");
        tracing::info!(comment_id = comment.id, post_id = post.id, author_id = author.id, "comment created");
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        comment: &Comment,
        payload: &Value,
        mode: WriteMode,
    ) -> Result<Comment> {
        let parsed = parse_comment(payload, mode)?;

        let updated = self
            .repo
            .update_comment(comment.id, CommentChanges { text: parsed.text })
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment.id)))?;

        record_write("comment", "update");
        tracing::info!(comment_id = comment.id, post_id = comment.post_id, "comment updated");
        Ok(updated)
    }

    pub async fn delete_comment(&self, comment: &Comment) -> Result<()> {
        if !self.repo.delete_comment(comment.id).await? {
            return Err(AppError::NotFound(format!("Comment {} not found", comment.id)));
        }
        record_write("comment", "delete");
        tracing::info!(comment_id = comment.id, post_id = comment.post_id, "comment deleted");
        Ok(())
    }
}
