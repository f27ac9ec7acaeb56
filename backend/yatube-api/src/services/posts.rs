/// Post service - listing, retrieval and author-scoped writes
use crate::db::{PageWindow, Repository};
use crate::error::{AppError, FieldErrors, Result};
use crate::metrics::record_write;
use crate::models::{NewPost, Post, PostChanges, User};
use crate::validators::{messages, parse_post, PostPayload, WriteMode};
use serde_json::Value;
use std::sync::Arc;

pub struct PostService {
    repo: Arc<dyn Repository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Posts in id order, optionally limited to one page.
    pub async fn list_posts(&self, window: Option<PageWindow>) -> Result<Vec<Post>> {
        self.repo.list_posts(window).await
    }

    pub async fn count_posts(&self) -> Result<i64> {
        self.repo.count_posts().await
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        self.repo
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    /// Create a post owned by `author`. Payload `author` is never read.
    pub async fn create_post(&self, author: &User, payload: &Value) -> Result<Post> {
        let parsed = self.validate(payload, WriteMode::Create).await?;
        let text = parsed
            .text
            .ok_or_else(|| AppError::Validation(FieldErrors::single("text", messages::REQUIRED)))?;

        let post = self
            .repo
            .create_post(NewPost {
                author_id: author.id,
                text,
                group_id: parsed.group.flatten(),
            })
            .await?;

        record_write("post", "create");
        tracing::info!(post_id = post.id, author_id = author.id, "post created");
        Ok(post)
    }

    /// Apply a PUT or PATCH payload. The caller has already checked that the
    /// requester is the author.
    pub async fn update_post(&self, post: &Post, payload: &Value, mode: WriteMode) -> Result<Post> {
        let parsed = self.validate(payload, mode).await?;
        let changes = PostChanges {
            text: parsed.text,
            group_id: parsed.group,
        };

        let updated = self
            .repo
            .update_post(post.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post.id)))?;

        record_write("post", "update");
        tracing::info!(post_id = post.id, "post updated");
        Ok(updated)
    }

    pub async fn delete_post(&self, post: &Post) -> Result<()> {
        if !self.repo.delete_post(post.id).await? {
            return Err(AppError::NotFound(format!("Post {} not found", post.id)));
        }
        record_write("post", "delete");
        tracing::info!(post_id = post.id, "post deleted");
        Ok(())
    }

    /// Field checks plus the group lookup, reported together.
    async fn validate(&self, payload: &Value, mode: WriteMode) -> Result<PostPayload> {
        let (parsed, mut errors) = parse_post(payload, mode)?;

        if let Some(Some(group_id)) = parsed.group {
            if self.repo.get_group(group_id).await?.is_none() {
                errors.add("group", messages::invalid_pk(group_id));
            }
        }

        errors.into_result()?;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;
    use crate::models::NewGroup;
    use serde_json::json;

    async fn setup() -> (Arc<MemoryRepository>, PostService, User) {
        let repo = Arc::new(MemoryRepository::new());
        let author = repo.insert_user("leo").await;
        let service = PostService::new(repo.clone());
        (repo, service, author)
    }

    #[tokio::test]
    async fn create_without_group_leaves_group_empty() {
        let (_, service, author) = setup().await;
        let post = service
            .create_post(&author, &json!({"text": "hello", "author": "mallory"}))
            .await
            .unwrap();
        assert_eq!(post.group_id, None);
        assert_eq!(post.author, "leo");
        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn unknown_group_is_reported_with_other_field_errors() {
        let (_, service, author) = setup().await;
        let err = service
            .create_post(&author, &json!({"text": "", "group": 77}))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.get("text").unwrap()[0], messages::BLANK);
                assert_eq!(fields.get("group").unwrap()[0], messages::invalid_pk(77));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn partial_update_can_clear_group_and_keep_text() {
        let (repo, service, author) = setup().await;
        let group = repo
            .insert_group(NewGroup {
                title: "Cats".into(),
                slug: "cats".into(),
                description: String::new(),
            })
            .await;
        let post = service
            .create_post(&author, &json!({"text": "hello", "group": group.id}))
            .await
            .unwrap();
        assert_eq!(post.group_id, Some(group.id));

        let updated = service
            .update_post(&post, &json!({"group": null}), WriteMode::Partial)
            .await
            .unwrap();
        assert_eq!(updated.group_id, None);
        assert_eq!(updated.text, "hello");
    }

    #[tokio::test]
    async fn replace_without_text_fails() {
        let (_, service, author) = setup().await;
        let post = service
            .create_post(&author, &json!({"text": "hello"}))
            .await
            .unwrap();
        let err = service
            .update_post(&post, &json!({}), WriteMode::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
