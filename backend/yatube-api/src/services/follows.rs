/// Follow service - the requester's outgoing follow edges
use crate::db::Repository;
use crate::error::{AppError, FieldErrors, Result, NON_FIELD_ERRORS};
use crate::metrics::record_write;
use crate::models::{Follow, NewFollow, User};
use crate::validators::{messages, parse_follow};
use serde_json::Value;
use std::sync::Arc;

pub struct FollowService {
    repo: Arc<dyn Repository>,
}

impl FollowService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn list_follows(&self, user: &User, search: &[String]) -> Result<Vec<Follow>> {
        self.repo.list_follows(user.id, search).await
    }

    pub async fn get_follow(&self, user: &User, follow_id: i64) -> Result<Follow> {
        self.repo
            .get_follow(user.id, follow_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Follow {} not found", follow_id)))
    }

    /// Follow the user named by `following`. The follower is always `user`.
    ///
    /// Field checks (existence, not self) are reported first; the pair
    /// uniqueness check only runs once they pass. The store's constraint
    /// settles concurrent duplicates with the same error.
    pub async fn create_follow(&self, user: &User, payload: &Value) -> Result<Follow> {
        let (parsed, mut errors) = parse_follow(payload)?;

        let mut target = None;
        if let Some(username) = parsed.following.as_deref() {
            match self.repo.find_user_by_username(username).await? {
                None => errors.add("following", messages::unknown_username(username)),
                Some(found) if found.id == user.id => {
                    errors.add("following", messages::SELF_FOLLOW)
                }
                Some(found) => target = Some(found),
            }
        }
        errors.into_result()?;

        let target = target.ok_or_else(|| {
            AppError::Validation(FieldErrors::single("following", messages::REQUIRED))
        })?;

        if self.repo.follow_exists(user.id, target.id).await? {
            tracing::debug!(user_id = user.id, following_id = target.id, "duplicate follow rejected");
            return Err(AppError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                messages::FOLLOW_NOT_UNIQUE,
            )));
        }

        let follow = self
            .repo
            .create_follow(NewFollow {
                user_id: user.id,
                following_id: target.id,
            })
            .await?;

        record_write("follow", "create");
        tracing::info!(user_id = user.id, following_id = target.id, "follow created");
        Ok(follow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRepository;
    use serde_json::json;

    fn first_message(err: AppError, field: &str) -> String {
        match err {
            AppError::Validation(fields) => fields.get(field).unwrap()[0].clone(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn self_follow_fails_even_with_forged_user() {
        let repo = Arc::new(MemoryRepository::new());
        let leo = repo.insert_user("leo").await;
        repo.insert_user("ann").await;
        let service = FollowService::new(repo.clone());

        let err = service
            .create_follow(&leo, &json!({"user": "ann", "following": "leo"}))
            .await
            .unwrap_err();
        assert_eq!(first_message(err, "following"), messages::SELF_FOLLOW);
        assert_eq!(repo.follow_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_username_is_a_field_error() {
        let repo = Arc::new(MemoryRepository::new());
        let leo = repo.insert_user("leo").await;
        let service = FollowService::new(repo);

        let err = service
            .create_follow(&leo, &json!({"following": "ghost"}))
            .await
            .unwrap_err();
        assert_eq!(
            first_message(err, "following"),
            messages::unknown_username("ghost")
        );
    }

    #[tokio::test]
    async fn duplicate_pair_fails_with_uniqueness_error() {
        let repo = Arc::new(MemoryRepository::new());
        let leo = repo.insert_user("leo").await;
        repo.insert_user("ann").await;
        let service = FollowService::new(repo.clone());

        let follow = service
            .create_follow(&leo, &json!({"following": "ann"}))
            .await
            .unwrap();
        assert_eq!(follow.user, "leo");
        assert_eq!(follow.following, "ann");

        let err = service
            .create_follow(&leo, &json!({"following": "ann"}))
            .await
            .unwrap_err();
        assert_eq!(
            first_message(err, NON_FIELD_ERRORS),
            messages::FOLLOW_NOT_UNIQUE
        );
        assert_eq!(repo.follow_count().await, 1);
    }
}
