/// Database access layer
///
/// `Repository` is the persistence seam: handlers and services only see the
/// trait. `PgRepository` is the production implementation on PostgreSQL,
/// `MemoryRepository` keeps everything in process for local runs and tests.
/// Both enforce the follow uniqueness rule at the store, so concurrent
/// creates of the same pair resolve the same way as sequential ones.
pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::error::Result;
use crate::models::{
    Comment, CommentChanges, Follow, Group, NewComment, NewFollow, NewPost, Post, PostChanges,
    User,
};

/// Window of a limit/offset page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Total number of posts, for the pagination envelope.
    async fn count_posts(&self) -> Result<i64>;

    /// Posts ordered by id; `None` returns every post.
    async fn list_posts(&self, window: Option<PageWindow>) -> Result<Vec<Post>>;

    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    async fn create_post(&self, post: NewPost) -> Result<Post>;

    /// Returns `None` when the post no longer exists.
    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>>;

    /// Deletes the post and its comments. Returns whether a row was removed.
    async fn delete_post(&self, id: i64) -> Result<bool>;

    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn get_group(&self, id: i64) -> Result<Option<Group>>;

    /// Comments of one post ordered by id.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    /// A comment, only if it belongs to `post_id`.
    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;

    async fn update_comment(&self, id: i64, changes: CommentChanges) -> Result<Option<Comment>>;

    async fn delete_comment(&self, id: i64) -> Result<bool>;

    /// Outgoing follows of `user_id`. Every search term must be a
    /// case-insensitive substring of the followed username.
    async fn list_follows(&self, user_id: i64, search: &[String]) -> Result<Vec<Follow>>;

    /// A follow, only if it is one of `user_id`'s outgoing follows.
    async fn get_follow(&self, user_id: i64, id: i64) -> Result<Option<Follow>>;

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool>;

    /// Fails with the uniqueness validation error on a duplicate pair.
    async fn create_follow(&self, follow: NewFollow) -> Result<Follow>;

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
