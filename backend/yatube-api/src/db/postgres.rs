use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentChanges, Follow, Group, NewComment, NewFollow, NewPost, Post, PostChanges,
    User,
};
use sqlx::PgPool;

use super::{PageWindow, Repository};

const POST_SELECT: &str = r#"
    SELECT p.id, p.text, p.author_id, u.username AS author, p.group_id, p.pub_date,
           ARRAY(SELECT c.id FROM comments c WHERE c.post_id = p.id ORDER BY c.id) AS comments
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.title, g.slug, g.description,
           ARRAY(SELECT p.id FROM posts p WHERE p.group_id = g.id ORDER BY p.id) AS posts
    FROM groups g
"#;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

const FOLLOW_SELECT: &str = r#"
    SELECT f.id, f.user_id, u.username AS "user", f.following_id, t.username AS following
    FROM follows f
    JOIN users u ON u.id = f.user_id
    JOIN users t ON t.id = f.following_id
"#;

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// `ILIKE` pattern matching `term` anywhere, with LIKE metacharacters escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait::async_trait]
impl Repository for PgRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn count_posts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_posts(&self, window: Option<PageWindow>) -> Result<Vec<Post>> {
        let posts = match window {
            Some(window) => {
                sqlx::query_as::<_, Post>(&format!(
                    "{POST_SELECT} ORDER BY p.id LIMIT $1 OFFSET $2"
                ))
                .bind(window.limit)
                .bind(window.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Post>(&format!("{POST_SELECT} ORDER BY p.id"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(posts)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (text, author_id, group_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&post.text)
        .bind(post.author_id)
        .bind(post.group_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_post(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("post {} vanished after insert", id)))
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET text = COALESCE($2, text),
                group_id = CASE WHEN $3 THEN $4 ELSE group_id END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.text)
        .bind(changes.group_id.is_some())
        .bind(changes.group_id.flatten())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_post(id).await
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(&format!("{GROUP_SELECT} ORDER BY g.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(groups)
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!("{GROUP_SELECT} WHERE g.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(group)
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.id = $1 AND c.post_id = $2"
        ))
        .bind(id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (author_id, post_id, text)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;

        self.get_comment(comment.post_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("comment {} vanished after insert", id)))
    }

    async fn update_comment(&self, id: i64, changes: CommentChanges) -> Result<Option<Comment>> {
        let post_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE comments
            SET text = COALESCE($2, text)
            WHERE id = $1
            RETURNING post_id
            "#,
        )
        .bind(id)
        .bind(changes.text)
        .fetch_optional(&self.pool)
        .await?;

        match post_id {
            Some(post_id) => self.get_comment(post_id, id).await,
            None => Ok(None),
        }
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_follows(&self, user_id: i64, search: &[String]) -> Result<Vec<Follow>> {
        let patterns: Vec<String> = search.iter().map(|t| contains_pattern(t)).collect();
        let follows = sqlx::query_as::<_, Follow>(&format!(
            "{FOLLOW_SELECT} WHERE f.user_id = $1 AND t.username ILIKE ALL($2) ORDER BY f.id"
        ))
        .bind(user_id)
        .bind(patterns)
        .fetch_all(&self.pool)
        .await?;
        Ok(follows)
    }

    async fn get_follow(&self, user_id: i64, id: i64) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(&format!(
            "{FOLLOW_SELECT} WHERE f.id = $1 AND f.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_follow(&self, follow: NewFollow) -> Result<Follow> {
        // A concurrent duplicate trips uq_follows_user_following; AppError maps
        // that to the same validation error as the pre-check in the service.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO follows (user_id, following_id)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(follow.user_id)
        .bind(follow.following_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_follow(follow.user_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("follow {} vanished after insert", id)))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("ann"), "%ann%");
    }

    #[test]
    fn contains_pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
