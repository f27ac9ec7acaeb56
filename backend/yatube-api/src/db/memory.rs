use crate::error::{AppError, FieldErrors, Result, NON_FIELD_ERRORS};
use crate::models::{
    Comment, CommentChanges, Follow, Group, NewComment, NewFollow, NewGroup, NewPost, Post,
    PostChanges, User,
};
use crate::validators::messages;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{PageWindow, Repository};

#[derive(Debug, Clone)]
struct PostRow {
    text: String,
    author_id: i64,
    group_id: Option<i64>,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    author_id: i64,
    post_id: i64,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct FollowRow {
    user_id: i64,
    following_id: i64,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    users: BTreeMap<i64, User>,
    groups: BTreeMap<i64, NewGroup>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    follows: BTreeMap<i64, FollowRow>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, user_id: i64) -> Result<String> {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| AppError::Internal(format!("user {} is missing", user_id)))
    }

    fn post(&self, id: i64) -> Result<Option<Post>> {
        let Some(row) = self.posts.get(&id) else {
            return Ok(None);
        };
        let comments = self
            .comments
            .iter()
            .filter(|(_, c)| c.post_id == id)
            .map(|(cid, _)| *cid)
            .collect();
        Ok(Some(Post {
            id,
            text: row.text.clone(),
            author_id: row.author_id,
            author: self.username(row.author_id)?,
            group_id: row.group_id,
            pub_date: row.pub_date,
            comments,
        }))
    }

    fn group(&self, id: i64) -> Option<Group> {
        let row = self.groups.get(&id)?;
        let posts = self
            .posts
            .iter()
            .filter(|(_, p)| p.group_id == Some(id))
            .map(|(pid, _)| *pid)
            .collect();
        Some(Group {
            id,
            title: row.title.clone(),
            slug: row.slug.clone(),
            description: row.description.clone(),
            posts,
        })
    }

    fn comment(&self, id: i64) -> Result<Option<Comment>> {
        let Some(row) = self.comments.get(&id) else {
            return Ok(None);
        };
        Ok(Some(Comment {
            id,
            author_id: row.author_id,
            author: self.username(row.author_id)?,
            post_id: row.post_id,
            text: row.text.clone(),
            created: row.created,
        }))
    }

    fn follow(&self, id: i64) -> Result<Option<Follow>> {
        let Some(row) = self.follows.get(&id) else {
            return Ok(None);
        };
        Ok(Some(Follow {
            id,
            user_id: row.user_id,
            user: self.username(row.user_id)?,
            following_id: row.following_id,
            following: self.username(row.following_id)?,
        }))
    }

    fn check_group(&self, group_id: Option<i64>) -> Result<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(AppError::Internal(format!(
                "group {} does not exist",
                id
            ))),
            _ => Ok(()),
        }
    }
}

/// In-process repository with the same integrity rules as the SQL schema:
/// follow pairs are unique, deleting a post removes its comments.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, as the auth subsystem would.
    pub async fn insert_user(&self, username: &str) -> User {
        let mut state = self.state.write().await;
        let user = User {
            id: state.next_id(),
            username: username.to_string(),
        };
        state.users.insert(user.id, user.clone());
        user
    }

    /// Create a group; groups are administered outside the API.
    pub async fn insert_group(&self, group: NewGroup) -> Group {
        let mut state = self.state.write().await;
        let id = state.next_id();
        state.groups.insert(id, group.clone());
        Group {
            id,
            title: group.title,
            slug: group.slug,
            description: group.description,
            posts: Vec::new(),
        }
    }

    pub async fn follow_count(&self) -> usize {
        self.state.read().await.follows.len()
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn count_posts(&self) -> Result<i64> {
        Ok(self.state.read().await.posts.len() as i64)
    }

    async fn list_posts(&self, window: Option<PageWindow>) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        let (skip, take) = match window {
            Some(w) => (w.offset.max(0) as usize, w.limit.max(0) as usize),
            None => (0, usize::MAX),
        };
        let mut posts = Vec::new();
        for id in state.posts.keys().skip(skip).take(take) {
            if let Some(post) = state.post(*id)? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.state.read().await.post(id)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut state = self.state.write().await;
        state.check_group(post.group_id)?;
        let id = state.next_id();
        state.posts.insert(
            id,
            PostRow {
                text: post.text,
                author_id: post.author_id,
                group_id: post.group_id,
                pub_date: Utc::now(),
            },
        );
        state
            .post(id)?
            .ok_or_else(|| AppError::Internal(format!("post {} vanished after insert", id)))
    }

    async fn update_post(&self, id: i64, changes: PostChanges) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        if let Some(group_id) = changes.group_id {
            state.check_group(group_id)?;
        }
        let Some(row) = state.posts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = changes.text {
            row.text = text;
        }
        if let Some(group_id) = changes.group_id {
            row.group_id = group_id;
        }
        state.post(id)
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Ok(false);
        }
        state.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let state = self.state.read().await;
        Ok(state.groups.keys().filter_map(|id| state.group(*id)).collect())
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.state.read().await.group(id))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments = Vec::new();
        for (id, _) in state.comments.iter().filter(|(_, c)| c.post_id == post_id) {
            if let Some(comment) = state.comment(*id)? {
                comments.push(comment);
            }
        }
        Ok(comments)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comment(id)?.filter(|c| c.post_id == post_id))
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(AppError::Internal(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        let id = state.next_id();
        state.comments.insert(
            id,
            CommentRow {
                author_id: comment.author_id,
                post_id: comment.post_id,
                text: comment.text,
                created: Utc::now(),
            },
        );
        state
            .comment(id)?
            .ok_or_else(|| AppError::Internal(format!("comment {} vanished after insert", id)))
    }

    async fn update_comment(&self, id: i64, changes: CommentChanges) -> Result<Option<Comment>> {
        let mut state = self.state.write().await;
        let Some(row) = state.comments.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(text) = changes.text {
            row.text = text;
        }
        state.comment(id)
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.comments.remove(&id).is_some())
    }

    async fn list_follows(&self, user_id: i64, search: &[String]) -> Result<Vec<Follow>> {
        let state = self.state.read().await;
        let terms: Vec<String> = search.iter().map(|t| t.to_lowercase()).collect();
        let mut follows = Vec::new();
        for (id, _) in state.follows.iter().filter(|(_, f)| f.user_id == user_id) {
            if let Some(follow) = state.follow(*id)? {
                let followed = follow.following.to_lowercase();
                if terms.iter().all(|t| followed.contains(t.as_str())) {
                    follows.push(follow);
                }
            }
        }
        Ok(follows)
    }

    async fn get_follow(&self, user_id: i64, id: i64) -> Result<Option<Follow>> {
        let state = self.state.read().await;
        Ok(state.follow(id)?.filter(|f| f.user_id == user_id))
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }

    async fn create_follow(&self, follow: NewFollow) -> Result<Follow> {
        let mut state = self.state.write().await;
        if follow.user_id == follow.following_id {
            return Err(AppError::Validation(FieldErrors::single(
                "following",
                messages::SELF_FOLLOW,
            )));
        }
        let duplicate = state
            .follows
            .values()
            .any(|f| f.user_id == follow.user_id && f.following_id == follow.following_id);
        if duplicate {
            return Err(AppError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                messages::FOLLOW_NOT_UNIQUE,
            )));
        }
        let id = state.next_id();
        state.follows.insert(
            id,
            FollowRow {
                user_id: follow.user_id,
                following_id: follow.following_id,
            },
        );
        state
            .follow(id)?
            .ok_or_else(|| AppError::Internal(format!("follow {} vanished after insert", id)))
    }
}
