/// Data models for yatube-api
///
/// Each entity has a row type (what the repository returns) and a response
/// type with the exact field list the API exposes. The `From` impls are the
/// whole serialization mapping; nothing is derived from the row layout.
pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentChanges, CommentResponse, NewComment};
pub use follow::{Follow, FollowResponse, NewFollow};
pub use group::{Group, GroupResponse, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostResponse};
pub use user::User;
