/// Business logic for yatube-api
///
/// Services own validation that needs the store (group and username lookups,
/// the follow rules) and the ownership rules for writes: the author or
/// follower is always the authenticated user, never a payload field.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;

pub use comments::CommentService;
pub use follows::FollowService;
pub use groups::GroupService;
pub use posts::PostService;
