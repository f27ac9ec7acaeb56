/// Authorization for yatube-api
///
/// Each resource declares an ordered chain of permissions. The chain is
/// checked once per request before the object is loaded, and once more per
/// object for detail routes; the first failing permission decides the
/// response. A failure is 401 when the request carries no principal and 403
/// otherwise.
use actix_web::http::Method;

use crate::error::{AppError, Result};
use crate::models::{Comment, Post, User};

/// Records that carry an author.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Every request needs a principal.
    IsAuthenticated,
    /// Reads are open, writes need a principal.
    IsAuthenticatedOrReadOnly,
    /// Reads are open, writes to an object need its author.
    IsAuthorOrReadOnly,
}

impl Permission {
    fn has_permission(self, method: &Method, principal: Option<&User>) -> bool {
        match self {
            Permission::IsAuthenticated => principal.is_some(),
            Permission::IsAuthenticatedOrReadOnly => is_safe(method) || principal.is_some(),
            Permission::IsAuthorOrReadOnly => true,
        }
    }

    fn has_object_permission(
        self,
        method: &Method,
        principal: Option<&User>,
        object: &dyn Authored,
    ) -> bool {
        match self {
            Permission::IsAuthorOrReadOnly => {
                is_safe(method) || principal.is_some_and(|u| u.id == object.author_id())
            }
            Permission::IsAuthenticated | Permission::IsAuthenticatedOrReadOnly => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PermissionChain(&'static [Permission]);

pub const POST_PERMISSIONS: PermissionChain = PermissionChain(&[
    Permission::IsAuthorOrReadOnly,
    Permission::IsAuthenticatedOrReadOnly,
]);

pub const COMMENT_PERMISSIONS: PermissionChain = PermissionChain(&[
    Permission::IsAuthorOrReadOnly,
    Permission::IsAuthenticatedOrReadOnly,
]);

pub const GROUP_PERMISSIONS: PermissionChain = PermissionChain(&[Permission::IsAuthorOrReadOnly]);

pub const FOLLOW_PERMISSIONS: PermissionChain = PermissionChain(&[Permission::IsAuthenticated]);

impl PermissionChain {
    pub fn check_request(&self, method: &Method, principal: Option<&User>) -> Result<()> {
        for permission in self.0 {
            if !permission.has_permission(method, principal) {
                return Err(denied(principal));
            }
        }
        Ok(())
    }

    pub fn check_object(
        &self,
        method: &Method,
        principal: Option<&User>,
        object: &dyn Authored,
    ) -> Result<()> {
        for permission in self.0 {
            if !permission.has_object_permission(method, principal, object) {
                return Err(denied(principal));
            }
        }
        Ok(())
    }
}

fn denied(principal: Option<&User>) -> AppError {
    match principal {
        None => AppError::Unauthorized("Authentication credentials were not provided.".into()),
        Some(_) => AppError::Forbidden(
            "You do not have permission to perform this action.".into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{}", id),
        }
    }

    fn post_by(author_id: i64) -> Post {
        Post {
            id: 1,
            text: "text".into(),
            author_id,
            author: format!("user{}", author_id),
            group_id: None,
            pub_date: Utc::now(),
            comments: vec![],
        }
    }

    #[test]
    fn anonymous_reads_are_allowed_on_public_resources() {
        assert!(POST_PERMISSIONS.check_request(&Method::GET, None).is_ok());
        assert!(GROUP_PERMISSIONS.check_request(&Method::GET, None).is_ok());
        assert!(POST_PERMISSIONS
            .check_object(&Method::GET, None, &post_by(1))
            .is_ok());
    }

    #[test]
    fn anonymous_writes_are_unauthorized() {
        assert!(matches!(
            POST_PERMISSIONS.check_request(&Method::POST, None),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            FOLLOW_PERMISSIONS.check_request(&Method::GET, None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn only_the_author_may_mutate() {
        let author = user(1);
        let other = user(2);
        let post = post_by(author.id);

        for method in [Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(COMMENT_PERMISSIONS
                .check_object(&method, Some(&author), &post)
                .is_ok());
            assert!(matches!(
                COMMENT_PERMISSIONS.check_object(&method, Some(&other), &post),
                Err(AppError::Forbidden(_))
            ));
        }
    }
}
