/// Comment handlers - comments nested under `/posts/{post_id}/comments`
use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::{Principal, COMMENT_PERMISSIONS};
use crate::models::CommentResponse;
use crate::services::CommentService;
use crate::validators::WriteMode;

use super::{json_body, principal_user, require_user};

/// List the comments of a post
pub async fn list_comments(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    COMMENT_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;

    let comments: Vec<CommentResponse> = CommentService::new(state.repo.clone())
        .list_comments(path.into_inner())
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// Comment on a post as the requester
pub async fn create_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    COMMENT_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let user = require_user(&principal)?;

    let payload = json_body(&body)?;
    let comment = CommentService::new(state.repo.clone())
        .create_comment(path.into_inner(), user, &payload)
        .await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Get one comment of a post
pub async fn get_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    COMMENT_PERMISSIONS.check_request(req.method(), user)?;

    let (post_id, comment_id) = path.into_inner();
    let comment = CommentService::new(state.repo.clone())
        .get_comment(post_id, comment_id)
        .await?;
    COMMENT_PERMISSIONS.check_object(req.method(), user, &comment)?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// Replace a comment (PUT)
pub async fn update_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<(i64, i64)>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    write_comment(req, state, principal, path.into_inner(), body, WriteMode::Replace).await
}

/// Partially update a comment (PATCH)
pub async fn partial_update_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<(i64, i64)>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    write_comment(req, state, principal, path.into_inner(), body, WriteMode::Partial).await
}

async fn write_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    (post_id, comment_id): (i64, i64),
    body: web::Bytes,
    mode: WriteMode,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    COMMENT_PERMISSIONS.check_request(req.method(), user)?;

    let service = CommentService::new(state.repo.clone());
    let comment = service.get_comment(post_id, comment_id).await?;
    COMMENT_PERMISSIONS.check_object(req.method(), user, &comment)?;

    let payload = json_body(&body)?;
    let updated = service.update_comment(&comment, &payload, mode).await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(updated)))
}

/// Delete a comment
pub async fn delete_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    COMMENT_PERMISSIONS.check_request(req.method(), user)?;

    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(state.repo.clone());
    let comment = service.get_comment(post_id, comment_id).await?;
    COMMENT_PERMISSIONS.check_object(req.method(), user, &comment)?;

    service.delete_comment(&comment).await?;
    Ok(HttpResponse::NoContent().finish())
}
