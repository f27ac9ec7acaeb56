/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::{Principal, POST_PERMISSIONS};
use crate::models::PostResponse;
use crate::pagination::{LimitOffsetQuery, Paginated};
use crate::services::PostService;
use crate::validators::WriteMode;

use super::{json_body, principal_user, require_user};

/// List posts; paginated when a limit applies
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    query: web::Query<LimitOffsetQuery>,
) -> Result<HttpResponse> {
    POST_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let service = PostService::new(state.repo.clone());

    match query.window(&state.pagination) {
        Some(window) => {
            let count = service.count_posts().await?;
            let results: Vec<PostResponse> = service
                .list_posts(Some(window))
                .await?
                .into_iter()
                .map(PostResponse::from)
                .collect();
            Ok(HttpResponse::Ok().json(Paginated::new(&request_url(&req)?, window, count, results)))
        }
        None => {
            let posts: Vec<PostResponse> = service
                .list_posts(None)
                .await?
                .into_iter()
                .map(PostResponse::from)
                .collect();
            Ok(HttpResponse::Ok().json(posts))
        }
    }
}

/// Absolute URL of the request as the client addressed it.
fn request_url(req: &HttpRequest) -> Result<url::Url> {
    let info = req.connection_info();
    url::Url::parse(&format!("{}://{}{}", info.scheme(), info.host(), req.uri()))
        .map_err(|e| AppError::Internal(format!("Invalid request URL: {}", e)))
}

/// Create a post authored by the requester
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    POST_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let user = require_user(&principal)?;

    let payload = json_body(&body)?;
    let post = PostService::new(state.repo.clone())
        .create_post(user, &payload)
        .await?;

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Get a post by ID
pub async fn get_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    POST_PERMISSIONS.check_request(req.method(), user)?;

    let post = PostService::new(state.repo.clone())
        .get_post(path.into_inner())
        .await?;
    POST_PERMISSIONS.check_object(req.method(), user, &post)?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Replace a post (PUT)
pub async fn update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    write_post(req, state, principal, path.into_inner(), body, WriteMode::Replace).await
}

/// Partially update a post (PATCH)
pub async fn partial_update_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    write_post(req, state, principal, path.into_inner(), body, WriteMode::Partial).await
}

async fn write_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    post_id: i64,
    body: web::Bytes,
    mode: WriteMode,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    POST_PERMISSIONS.check_request(req.method(), user)?;

    let service = PostService::new(state.repo.clone());
    let post = service.get_post(post_id).await?;
    POST_PERMISSIONS.check_object(req.method(), user, &post)?;

    let payload = json_body(&body)?;
    let updated = service.update_post(&post, &payload, mode).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(updated)))
}

/// Delete a post and its comments
pub async fn delete_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = principal_user(&principal);
    POST_PERMISSIONS.check_request(req.method(), user)?;

    let service = PostService::new(state.repo.clone());
    let post = service.get_post(path.into_inner()).await?;
    POST_PERMISSIONS.check_object(req.method(), user, &post)?;

    service.delete_post(&post).await?;
    Ok(HttpResponse::NoContent().finish())
}
