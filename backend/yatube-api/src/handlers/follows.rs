/// Follow handlers - the requester's own follows only
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::{Principal, FOLLOW_PERMISSIONS};
use crate::models::FollowResponse;
use crate::services::FollowService;
use crate::validators::search_terms;

use super::{json_body, principal_user, require_user};

#[derive(Debug, Default, Deserialize)]
pub struct FollowSearchQuery {
    pub search: Option<String>,
}

/// List the requester's follows, optionally filtered by `?search=`
pub async fn list_follows(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    query: web::Query<FollowSearchQuery>,
) -> Result<HttpResponse> {
    FOLLOW_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let user = require_user(&principal)?;

    let terms = search_terms(query.search.as_deref());
    let follows: Vec<FollowResponse> = FollowService::new(state.repo.clone())
        .list_follows(user, &terms)
        .await?
        .into_iter()
        .map(FollowResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(follows))
}

/// Follow another user
pub async fn create_follow(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    FOLLOW_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let user = require_user(&principal)?;

    let payload = json_body(&body)?;
    let follow = FollowService::new(state.repo.clone())
        .create_follow(user, &payload)
        .await?;

    Ok(HttpResponse::Created().json(FollowResponse::from(follow)))
}

/// Get one of the requester's follows
pub async fn get_follow(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    FOLLOW_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;
    let user = require_user(&principal)?;

    let follow = FollowService::new(state.repo.clone())
        .get_follow(user, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(FollowResponse::from(follow)))
}
