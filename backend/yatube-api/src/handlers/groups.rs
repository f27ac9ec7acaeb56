/// Group handlers - read-only
use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::{Principal, GROUP_PERMISSIONS};
use crate::models::GroupResponse;
use crate::services::GroupService;

use super::principal_user;

pub async fn list_groups(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
) -> Result<HttpResponse> {
    GROUP_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;

    let groups: Vec<GroupResponse> = GroupService::new(state.repo.clone())
        .list_groups()
        .await?
        .into_iter()
        .map(GroupResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(groups))
}

pub async fn get_group(
    req: HttpRequest,
    state: web::Data<AppState>,
    principal: Option<Principal>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    GROUP_PERMISSIONS.check_request(req.method(), principal_user(&principal))?;

    let group = GroupService::new(state.repo.clone())
        .get_group(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(GroupResponse::from(group)))
}
