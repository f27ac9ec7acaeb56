/// HTTP middleware for yatube-api
///
/// Bearer-token authentication that resolves the requesting user, the
/// `Principal` extractor handlers use to read it, and request metrics.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
use crate::models::User;

// =====================================================================
// Authentication
// =====================================================================

/// Authenticated user stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(pub User);

/// Resolves `Authorization: Bearer <token>` to a `Principal`.
///
/// Requests without a bearer token stay anonymous; whether that is allowed
/// is decided by the resource's permission chain. A token that is present
/// but invalid, or names an unknown user, fails the request with 401.
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticationService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string());

            if let Some(token) = token {
                let state = req
                    .app_data::<web::Data<AppState>>()
                    .cloned()
                    .ok_or_else(|| AppError::Internal("application state missing".into()))?;

                let claims = state
                    .jwt
                    .validate(&token)
                    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

                let user_id = claims
                    .user_id()
                    .ok_or_else(|| AppError::Unauthorized("Invalid user id in token".into()))?;

                let user = state
                    .repo
                    .find_user_by_id(user_id)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

                tracing::debug!(user_id = user.id, username = %user.username, "request authenticated");
                req.extensions_mut().insert(Principal(user));
            }

            service.call(req).await
        })
    }
}

impl Principal {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequest for Principal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(|| {
                    AppError::Unauthorized("Authentication credentials were not provided.".into())
                        .into()
                }),
        )
    }
}

// =====================================================================
// Metrics middleware
// =====================================================================

/// Records request count and latency per route pattern.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        // Resolved from the resource map, so requests rejected by inner
        // middleware are still labelled with their route.
        let path = req
            .request()
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let status = match &res {
                Ok(resp) => resp.status(),
                Err(err) => err.as_response_error().status_code(),
            }
            .as_u16()
            .to_string();

            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &path, &status])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &path])
                .observe(elapsed.as_secs_f64());

            tracing::debug!(%method, %path, %status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
