//! Shared fixtures for the HTTP integration tests.
//!
//! The app is assembled exactly as in `main` (same route table, same
//! middleware order) on top of the in-memory repository.
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{web, App};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use yatube_api::db::MemoryRepository;
use yatube_api::jwt::{Claims, JwtValidator};
use yatube_api::middleware::MetricsMiddleware;
use yatube_api::models::{Group, NewGroup, User};
use yatube_api::pagination::PaginationConfig;
use yatube_api::{routes, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct Fixture {
    pub repo: Arc<MemoryRepository>,
    pub state: web::Data<AppState>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_pagination(PaginationConfig::default())
    }

    pub fn with_pagination(pagination: PaginationConfig) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let state = web::Data::new(AppState::new(
            repo.clone(),
            JwtValidator::from_secret(JWT_SECRET),
            pagination,
        ));
        Self { repo, state }
    }

    pub async fn user(&self, username: &str) -> User {
        self.repo.insert_user(username).await
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.repo
            .insert_group(NewGroup {
                title: format!("Group {}", slug),
                slug: slug.to_string(),
                description: format!("All about {}", slug),
            })
            .await
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody<Error = impl Into<actix_web::Error>>>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(MetricsMiddleware)
            .wrap(NormalizePath::trim())
            .configure(routes::configure)
    }
}

pub fn token_for(user: &User) -> String {
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: chrono::Utc::now().timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

/// `Authorization` header for `user`.
pub fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user)))
}
