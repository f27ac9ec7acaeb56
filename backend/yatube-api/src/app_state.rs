use std::sync::Arc;

use crate::db::Repository;
use crate::jwt::JwtValidator;
use crate::pagination::PaginationConfig;

/// Shared per-process state handed to every handler as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub jwt: Arc<JwtValidator>,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, jwt: JwtValidator, pagination: PaginationConfig) -> Self {
        Self {
            repo,
            jwt: Arc::new(jwt),
            pagination,
        }
    }
}
