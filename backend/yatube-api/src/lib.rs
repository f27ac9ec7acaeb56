/// Yatube API Library
///
/// REST API for a small blogging platform: posts, groups, comments and
/// follows, with author-only writes and token authentication.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: Business logic layer
/// - `db`: Repository trait with PostgreSQL and in-memory stores
/// - `models`: Rows and response shapes
/// - `validators`: Write payload validation
/// - `middleware`: Authentication, permissions and request metrics
/// - `pagination`: Limit/offset pagination
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jwt;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod validators;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
