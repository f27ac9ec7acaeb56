/// Health endpoints for container probes
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

use crate::app_state::AppState;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize, Debug)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Debug)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match state.repo.health_check().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "yatube-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": "storage unavailable",
                "service": "yatube-api"
            }))
        }
    }
}

pub async fn readiness_summary(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    let result = state.repo.health_check().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let storage = match result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "storage reachable".to_string(),
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: "storage unavailable".to_string(),
                latency_ms,
            }
        }
    };

    let ready = storage.status == ComponentStatus::Healthy;
    let mut checks = HashMap::new();
    checks.insert("storage".to_string(), storage);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
