//! Health Check Handler
//!
//! `GET /health` reports service identity and whether the user store
//! answers. Returns 503 when the store is unreachable.

use crate::state::AppState;
use crate::{SERVICE_NAME, VERSION};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Service status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub store: StoreStatus,
}

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store = match state.users.store_health().await {
        Ok(()) => StoreStatus {
            status: ServiceStatus::Healthy,
            error: None,
        },
        Err(e) => {
            log::error!("Health check: store unreachable: {e}");
            StoreStatus {
                status: ServiceStatus::Unhealthy,
                error: Some(e.to_string()),
            }
        },
    };

    let body = HealthResponse {
        status: store.status,
        service: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        timestamp: Utc::now(),
        store,
    };

    match body.status {
        ServiceStatus::Healthy => HttpResponse::Ok().json(body),
        ServiceStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(body),
    }
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
