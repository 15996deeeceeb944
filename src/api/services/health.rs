use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use crate::storage::Storage;

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::{HealthResponse, HealthStorageCheck};

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub async fn health_check(
    storage: web::Data<Arc<dyn Storage>>,
    app_start_time: web::Data<AppStartTime>,
) -> HttpResponse {
    let start_time = Instant::now();
    let backend = storage.backend_name().to_string();

    let check = match tokio::time::timeout(Duration::from_secs(5), storage.health_check()).await {
        Ok(Ok(stats)) => {
            trace!("Storage health check passed: {:?}", stats);
            HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                users: Some(stats.users),
                posts: Some(stats.posts),
                comments: Some(stats.comments),
                error: None,
            }
        }
        Ok(Err(e)) => {
            error!("Storage health check failed: {}", e);
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                users: None,
                posts: None,
                comments: None,
                error: Some(e.to_string()),
            }
        }
        Err(_) => {
            error!("Storage health check timeout");
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                users: None,
                posts: None,
                comments: None,
                error: Some("timeout".to_string()),
            }
        }
    };

    let now = chrono::Utc::now();
    let healthy = check.status == "healthy";
    let response = HealthResponse {
        status: check.status.clone(),
        timestamp: now.to_rfc3339(),
        uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
        storage: check,
        response_time_ms: start_time.elapsed().as_millis() as u64,
    };

    if healthy {
        json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(response))
    } else {
        json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ServiceUnavailable,
            "Storage unavailable",
            Some(response),
        )
    }
}
