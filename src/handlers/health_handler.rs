//! 健康检查 API 处理器

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use std::time::Instant;

use crate::models::HealthCheckResponse;
use crate::services::SnapshotService;

/// 应用启动时间
static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

/// 健康检查：报告最近轮询状态与设备数
pub async fn health(snapshot_service: web::Data<Arc<SnapshotService>>) -> HttpResponse {
    let last_poll = snapshot_service.last_updated().await;
    let device_count = snapshot_service.device_count().await;

    let response = HealthCheckResponse {
        status: if last_poll.is_some() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        last_poll,
        device_count,
        uptime_seconds: START_TIME.elapsed().as_secs(),
    };

    HttpResponse::Ok().json(response)
}

/// 存活检查（用于负载均衡器）
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "alive": true
    }))
}
