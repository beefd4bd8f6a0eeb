//! 路由配置模块

use crate::handlers;
use actix_web::web;

/// 配置所有路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // 健康检查路由（公开）
        .service(
            web::scope("/health")
                .route("", web::get().to(handlers::health))
                .route("/live", web::get().to(handlers::live)),
        )
        // 设备查询路由
        .route("/devices", web::get().to(handlers::list_devices))
        .route("/device/{name}", web::get().to(handlers::get_device))
        .route(
            "/device/{name}/entities",
            web::get().to(handlers::get_device_entities),
        );
}
