//! 设备查询 API 处理器

use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{project_binary_sensors, project_sensors, ApiResponse, EntityState};
use crate::services::SnapshotService;

/// 获取全部设备
pub async fn list_devices(
    snapshot_service: web::Data<Arc<SnapshotService>>,
) -> Result<HttpResponse, AppError> {
    let devices = snapshot_service.devices().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(devices)))
}

/// 按展示名获取单个设备，不存在返回 404
pub async fn get_device(
    snapshot_service: web::Data<Arc<SnapshotService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();

    let device = snapshot_service.device_by_name(&name).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(device)))
}

/// 设备实体投影响应
#[derive(Debug, Serialize)]
pub struct DeviceEntitiesResponse {
    pub name: String,
    pub mac: String,
    pub model: String,
    pub sensors: Vec<EntityState>,
    pub binary_sensors: Vec<EntityState>,
}

/// 获取单个设备的实体投影（传感器 + 二元传感器）
pub async fn get_device_entities(
    snapshot_service: web::Data<Arc<SnapshotService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();

    let device = snapshot_service.device_by_name(&name).await?;

    let response = DeviceEntitiesResponse {
        sensors: project_sensors(&device),
        binary_sensors: project_binary_sensors(&device),
        name: device.name,
        mac: device.mac,
        model: device.model,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
