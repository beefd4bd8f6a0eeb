//! 通用数据结构

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 统一 API 响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    /// 最近一次成功轮询时间，尚未成功时为 None
    pub last_poll: Option<DateTime<Utc>>,
    pub device_count: usize,
    pub uptime_seconds: u64,
}
