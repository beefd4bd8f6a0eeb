//! 统一错误类型定义

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// 应用错误类型
///
/// 传输层三分类（认证 / 连接 / 上游接口）对应宿主调度器的
/// 不同处理策略：认证失败应提示重新授权而非重试，连接失败
/// 由宿主按自身节奏重试。单设备解析失败不在此列，解析器内部
/// 记录警告后吞掉，永远不会上升为错误。
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    // 认证失败 (401)：令牌无效或已过期
    #[error("认证失败")]
    AuthenticationFailed(String),

    // 连接失败 (503)：网络错误或超时
    #[error("连接失败")]
    ConnectionFailed(String),

    // 上游接口错误 (502)：非 2xx 状态或响应体异常
    #[error("上游接口错误")]
    ApiError(String),

    // 资源不存在 (404)
    #[error("资源不存在")]
    NotFound(String),

    // 配置错误 (500)：含账户下无设备的校验失败
    #[error("配置错误")]
    ConfigError(String),

    // 内部错误 (500)
    #[error("内部服务错误")]
    InternalError(String),
}

/// API 错误响应结构
#[derive(Serialize)]
struct ErrorResponse {
    code: u16,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::ConnectionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ApiError(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 对外不暴露内部错误细节
        let message = match self {
            AppError::AuthenticationFailed(_) => "认证失败，请检查访问令牌".to_string(),
            AppError::ConnectionFailed(_) => "上游服务暂时不可达".to_string(),
            AppError::ApiError(_) => "上游接口返回异常".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::ConfigError(_) => "服务配置错误".to_string(),
            AppError::InternalError(_) => "服务内部错误".to_string(),
        };

        // 记录详细错误日志（内部）
        tracing::error!(
            error_type = %self,
            status = %status,
            "请求处理错误"
        );

        HttpResponse::build(status).json(ErrorResponse {
            code: status.as_u16(),
            message,
        })
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
