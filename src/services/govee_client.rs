//! Govee 云端接口客户端
//!
//! 每次调用恰好一次网络往返，不重试、不分页（接口单页返回完整
//! 设备集）。传输结果映射为三分类错误：401 → 认证失败，网络
//! 错误/超时 → 连接失败，其余非 2xx 或响应体异常 → 上游接口错误。

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::{GoveeSettings, Settings};
use crate::errors::AppError;
use crate::models::{parse_device_list, NormalizedDevice};

/// Govee 接口客户端
pub struct GoveeClient {
    client: Client,
    api_url: String,
    auth_token: SecretString,
    client_id: SecretString,
    user_agent: String,
    app_version: String,
}

impl GoveeClient {
    /// 按配置构建客户端，密钥从环境读取
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let auth_token = Settings::auth_token()?;
        let client_id = Settings::client_id()?;
        Self::new(&settings.govee, auth_token, client_id)
    }

    pub fn new(
        govee: &GoveeSettings,
        auth_token: SecretString,
        client_id: SecretString,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(govee.timeout_seconds))
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP 客户端构建失败: {}", e)))?;

        Ok(Self {
            client,
            api_url: govee.api_url.clone(),
            auth_token,
            client_id,
            user_agent: govee.user_agent.clone(),
            app_version: govee.app_version.clone(),
        })
    }

    /// 拉取账户下全部温湿度设备
    ///
    /// 单设备解析失败在解析器内部吞掉，此处只会因传输层问题返回
    /// 错误。
    pub async fn get_devices(&self) -> Result<Vec<NormalizedDevice>, AppError> {
        let response = self
            .client
            .get(&self.api_url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.auth_token.expose_secret()),
            )
            .header("clientId", self.client_id.expose_secret())
            .header(header::USER_AGENT, &self.user_agent)
            .header("appVersion", &self.app_version)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::AuthenticationFailed(
                "Govee 接口返回 401".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::ApiError(format!("HTTP 状态异常: {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::ApiError(format!("响应体解析失败: {}", e)))?;

        let devices = parse_device_list(&body);
        tracing::debug!(count = devices.len(), "设备列表拉取完成");
        Ok(devices)
    }

    /// 按展示名查找单个设备
    pub async fn get_device_by_name(
        &self,
        device_name: &str,
    ) -> Result<Option<NormalizedDevice>, AppError> {
        let devices = self.get_devices().await?;
        Ok(devices.into_iter().find(|d| d.name == device_name))
    }

    /// 查询单个设备的当前温度（摄氏度）
    pub async fn get_temperature(&self, device_name: &str) -> Result<Option<f64>, AppError> {
        let device = self.get_device_by_name(device_name).await?;
        Ok(device.and_then(|d| d.temperature))
    }
}

/// reqwest 传输错误 → 错误三分类
fn map_transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() || err.is_connect() {
        AppError::ConnectionFailed(err.to_string())
    } else {
        AppError::ApiError(err.to_string())
    }
}
