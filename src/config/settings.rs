//! 应用配置加载和管理

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::env;

/// 轮询间隔下限（秒），低于此值会触发 Govee 接口限流
pub const MIN_SCAN_INTERVAL_SECONDS: u64 = 60;

/// 应用配置结构
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub govee: GoveeSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Govee 云端接口配置
#[derive(Debug, Clone, Deserialize)]
pub struct GoveeSettings {
    /// 设备列表接口地址
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// 伪装的移动端 User-Agent（接口要求）
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// App 版本请求头
    #[serde(default = "default_app_version")]
    pub app_version: String,
    /// 请求超时（秒）
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// 轮询间隔（秒），实际生效值不低于 MIN_SCAN_INTERVAL_SECONDS
    #[serde(default = "default_scan_interval")]
    pub scan_interval_seconds: u64,
}

impl Default for GoveeSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            app_version: default_app_version(),
            timeout_seconds: default_timeout(),
            scan_interval_seconds: default_scan_interval(),
        }
    }
}

fn default_api_url() -> String {
    "https://app2.govee.com/bff-app/v1/device/list".to_string()
}
fn default_user_agent() -> String {
    "GoveeHome/7.0.12 (com.ihoment.GoVeeSensor; build:3; iOS 18.5.0) Alamofire/5.6.4".to_string()
}
fn default_app_version() -> String {
    "7.0.12".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_scan_interval() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    /// 从配置文件和环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let settings = Config::builder()
            // 加载默认配置
            .add_source(File::with_name("config/development"))
            // 根据环境加载对应配置
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // 环境变量覆盖，前缀 CAMELLIA，分隔符 __
            .add_source(
                Environment::with_prefix("CAMELLIA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// 获取 Govee 访问令牌（从环境变量）
    pub fn auth_token() -> Result<SecretString, ConfigError> {
        env::var("GOVEE_AUTH_TOKEN")
            .map(SecretString::new)
            .map_err(|_| ConfigError::NotFound("GOVEE_AUTH_TOKEN".to_string()))
    }

    /// 获取 Govee 客户端 ID（从环境变量）
    pub fn client_id() -> Result<SecretString, ConfigError> {
        env::var("GOVEE_CLIENT_ID")
            .map(SecretString::new)
            .map_err(|_| ConfigError::NotFound("GOVEE_CLIENT_ID".to_string()))
    }

    /// 生效的轮询间隔：配置值与下限取大
    pub fn effective_scan_interval(&self) -> u64 {
        self.govee
            .scan_interval_seconds
            .max(MIN_SCAN_INTERVAL_SECONDS)
    }

    /// 获取服务器地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
