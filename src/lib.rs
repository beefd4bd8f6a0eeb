//! Camellia - Govee 温湿度传感器桥接服务
//!
//! 轮询 Govee 云端设备列表接口，将嵌套的半字符串化 JSON 负载
//! 归一化为扁平的强类型传感器记录，并通过 HTTP 接口对外发布：
//! - 设备遥测轮询与快照缓存
//! - 百分之一编码单位换算（2160 → 21.6°C）
//! - 缺失 / false / 0 三态语义保持
//! - 传感器 / 二元传感器实体投影

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use errors::AppError;
