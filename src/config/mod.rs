//! 配置管理模块

mod settings;

pub use settings::{
    GoveeSettings, LoggingSettings, ServerSettings, Settings, MIN_SCAN_INTERVAL_SECONDS,
};
