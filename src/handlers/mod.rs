//! HTTP 处理器模块

mod device_handler;
mod health_handler;

pub use device_handler::*;
pub use health_handler::*;
