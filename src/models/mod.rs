//! 数据模型模块

mod common;
mod device;
mod entity;
mod raw;

pub use common::*;
pub use device::*;
pub use entity::*;
pub use raw::*;
