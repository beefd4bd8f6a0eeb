//! 实体投影模型
//!
//! 按声明式描述表将归一化设备投影为传感器 / 二元传感器实体。
//! 统一的存在性规则：对应字段非缺失即暴露实体，`false`、`0`、
//! `0.0` 都是合法的暴露状态，与"实体不存在"不同。

use serde::Serialize;
use serde_json::{json, Value};

use super::device::NormalizedDevice;

/// 传感器数值语义类别
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Humidity,
    Battery,
    SignalStrength,
    Frequency,
    Connectivity,
    Problem,
    Power,
}

/// 传感器实体描述
#[derive(Debug, Clone, Copy)]
pub struct EntityDescription {
    /// 对应 NormalizedDevice 的字段键
    pub key: &'static str,
    /// 展示名
    pub name: &'static str,
    pub device_class: Option<DeviceClass>,
    pub unit: Option<&'static str>,
    /// 诊断类实体（非主要读数）
    pub diagnostic: bool,
}

/// 通用传感器描述表
pub const SENSOR_DESCRIPTIONS: &[EntityDescription] = &[
    EntityDescription {
        key: "temperature",
        name: "Temperature",
        device_class: Some(DeviceClass::Temperature),
        unit: Some("°C"),
        diagnostic: false,
    },
    EntityDescription {
        key: "humidity",
        name: "Humidity",
        device_class: Some(DeviceClass::Humidity),
        unit: Some("%"),
        diagnostic: false,
    },
    EntityDescription {
        key: "battery",
        name: "Battery",
        device_class: Some(DeviceClass::Battery),
        unit: Some("%"),
        diagnostic: true,
    },
    EntityDescription {
        key: "online",
        name: "Online Status",
        device_class: None,
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "wifi_level",
        name: "WiFi Signal Level",
        device_class: Some(DeviceClass::SignalStrength),
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "temperature_warning",
        name: "Temperature Warning",
        device_class: None,
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "humidity_warning",
        name: "Humidity Warning",
        device_class: None,
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "upload_rate",
        name: "Upload Rate",
        device_class: Some(DeviceClass::Frequency),
        unit: Some("s"),
        diagnostic: true,
    },
    EntityDescription {
        key: "power_save_mode",
        name: "Power Save Mode",
        device_class: None,
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "avg_day_temperature",
        name: "Average Daily Temperature",
        device_class: Some(DeviceClass::Temperature),
        unit: Some("°C"),
        diagnostic: true,
    },
    EntityDescription {
        key: "avg_day_humidity",
        name: "Average Daily Humidity",
        device_class: Some(DeviceClass::Humidity),
        unit: Some("%"),
        diagnostic: true,
    },
];

/// 二元传感器描述表
pub const BINARY_SENSOR_DESCRIPTIONS: &[EntityDescription] = &[
    EntityDescription {
        key: "online",
        name: "Online",
        device_class: Some(DeviceClass::Connectivity),
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "temperature_warning",
        name: "Temperature Warning",
        device_class: Some(DeviceClass::Problem),
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "humidity_warning",
        name: "Humidity Warning",
        device_class: Some(DeviceClass::Problem),
        unit: None,
        diagnostic: true,
    },
    EntityDescription {
        key: "power_save_mode",
        name: "Power Save Mode",
        device_class: Some(DeviceClass::Power),
        unit: None,
        diagnostic: true,
    },
];

/// 投影结果：一个已暴露实体的当前状态
#[derive(Debug, Clone, Serialize)]
pub struct EntityState {
    pub unique_id: String,
    pub name: String,
    pub key: &'static str,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub diagnostic: bool,
}

/// 取出设备上某个键对应的字段值，缺失返回 None
fn field_value(device: &NormalizedDevice, key: &str) -> Option<Value> {
    match key {
        "temperature" => device.temperature.map(|v| json!(v)),
        "humidity" => device.humidity.map(|v| json!(v)),
        "battery" => device.battery.map(|v| json!(v)),
        "online" => device.online.map(|v| json!(v)),
        "wifi_level" => device.wifi_level.map(|v| json!(v)),
        "temperature_warning" => device.temperature_warning.map(|v| json!(v)),
        "humidity_warning" => device.humidity_warning.map(|v| json!(v)),
        "upload_rate" => device.upload_rate.map(|v| json!(v)),
        "power_save_mode" => device.power_save_mode.map(|v| json!(v)),
        "avg_day_temperature" => device.avg_day_temperature.map(|v| json!(v)),
        "avg_day_humidity" => device.avg_day_humidity.map(|v| json!(v)),
        _ => None,
    }
}

fn make_state(device: &NormalizedDevice, desc: &EntityDescription, value: Value) -> EntityState {
    EntityState {
        unique_id: format!("{}_{}", device.mac, desc.key),
        name: format!("{} {}", device.name, desc.name),
        key: desc.key,
        value,
        device_class: desc.device_class,
        unit: desc.unit,
        diagnostic: desc.diagnostic,
    }
}

/// 投影通用传感器实体
///
/// 布尔值经由通用传感器暴露时渲染为 "On"/"Off" 标签（宿主平台
/// 类型化传感器模型的兼容处理）。
pub fn project_sensors(device: &NormalizedDevice) -> Vec<EntityState> {
    SENSOR_DESCRIPTIONS
        .iter()
        .filter_map(|desc| {
            let value = field_value(device, desc.key)?;
            let value = match value {
                Value::Bool(b) => json!(if b { "On" } else { "Off" }),
                other => other,
            };
            Some(make_state(device, desc, value))
        })
        .collect()
}

/// 投影二元传感器实体，保留原始布尔值
pub fn project_binary_sensors(device: &NormalizedDevice) -> Vec<EntityState> {
    BINARY_SENSOR_DESCRIPTIONS
        .iter()
        .filter_map(|desc| {
            let value = field_value(device, desc.key)?;
            Some(make_state(device, desc, value))
        })
        .collect()
}
