//! 归一化设备模型
//!
//! 每个轮询周期从接口响应重新构建，构建后不可变；设备的持久
//! 标识只有 MAC 地址。单条记录无法识别（缺少名称或 MAC）时整条
//! 跳过并记录警告，兄弟设备不受影响。

use serde::Serialize;
use serde_json::Value;

use super::raw::{DeviceListResponse, DeviceSettings, LastDeviceData, RawDeviceRecord};

/// 已知设备型号表：SKU → 展示名
fn known_model(sku: &str) -> Option<&'static str> {
    match sku {
        "H5051" | "H5101" | "H5102" | "H5179" => Some("WiFi Thermo-Hygrometer"),
        "H5074" | "H5075" => Some("Bluetooth Thermo-Hygrometer"),
        _ => None,
    }
}

/// 扁平化、完成单位换算的传感器记录
///
/// 三态不变式：任一解析阶段的缺失在此处仍是 `None`，绝不折叠为
/// 0 或 false。布尔字段显式的 false 与缺失在下游始终可区分。
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedDevice {
    pub name: String,
    pub mac: String,
    /// 解析得到的展示型号（型号表 / SKU 回退 / 传感器推断）
    pub model: String,
    pub sku: Option<String>,
    /// 温度（摄氏度）
    pub temperature: Option<f64>,
    /// 湿度（百分比）
    pub humidity: Option<f64>,
    pub battery: Option<i64>,
    pub online: Option<bool>,
    pub wifi_level: Option<i64>,
    pub temperature_warning: Option<bool>,
    pub humidity_warning: Option<bool>,
    pub upload_rate: Option<i64>,
    pub power_save_mode: Option<bool>,
    pub last_seen: Option<i64>,
    pub avg_day_temperature: Option<f64>,
    pub avg_day_humidity: Option<f64>,
    /// 两段已解析子文档，供下游诊断
    pub raw_data: RawSubDocuments,
}

/// 解析后的子文档快照（或 None）
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawSubDocuments {
    pub device_settings: Option<DeviceSettings>,
    pub last_device_data: Option<LastDeviceData>,
}

impl NormalizedDevice {
    /// 从单条原始记录构建归一化设备
    ///
    /// deviceName 或 device（MAC）缺失时返回 None——该记录无法
    /// 被识别，属于可恢复的单条失败，不是流水线失败。
    pub fn from_raw(record: RawDeviceRecord) -> Option<Self> {
        let name = record.device_name?;
        let mac = record.device?;

        // deviceExt 缺失按空信封处理，所有派生字段为 None
        let ext = record.device_ext.unwrap_or_default();
        let settings = ext.parsed_device_settings();
        let data = ext.parsed_last_device_data();

        let temperature = convert_hundredths(data.as_ref().and_then(|d| d.tem));
        let humidity = convert_hundredths(data.as_ref().and_then(|d| d.hum));
        let model = resolve_model(record.sku.as_deref(), temperature, humidity);

        Some(Self {
            name,
            mac,
            model,
            sku: record.sku,
            temperature,
            humidity,
            battery: settings.as_ref().and_then(|s| s.battery),
            online: data.as_ref().and_then(|d| d.online),
            wifi_level: settings.as_ref().and_then(|s| s.wifi_level),
            temperature_warning: settings.as_ref().and_then(|s| s.tem_warning),
            humidity_warning: settings.as_ref().and_then(|s| s.hum_warning),
            upload_rate: settings.as_ref().and_then(|s| s.upload_rate),
            power_save_mode: settings.as_ref().and_then(|s| s.power_save_mode_state),
            last_seen: data.as_ref().and_then(|d| d.last_time),
            avg_day_temperature: convert_hundredths(data.as_ref().and_then(|d| d.avg_day_tem)),
            avg_day_humidity: convert_hundredths(data.as_ref().and_then(|d| d.avg_day_hum)),
            raw_data: RawSubDocuments {
                device_settings: settings,
                last_device_data: data,
            },
        })
    }
}

/// 百分之一编码 → 浮点单位，缺失保持缺失
fn convert_hundredths(value: Option<i64>) -> Option<f64> {
    value.map(|v| v as f64 / 100.0)
}

/// 组装展示型号
///
/// 优先型号表；SKU 存在但未知时拼接 " Sensor"；否则按传感器
/// 存在性推断。
fn resolve_model(sku: Option<&str>, temperature: Option<f64>, humidity: Option<f64>) -> String {
    if let Some(sku) = sku.filter(|s| !s.is_empty()) {
        if let Some(model) = known_model(sku) {
            return model.to_string();
        }
        return format!("{} Sensor", sku);
    }

    match (temperature.is_some(), humidity.is_some()) {
        (true, true) => "Temperature/Humidity Sensor".to_string(),
        (true, false) => "Temperature Sensor".to_string(),
        (false, true) => "Humidity Sensor".to_string(),
        (false, false) => "Sensor".to_string(),
    }
}

/// 从顶层响应体解析出全部可识别设备
///
/// 防御性处理 `{ data: { devices: [...] } }` 结构：任一层缺失得到
/// 空结果。单条记录损坏或无法识别时记录警告并跳过，永不抛错。
pub fn parse_device_list(body: &Value) -> Vec<NormalizedDevice> {
    let devices = serde_json::from_value::<DeviceListResponse>(body.clone())
        .map(|response| response.data.devices)
        .unwrap_or_default();

    let mut parsed = Vec::with_capacity(devices.len());
    for entry in devices {
        let record: RawDeviceRecord = match serde_json::from_value(entry) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "设备记录结构异常，已跳过");
                continue;
            }
        };

        match NormalizedDevice::from_raw(record) {
            Some(device) => parsed.push(device),
            None => {
                tracing::warn!("设备记录缺少 deviceName 或 device，无法识别，已跳过");
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record(settings: &str, data: &str) -> Value {
        json!({
            "deviceId": 1,
            "groupId": 0,
            "sku": "H5075",
            "device": "A4:C1:38:00:11:22",
            "versionHard": "1.0",
            "versionSoft": "1.1",
            "deviceName": "客厅温度计",
            "deviceExt": {
                "deviceSettings": settings,
                "lastDeviceData": data
            }
        })
    }

    fn sample_body(devices: Vec<Value>) -> Value {
        json!({ "data": { "devices": devices } })
    }

    #[test]
    fn test_hundredths_conversion() {
        let body = sample_body(vec![sample_record(
            r#"{"battery":95}"#,
            r#"{"tem":2160,"hum":5500,"online":true}"#,
        )]);
        let devices = parse_device_list(&body);
        assert_eq!(devices.len(), 1);
        let device = &devices[0];
        assert_eq!(device.temperature, Some(21.6));
        assert_eq!(device.humidity, Some(55.0));
        assert_eq!(device.battery, Some(95));
        assert_eq!(device.online, Some(true));
    }

    #[test]
    fn test_absent_temperature_stays_absent() {
        let body = sample_body(vec![sample_record(r#"{}"#, r#"{"hum":4200}"#)]);
        let devices = parse_device_list(&body);
        assert_eq!(devices[0].temperature, None, "缺失不得折叠为 0.0");
        assert_eq!(devices[0].humidity, Some(42.0));
    }

    #[test]
    fn test_zero_temperature_is_valid_reading() {
        let body = sample_body(vec![sample_record(r#"{}"#, r#"{"tem":0}"#)]);
        let devices = parse_device_list(&body);
        assert_eq!(devices[0].temperature, Some(0.0));
    }

    #[test]
    fn test_missing_name_or_mac_skipped() {
        let no_name = json!({
            "device": "AA:BB:CC:DD:EE:FF",
            "deviceExt": {}
        });
        let no_mac = json!({
            "deviceName": "无名设备",
            "deviceExt": {}
        });
        let ok = sample_record(r#"{}"#, r#"{}"#);

        let devices = parse_device_list(&sample_body(vec![no_name, no_mac, ok]));
        assert_eq!(devices.len(), 1, "无法识别的记录跳过，兄弟设备保留");
        assert_eq!(devices[0].mac, "A4:C1:38:00:11:22");
    }

    #[test]
    fn test_missing_device_ext_all_derived_none() {
        let record = json!({
            "deviceName": "裸设备",
            "device": "11:22:33:44:55:66"
        });
        let devices = parse_device_list(&sample_body(vec![record]));
        let device = &devices[0];
        assert_eq!(device.temperature, None);
        assert_eq!(device.battery, None);
        assert_eq!(device.online, None);
        assert!(device.raw_data.device_settings.is_none());
        assert!(device.raw_data.last_device_data.is_none());
    }

    #[test]
    fn test_malformed_settings_keeps_telemetry() {
        let body = sample_body(vec![sample_record(
            "}}}broken",
            r#"{"tem":1850,"online":false}"#,
        )]);
        let device = &parse_device_list(&body)[0];
        // 设置派生字段全部缺失
        assert_eq!(device.battery, None);
        assert_eq!(device.temperature_warning, None);
        // 遥测派生字段照常填充
        assert_eq!(device.temperature, Some(18.5));
        assert_eq!(device.online, Some(false), "false 与缺失可区分");
    }

    #[test]
    fn test_boolean_false_survives_pipeline() {
        let body = sample_body(vec![sample_record(
            r#"{"temWarning":false,"humWarning":true,"powerSaveModeState":false}"#,
            r#"{}"#,
        )]);
        let device = &parse_device_list(&body)[0];
        assert_eq!(device.temperature_warning, Some(false));
        assert_eq!(device.humidity_warning, Some(true));
        assert_eq!(device.power_save_mode, Some(false));
        assert_eq!(device.online, None);
    }

    #[test]
    fn test_model_resolution() {
        // 已知 SKU
        let body = sample_body(vec![sample_record(r#"{}"#, r#"{}"#)]);
        assert_eq!(parse_device_list(&body)[0].model, "Bluetooth Thermo-Hygrometer");

        // 未知 SKU
        let mut record = sample_record(r#"{}"#, r#"{}"#);
        record["sku"] = json!("H9999");
        let devices = parse_device_list(&sample_body(vec![record]));
        assert_eq!(devices[0].model, "H9999 Sensor");

        // 无 SKU，温湿度俱全
        let record = json!({
            "deviceName": "d",
            "device": "m",
            "deviceExt": { "lastDeviceData": r#"{"tem":100,"hum":200}"# }
        });
        let devices = parse_device_list(&sample_body(vec![record]));
        assert_eq!(devices[0].model, "Temperature/Humidity Sensor");

        // 无 SKU，仅温度
        let record = json!({
            "deviceName": "d",
            "device": "m",
            "deviceExt": { "lastDeviceData": r#"{"tem":100}"# }
        });
        assert_eq!(
            parse_device_list(&sample_body(vec![record]))[0].model,
            "Temperature Sensor"
        );

        // 无 SKU，仅湿度
        let record = json!({
            "deviceName": "d",
            "device": "m",
            "deviceExt": { "lastDeviceData": r#"{"hum":100}"# }
        });
        assert_eq!(
            parse_device_list(&sample_body(vec![record]))[0].model,
            "Humidity Sensor"
        );

        // 无 SKU，无读数
        let record = json!({ "deviceName": "d", "device": "m" });
        assert_eq!(parse_device_list(&sample_body(vec![record]))[0].model, "Sensor");
    }

    #[test]
    fn test_empty_and_missing_layers() {
        assert!(parse_device_list(&json!({})).is_empty());
        assert!(parse_device_list(&json!({"data": {}})).is_empty());
        assert!(parse_device_list(&json!({"data": {"devices": []}})).is_empty());
        // devices 类型异常同样得到空结果
        assert!(parse_device_list(&json!({"data": {"devices": "oops"}})).is_empty());
    }

    #[test]
    fn test_raw_sub_documents_roundtrip() {
        let body = sample_body(vec![sample_record(
            r#"{"battery":70,"temWarning":false}"#,
            r#"{"tem":2000,"hum":0,"online":true}"#,
        )]);
        let device = &parse_device_list(&body)[0];

        // 子文档编码回 JSON 再解析应与原内容一致
        let settings = device.raw_data.device_settings.as_ref().unwrap();
        let reparsed: crate::models::DeviceSettings =
            serde_json::from_str(&serde_json::to_string(settings).unwrap()).unwrap();
        assert_eq!(settings, &reparsed);

        let data = device.raw_data.last_device_data.as_ref().unwrap();
        let reparsed: crate::models::LastDeviceData =
            serde_json::from_str(&serde_json::to_string(data).unwrap()).unwrap();
        assert_eq!(data, &reparsed);
    }
}
